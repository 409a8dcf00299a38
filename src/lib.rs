// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Garmin-Overlay: activity backend for the photo overlay frontend
//!
//! This crate proxies recent Garmin Connect activities and their GPX tracks,
//! labelling each activity with a destination inferred from its track and
//! reverse-geocoded through AMap.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::{ActivityService, AmapGeocoder, GarminClient, TrackStore};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub activities: ActivityService,
}

impl AppState {
    /// Wire up clients, track store and caches from configuration.
    pub fn from_config(config: Config) -> Self {
        let garmin = GarminClient::new(&config.garmin_api_url, &config.garmin_session_token);
        let geocoder = AmapGeocoder::new(&config.amap_api_url, &config.amap_api_key);
        let tracks = TrackStore::new(&config.gpx_dir, config.gpx_max_age);

        let activities = ActivityService::new(
            garmin,
            geocoder,
            tracks,
            config.cache_ttl,
            config.activity_page_size,
        );

        Self { config, activities }
    }
}
