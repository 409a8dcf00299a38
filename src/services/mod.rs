// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod garmin;
pub mod geocode;
pub mod geometry;
pub mod track_store;

pub use activity::ActivityService;
pub use garmin::GarminClient;
pub use geocode::AmapGeocoder;
pub use track_store::TrackStore;
