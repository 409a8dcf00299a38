// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity service.
//!
//! Handles the core workflow:
//! 1. Serve activity summaries from the in-memory caches when fresh
//! 2. Otherwise fetch from Garmin
//! 3. Load the GPX track (disk cache, download on miss)
//! 4. Pick the furthest point and reverse-geocode it into a destination
//! 5. Cache the enriched summary

use crate::cache::TtlCache;
use crate::error::Result;
use crate::models::ActivitySummary;
use crate::services::geometry::{self, TrackError};
use crate::services::{AmapGeocoder, GarminClient, TrackStore};
use std::time::Duration;

/// Owns the Garmin/AMap clients, the GPX store and both caches.
pub struct ActivityService {
    garmin: GarminClient,
    geocoder: AmapGeocoder,
    tracks: TrackStore,
    page_size: u32,
    /// Single slot holding the recent-activities list.
    recent: TtlCache<(), Vec<ActivitySummary>>,
    /// Per-activity summaries, keyed by Garmin activity ID.
    info: TtlCache<u64, ActivitySummary>,
}

impl ActivityService {
    pub fn new(
        garmin: GarminClient,
        geocoder: AmapGeocoder,
        tracks: TrackStore,
        cache_ttl: Duration,
        page_size: u32,
    ) -> Self {
        Self {
            garmin,
            geocoder,
            tracks,
            page_size,
            recent: TtlCache::new(cache_ttl),
            info: TtlCache::new(cache_ttl),
        }
    }

    pub fn tracks(&self) -> &TrackStore {
        &self.tracks
    }

    /// Number of distinct activities whose info has been cached.
    pub fn cached_activity_count(&self) -> usize {
        self.info.len()
    }

    /// Recent activities with destinations, newest first.
    pub async fn list_recent(&self) -> Result<Vec<ActivitySummary>> {
        if let Some(cached) = self.recent.get(&()) {
            tracing::debug!(count = cached.len(), "Activity list served from cache");
            return Ok(cached);
        }

        let activities = self.garmin.list_activities(0, self.page_size).await?;
        tracing::info!(count = activities.len(), "Fetched recent activities from Garmin");

        let mut summaries = Vec::with_capacity(activities.len());
        for activity in activities {
            let summary = ActivitySummary::from(activity);
            let destination = self.resolve_destination(summary.activity_id).await;
            summaries.push(summary.with_destination(destination));
        }

        self.recent.put((), summaries.clone());
        Ok(summaries)
    }

    /// Summary of a single activity with its destination.
    pub async fn get_info(&self, activity_id: u64) -> Result<ActivitySummary> {
        if let Some(cached) = self.info.get(&activity_id) {
            tracing::debug!(activity_id, "Activity info served from cache");
            return Ok(cached);
        }

        let detail = self.garmin.get_activity(activity_id).await?;
        let destination = self.resolve_destination(activity_id).await;
        let summary = ActivitySummary::from(detail).with_destination(destination);

        tracing::info!(
            activity_id,
            destination = ?summary.destination,
            "Activity info fetched"
        );

        self.info.put(activity_id, summary.clone());
        Ok(summary)
    }

    /// Raw GPX bytes of an activity, sweeping expired files first.
    pub async fn get_track(&self, activity_id: u64) -> Result<Vec<u8>> {
        let removed = self.tracks.sweep_expired().await;
        if removed > 0 {
            tracing::info!(removed, "Swept expired GPX files");
        }

        self.load_track(activity_id).await
    }

    async fn load_track(&self, activity_id: u64) -> Result<Vec<u8>> {
        self.tracks
            .load_or_download(activity_id, || self.garmin.download_gpx(activity_id))
            .await
    }

    /// Infer the destination of an activity; failures degrade to `None`.
    async fn resolve_destination(&self, activity_id: u64) -> Option<String> {
        match self.furthest_point(activity_id).await {
            Ok(point) => self.geocoder.reverse_geocode(point).await,
            Err(e) => {
                tracing::warn!(activity_id, error = %e, "Could not infer destination");
                None
            }
        }
    }

    async fn furthest_point(&self, activity_id: u64) -> Result<geo::Point<f64>> {
        let bytes = self.load_track(activity_id).await?;
        let points = geometry::parse_gpx(&bytes)?;
        let furthest = geometry::furthest_point(&points).ok_or(TrackError::Empty)?;

        tracing::debug!(
            activity_id,
            points = points.len(),
            lat = furthest.lat(),
            lon = furthest.lon(),
            "Selected furthest point"
        );
        Ok(furthest.point)
    }
}
