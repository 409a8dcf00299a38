// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Track geometry: GPX parsing and furthest-point selection.
//!
//! The furthest point is used as a proxy for where an activity "went". Start
//! and finish legs are usually loops near home, so when the track carries
//! timestamps only the middle third of the elapsed time is considered.

use crate::models::TrackPoint;
use chrono::{DateTime, Utc};
use geo::{Distance, Haversine, Point};
use std::collections::HashSet;
use time::OffsetDateTime;

/// Great-circle distance in meters between two points (spherical Earth).
#[inline]
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

/// Parse GPX bytes into an ordered list of track points.
///
/// Track points are taken in document order. Files without any track point
/// fall back to route points.
pub fn parse_gpx(bytes: &[u8]) -> Result<Vec<TrackPoint>, TrackError> {
    let gpx = gpx::read(bytes).map_err(|e| TrackError::Parse(e.to_string()))?;

    let mut points: Vec<TrackPoint> = gpx
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(to_track_point)
        .collect();

    if points.is_empty() {
        points = gpx
            .routes
            .iter()
            .flat_map(|route| route.points.iter())
            .map(to_track_point)
            .collect();
    }

    tracing::debug!(points = points.len(), "Parsed GPX track");
    Ok(points)
}

fn to_track_point(wp: &gpx::Waypoint) -> TrackPoint {
    let time = wp.time.and_then(|t| {
        let dt: OffsetDateTime = t.into();
        DateTime::<Utc>::from_timestamp(dt.unix_timestamp(), dt.nanosecond())
    });
    TrackPoint {
        time,
        point: wp.point(),
    }
}

/// Pick the point of the track that best represents its destination.
///
/// Distance is measured from the first point. With timestamps, candidates are
/// restricted to the middle third of the elapsed time and thinned to one per
/// minute; if that leaves nothing, every point is scanned. Returns `None` for
/// an empty track.
pub fn furthest_point(points: &[TrackPoint]) -> Option<TrackPoint> {
    let start = points.first()?;

    let candidates = middle_third_candidates(points);
    if let Some(best) = farthest_from(start, candidates.iter().copied()) {
        return Some(*best);
    }

    farthest_from(start, points.iter()).copied()
}

/// Points inside the middle third of the elapsed time, at most one per minute.
fn middle_third_candidates(points: &[TrackPoint]) -> Vec<&TrackPoint> {
    let first = points.iter().find_map(|p| p.time);
    let last = points.iter().rev().find_map(|p| p.time);
    let (Some(first), Some(last)) = (first, last) else {
        return Vec::new();
    };

    let elapsed = last - first;
    if elapsed <= chrono::Duration::zero() {
        return Vec::new();
    }

    let window_start = first + elapsed / 3;
    let window_end = first + elapsed * 2 / 3;

    let mut seen_minutes = HashSet::new();
    points
        .iter()
        .filter(|p| {
            p.time
                .is_some_and(|t| t >= window_start && t <= window_end)
        })
        .filter(|p| {
            p.time
                .is_some_and(|t| seen_minutes.insert(t.timestamp().div_euclid(60)))
        })
        .collect()
}

/// First point with the maximum distance from `origin`.
fn farthest_from<'a>(
    origin: &TrackPoint,
    points: impl IntoIterator<Item = &'a TrackPoint>,
) -> Option<&'a TrackPoint> {
    let mut best: Option<(&TrackPoint, f64)> = None;
    for p in points {
        let d = haversine_distance(origin.point, p.point);
        match best {
            Some((_, best_d)) if d <= best_d => {}
            _ => best = Some((p, d)),
        }
    }
    best.map(|(p, _)| p)
}

/// Errors from track parsing.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Failed to parse GPX: {0}")]
    Parse(String),

    #[error("Track has no points")]
    Empty,
}
