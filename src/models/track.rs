// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! GPS track point model.

use chrono::{DateTime, Utc};
use geo::Point;

/// A single recorded position. `point.x()` is longitude, `point.y()` latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub time: Option<DateTime<Utc>>,
    pub point: Point<f64>,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64, time: Option<DateTime<Utc>>) -> Self {
        Self {
            time,
            point: Point::new(lon, lat),
        }
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }
}
