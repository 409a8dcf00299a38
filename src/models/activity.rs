// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Garmin activity records and the summary served to the frontend.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Activity summary returned by `/activities` and `/activities/{id}/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivitySummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub activity_id: u64,
    /// Garmin name, or the destination when Garmin has none
    pub activity_name: String,
    /// Local start time as reported by Garmin
    pub start_time_local: String,
    /// Activity type key (running, cycling, hiking, ...)
    pub activity_type: String,
    /// Distance in meters
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub distance: i64,
    /// Duration in seconds
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub duration: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub calories: i64,
    /// Elevation gain in meters
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elevation_gain: i64,
    /// Place name inferred from the GPS track
    pub destination: Option<String>,
}

impl ActivitySummary {
    /// Attach a resolved destination, using it as the name if Garmin gave none.
    pub fn with_destination(mut self, destination: Option<String>) -> Self {
        if self.activity_name.trim().is_empty() {
            if let Some(dest) = &destination {
                self.activity_name = dest.clone();
            }
        }
        self.destination = destination;
        self
    }
}

/// Activity type block shared by list and detail payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarminActivityType {
    #[serde(default)]
    pub type_key: String,
}

/// Item of the Garmin activity list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarminActivity {
    pub activity_id: u64,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub start_time_local: String,
    #[serde(default)]
    pub activity_type: GarminActivityType,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
}

impl From<GarminActivity> for ActivitySummary {
    fn from(a: GarminActivity) -> Self {
        Self {
            activity_id: a.activity_id,
            activity_name: a.activity_name.unwrap_or_default(),
            start_time_local: a.start_time_local,
            activity_type: a.activity_type.type_key,
            distance: round_metric(a.distance),
            duration: round_metric(a.duration),
            calories: round_metric(a.calories),
            elevation_gain: round_metric(a.elevation_gain),
            destination: None,
        }
    }
}

/// Garmin activity detail (`activity-service/activity/{id}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarminActivityDetail {
    pub activity_id: u64,
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(rename = "activityTypeDTO", default)]
    pub activity_type: GarminActivityType,
    #[serde(rename = "summaryDTO", default)]
    pub summary: GarminActivityMetrics,
}

/// Numeric summary block of an activity detail.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarminActivityMetrics {
    #[serde(default)]
    pub start_time_local: String,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
}

impl From<GarminActivityDetail> for ActivitySummary {
    fn from(a: GarminActivityDetail) -> Self {
        Self {
            activity_id: a.activity_id,
            activity_name: a.activity_name.unwrap_or_default(),
            start_time_local: a.summary.start_time_local,
            activity_type: a.activity_type.type_key,
            distance: round_metric(a.summary.distance),
            duration: round_metric(a.summary.duration),
            calories: round_metric(a.summary.calories),
            elevation_gain: round_metric(a.summary.elevation_gain),
            destination: None,
        }
    }
}

/// Round half to even; missing values count as zero.
fn round_metric(value: Option<f64>) -> i64 {
    value.unwrap_or(0.0).round_ties_even() as i64
}
