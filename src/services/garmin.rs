// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin Connect API client.
//!
//! Handles:
//! - Recent activity listing
//! - Activity detail fetching
//! - GPX export download
//!
//! Authentication is a pre-provisioned session token sent as a bearer token.

use crate::error::AppError;
use crate::models::{GarminActivity, GarminActivityDetail};
use serde::Deserialize;

/// Garmin Connect API client.
#[derive(Clone)]
pub struct GarminClient {
    http: reqwest::Client,
    base_url: String,
    session_token: String,
}

impl GarminClient {
    /// Create a new client against `base_url` (e.g. `https://connectapi.garmin.cn`).
    pub fn new(base_url: impl Into<String>, session_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_token: session_token.into(),
        }
    }

    /// List the most recent activities, newest first.
    pub async fn list_activities(
        &self,
        start: u32,
        limit: u32,
    ) -> Result<Vec<GarminActivity>, AppError> {
        let url = format!(
            "{}/activitylist-service/activities/search/activities",
            self.base_url
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.session_token)
            .query(&[("start", start.to_string()), ("limit", limit.to_string())])
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Get a detailed activity by ID.
    pub async fn get_activity(&self, activity_id: u64) -> Result<GarminActivityDetail, AppError> {
        let url = format!("{}/activity-service/activity/{}", self.base_url, activity_id);
        self.get_json(&url).await
    }

    /// Download the GPX export of an activity.
    pub async fn download_gpx(&self, activity_id: u64) -> Result<Vec<u8>, AppError> {
        let url = format!(
            "{}/download-service/export/gpx/activity/{}",
            self.base_url, activity_id
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.session_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("GPX download failed: {}", e)))?;

        let response = self.check_response(response).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Upstream(format!("GPX download failed: {}", e)))?;

        tracing::debug!(activity_id, bytes = bytes.len(), "GPX downloaded from Garmin");
        Ok(bytes.to_vec())
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.session_token)
            .send()
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response status, passing successful responses through.
    async fn check_response(
        &self,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            404 => Err(AppError::NotFound(format!("Garmin: {}", not_found_message(&body)))),
            401 | 403 => {
                tracing::warn!(status = %status, "Garmin rejected session token");
                Err(AppError::Upstream(AppError::GARMIN_SESSION_ERROR.to_string()))
            }
            429 => {
                tracing::warn!("Garmin rate limit hit (429)");
                Err(AppError::Upstream(format!("HTTP {}: rate limited", status)))
            }
            _ => Err(AppError::Upstream(format!("HTTP {}: {}", status, body))),
        }
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        self.check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("JSON parse error: {}", e)))
    }
}

/// Garmin 404 bodies are sometimes empty; keep the message readable.
fn not_found_message(body: &str) -> &str {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "activity not found"
    } else {
        trimmed
    }
}
