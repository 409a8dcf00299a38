// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by services and handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Track storage error: {0}")]
    Storage(String),

    #[error("Track error: {0}")]
    Track(#[from] crate::services::geometry::TrackError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message used for Garmin 401/403 responses.
    pub const GARMIN_SESSION_ERROR: &'static str = "Garmin session rejected";

    /// HTTP status for this error on the given endpoint.
    ///
    /// The list endpoint reports every failure as 500; per-activity endpoints
    /// report everything except internal bugs as 404.
    pub fn status_for(&self, endpoint: Endpoint) -> StatusCode {
        match (endpoint, self) {
            (Endpoint::ActivityList, _) => StatusCode::INTERNAL_SERVER_ERROR,
            (_, AppError::Internal(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            (Endpoint::ActivityInfo | Endpoint::ActivityTrack, _) => StatusCode::NOT_FOUND,
        }
    }

    /// Tag this error with the endpoint that produced it.
    pub fn at(self, endpoint: Endpoint) -> ApiError {
        ApiError {
            endpoint,
            error: self,
        }
    }
}

/// Endpoints exposed by the API, used to pick error statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ActivityList,
    ActivityInfo,
    ActivityTrack,
}

/// An [`AppError`] bound to the endpoint it is reported from.
#[derive(Debug)]
pub struct ApiError {
    pub endpoint: Endpoint,
    pub error: AppError,
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_for(self.endpoint);

        match &self.error {
            AppError::NotFound(_) => {
                tracing::debug!(endpoint = ?self.endpoint, error = %self.error, "Not found")
            }
            AppError::Internal(err) => {
                tracing::error!(endpoint = ?self.endpoint, error = %err, "Internal server error")
            }
            other => {
                tracing::warn!(endpoint = ?self.endpoint, error = %other, "Request failed")
            }
        }

        let body = ErrorResponse {
            error: self.error.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Attach an endpoint to the error side of a service result.
pub trait ResultExt<T> {
    fn at(self, endpoint: Endpoint) -> std::result::Result<T, ApiError>;
}

impl<T> ResultExt<T> for Result<T> {
    fn at(self, endpoint: Endpoint) -> std::result::Result<T, ApiError> {
        self.map_err(|e| e.at(endpoint))
    }
}

/// Result type alias for services
pub type Result<T> = std::result::Result<T, AppError>;
