// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity routes: recent list, per-activity info and GPX download.

use crate::error::{ApiError, Endpoint, ResultExt};
use crate::models::ActivitySummary;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// MIME type of GPS exchange files.
pub const GPX_CONTENT_TYPE: &str = "application/gpx+xml";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activities", get(list_activities))
        .route("/activities/{id}/info", get(get_activity_info))
        .route("/activities/{id}/gpx", get(get_activity_gpx))
}

/// Recent activities with resolved destinations.
async fn list_activities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActivitySummary>>, ApiError> {
    let activities = state
        .activities
        .list_recent()
        .await
        .at(Endpoint::ActivityList)?;
    Ok(Json(activities))
}

/// Single activity summary with resolved destination.
async fn get_activity_info(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
) -> Result<Json<ActivitySummary>, ApiError> {
    let summary = state
        .activities
        .get_info(activity_id)
        .await
        .at(Endpoint::ActivityInfo)?;
    Ok(Json(summary))
}

/// Raw GPX file, downloaded from Garmin on first request.
async fn get_activity_gpx(
    State(state): State<Arc<AppState>>,
    Path(activity_id): Path<u64>,
) -> Result<Response, ApiError> {
    tracing::debug!(activity_id, "Serving GPX");

    let bytes = state
        .activities
        .get_track(activity_id)
        .await
        .at(Endpoint::ActivityTrack)?;

    Ok(([(header::CONTENT_TYPE, GPX_CONTENT_TYPE)], bytes).into_response())
}
