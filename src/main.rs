// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Garmin-Overlay API Server
//!
//! Serves recent Garmin activities, their GPX tracks and inferred
//! destinations to the photo overlay frontend.

use garmin_overlay::{config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration and build shared state
    let state = Arc::new(AppState::from_config(Config::from_env()?));
    let config = &state.config;
    tracing::info!(
        port = config.port,
        garmin = %config.garmin_api_url,
        gpx_dir = %config.gpx_dir.display(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Starting Garmin-Overlay API"
    );
    state.activities.tracks().ensure_dir().await?;
    let addr = format!("0.0.0.0:{}", config.port);

    // Build router
    let app = garmin_overlay::routes::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("garmin_overlay=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
