// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honoured for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// How long fetched activity data is served from memory.
const DEFAULT_CACHE_TTL_SECS: u64 = 600;
/// How long downloaded GPX files are kept on disk (7 days).
const DEFAULT_GPX_MAX_AGE_SECS: u64 = 7 * 24 * 3600;
/// Number of recent activities requested from Garmin.
const DEFAULT_ACTIVITY_PAGE_SIZE: u32 = 3;
const DEFAULT_PORT: u16 = 9245;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Garmin Connect API base URL
    pub garmin_api_url: String,
    /// Pre-provisioned Garmin Connect session token (bearer)
    pub garmin_session_token: String,
    /// AMap web service base URL
    pub amap_api_url: String,
    /// AMap web service key
    pub amap_api_key: String,
    /// Directory holding downloaded GPX files
    pub gpx_dir: PathBuf,
    /// Validity window of the in-memory caches
    pub cache_ttl: Duration,
    /// Age after which a GPX file is swept
    pub gpx_max_age: Duration,
    /// Page size of the recent-activities list
    pub activity_page_size: u32,
    /// Server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            garmin_api_url: env::var("GARMIN_API_URL")
                .unwrap_or_else(|_| "https://connectapi.garmin.cn".to_string()),
            garmin_session_token: env::var("GARMIN_SESSION_TOKEN")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("GARMIN_SESSION_TOKEN"))?,
            amap_api_url: env::var("AMAP_API_URL")
                .unwrap_or_else(|_| "https://restapi.amap.com".to_string()),
            amap_api_key: env::var("AMAP_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("AMAP_API_KEY"))?,
            gpx_dir: env::var("GPX_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./gpx_data")),
            cache_ttl: Duration::from_secs(parse_or("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?),
            gpx_max_age: Duration::from_secs(parse_or(
                "GPX_MAX_AGE_SECS",
                DEFAULT_GPX_MAX_AGE_SECS,
            )?),
            activity_page_size: parse_or("ACTIVITY_PAGE_SIZE", DEFAULT_ACTIVITY_PAGE_SIZE)?,
            port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .unwrap_or(DEFAULT_PORT),
        })
    }

    /// Config for tests: upstream URLs point nowhere until overridden.
    pub fn test_default() -> Self {
        Self {
            garmin_api_url: "http://127.0.0.1:9".to_string(),
            garmin_session_token: "test_session_token".to_string(),
            amap_api_url: "http://127.0.0.1:9".to_string(),
            amap_api_key: "test_amap_key".to_string(),
            gpx_dir: env::temp_dir().join("garmin-overlay-test"),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            gpx_max_age: Duration::from_secs(DEFAULT_GPX_MAX_AGE_SECS),
            activity_page_size: DEFAULT_ACTIVITY_PAGE_SIZE,
            port: DEFAULT_PORT,
        }
    }
}

/// Parse a numeric variable, falling back to `default` when unset.
fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
