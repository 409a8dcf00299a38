// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reverse geocoding through the AMap web service (`/v3/geocode/regeo`).
//!
//! Lookups are best effort: every failure is logged and reported as "no
//! destination" so that callers can fall back to the Garmin activity name.

use geo::Point;
use serde_json::Value;

/// Search radius around the point, in meters.
const REGEO_RADIUS_METERS: u32 = 1000;

/// AMap reverse-geocoding client.
#[derive(Clone)]
pub struct AmapGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AmapGeocoder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Resolve a point (`x` = longitude, `y` = latitude) to a place name.
    pub async fn reverse_geocode(&self, point: Point<f64>) -> Option<String> {
        let url = format!("{}/v3/geocode/regeo", self.base_url);
        let location = format!("{:.6},{:.6}", point.x(), point.y());
        let radius = REGEO_RADIUS_METERS.to_string();

        let response = match self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("location", location.as_str()),
                ("extensions", "all"),
                ("radius", radius.as_str()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "Reverse geocode request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(location = %location, status = %status, "Reverse geocode HTTP error");
            return None;
        }

        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "Reverse geocode response is not JSON");
                return None;
            }
        };

        if body.get("status").and_then(Value::as_str) != Some("1") {
            let info = body.get("info").and_then(Value::as_str).unwrap_or("unknown");
            tracing::warn!(
                location = %location,
                info,
                "Reverse geocode rejected by AMap"
            );
            return None;
        }

        let destination = resolve_destination(&body);
        tracing::debug!(location = %location, destination = ?destination, "Reverse geocode resolved");
        destination
    }
}

/// Pick a label from a regeo response.
///
/// Precedence: named point of interest, street, comma-joined roads, district.
/// AMap encodes empty fields as `[]`; anything that is not a non-empty string
/// counts as absent.
pub fn resolve_destination(body: &Value) -> Option<String> {
    let regeo = body.get("regeocode")?;
    let address = regeo.get("addressComponent");

    if let Some(poi) = regeo
        .get("pois")
        .and_then(Value::as_array)
        .and_then(|pois| pois.iter().find_map(|p| non_empty_str(p.get("name"))))
    {
        return Some(poi.to_string());
    }

    if let Some(street) = address
        .and_then(|a| a.get("streetNumber"))
        .and_then(|s| non_empty_str(s.get("street")))
    {
        return Some(street.to_string());
    }

    let roads: Vec<&str> = regeo
        .get("roads")
        .and_then(Value::as_array)
        .map(|roads| {
            roads
                .iter()
                .filter_map(|r| non_empty_str(r.get("name")))
                .collect()
        })
        .unwrap_or_default();
    if !roads.is_empty() {
        return Some(roads.join(", "));
    }

    address
        .and_then(|a| non_empty_str(a.get("district")))
        .map(str::to_string)
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
