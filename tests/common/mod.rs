// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared test harness: a fake Garmin Connect + AMap upstream served on a
//! loopback port, and an app wired against it.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use garmin_overlay::config::Config;
use garmin_overlay::routes::create_router;
use garmin_overlay::AppState;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Activity with a timestamped out-and-back track and a vendor name.
#[allow(dead_code)]
pub const NAMED_ACTIVITY: u64 = 101;
/// Activity without a vendor name whose track has no timestamps.
#[allow(dead_code)]
pub const UNNAMED_ACTIVITY: u64 = 102;
/// Activity whose GPX export holds no points (e.g. a treadmill run).
#[allow(dead_code)]
pub const INDOOR_ACTIVITY: u64 = 103;

/// Location (lon,lat) of the furthest middle-third point of activity 101.
const NAMED_FURTHEST: &str = "120.170000,30.280000";
/// Location (lon,lat) of the furthest point of activity 102.
const UNNAMED_FURTHEST: &str = "121.050000,31.050000";

/// Upstream call counters and failure switches.
#[derive(Default)]
pub struct FakeUpstream {
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub gpx_calls: AtomicUsize,
    pub geocode_calls: AtomicUsize,
    pub fail_list: AtomicBool,
    pub list_not_found: AtomicBool,
    pub fail_geocode: AtomicBool,
}

impl FakeUpstream {
    #[allow(dead_code)]
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn gpx_calls(&self) -> usize {
        self.gpx_calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)]
    pub fn geocode_calls(&self) -> usize {
        self.geocode_calls.load(Ordering::SeqCst)
    }
}

/// App under test plus its fake upstream.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub upstream: Arc<FakeUpstream>,
    pub gpx_dir: TempDir,
}

impl TestApp {
    /// Issue a GET and return status, headers and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, header::HeaderMap, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, headers, body)
    }

    /// Issue a GET and parse the body as JSON.
    #[allow(dead_code)]
    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self.get(uri).await;
        let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, value)
    }
}

/// Create a test app with the default cache window.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    create_test_app_with_ttl(Duration::from_secs(600)).await
}

/// Create a test app whose caches expire after `cache_ttl`.
#[allow(dead_code)]
pub async fn create_test_app_with_ttl(cache_ttl: Duration) -> TestApp {
    let upstream = Arc::new(FakeUpstream::default());
    let base_url = spawn_upstream(upstream.clone()).await;
    let gpx_dir = tempfile::tempdir().unwrap();

    let config = Config {
        garmin_api_url: base_url.clone(),
        amap_api_url: base_url,
        gpx_dir: gpx_dir.path().to_path_buf(),
        cache_ttl,
        ..Config::test_default()
    };

    let state = Arc::new(AppState::from_config(config));
    TestApp {
        router: create_router(state.clone()),
        state,
        upstream,
        gpx_dir,
    }
}

/// Serve the fake upstream on an ephemeral port; returns its base URL.
async fn spawn_upstream(upstream: Arc<FakeUpstream>) -> String {
    let app = Router::new()
        .route(
            "/activitylist-service/activities/search/activities",
            get(fake_list),
        )
        .route("/activity-service/activity/{id}", get(fake_detail))
        .route("/download-service/export/gpx/activity/{id}", get(fake_gpx))
        .route("/v3/geocode/regeo", get(fake_regeo))
        .with_state(upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn activity_name(id: u64) -> Option<&'static str> {
    match id {
        NAMED_ACTIVITY => Some("Morning Ride"),
        UNNAMED_ACTIVITY => Some(""),
        INDOOR_ACTIVITY => Some("Treadmill Run"),
        _ => None,
    }
}

async fn fake_list(
    State(upstream): State<Arc<FakeUpstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    upstream.list_calls.fetch_add(1, Ordering::SeqCst);
    if upstream.fail_list.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
    }
    if upstream.list_not_found.load(Ordering::SeqCst) {
        return StatusCode::NOT_FOUND.into_response();
    }

    let limit: usize = params
        .get("limit")
        .and_then(|l| l.parse().ok())
        .unwrap_or(20);

    let activities: Vec<Value> = [NAMED_ACTIVITY, UNNAMED_ACTIVITY, INDOOR_ACTIVITY]
        .into_iter()
        .take(limit)
        .map(|id| {
            json!({
                "activityId": id,
                "activityName": activity_name(id),
                "startTimeLocal": "2025-05-01 08:00:00",
                "activityType": { "typeKey": "cycling", "typeId": 2 },
                "distance": 12345.5,
                "duration": 3600.2,
                "calories": 420.5,
                "elevationGain": 87.0
            })
        })
        .collect();

    Json(activities).into_response()
}

async fn fake_detail(
    State(upstream): State<Arc<FakeUpstream>>,
    Path(id): Path<u64>,
) -> Response {
    upstream.detail_calls.fetch_add(1, Ordering::SeqCst);
    let Some(name) = activity_name(id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    Json(json!({
        "activityId": id,
        "activityName": name,
        "activityTypeDTO": { "typeKey": "cycling" },
        "summaryDTO": {
            "startTimeLocal": "2025-05-01T08:00:00.0",
            "distance": 12345.5,
            "duration": 3600.2,
            "calories": 420.5,
            "elevationGain": 87.0
        }
    }))
    .into_response()
}

async fn fake_gpx(State(upstream): State<Arc<FakeUpstream>>, Path(id): Path<u64>) -> Response {
    upstream.gpx_calls.fetch_add(1, Ordering::SeqCst);

    let body = match id {
        NAMED_ACTIVITY => gpx_document(&[
            (30.25, 120.15, Some(0)),
            (30.26, 120.16, Some(15)),
            (30.28, 120.17, Some(30)),
            (30.27, 120.16, Some(40)),
            (30.30, 120.20, Some(60)),
        ]),
        UNNAMED_ACTIVITY => gpx_document(&[
            (31.00, 121.00, None),
            (31.05, 121.05, None),
            (31.01, 121.01, None),
        ]),
        INDOOR_ACTIVITY => gpx_document(&[]),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };

    ([(header::CONTENT_TYPE, "application/gpx+xml")], body).into_response()
}

async fn fake_regeo(
    State(upstream): State<Arc<FakeUpstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    upstream.geocode_calls.fetch_add(1, Ordering::SeqCst);
    if upstream.fail_geocode.load(Ordering::SeqCst) {
        return Json(json!({ "status": "0", "info": "INVALID_USER_KEY" }));
    }

    let regeocode = match params.get("location").map(String::as_str) {
        Some(NAMED_FURTHEST) => json!({
            "addressComponent": { "district": "西湖区", "streetNumber": { "street": "北山街" } },
            "pois": [{ "name": "断桥残雪" }],
            "roads": [{ "name": "北山街" }]
        }),
        Some(UNNAMED_FURTHEST) => json!({
            "addressComponent": { "district": "黄浦区", "streetNumber": [] },
            "pois": [],
            "roads": [{ "name": "中山东一路" }, { "name": "南京东路" }]
        }),
        _ => json!({
            "addressComponent": { "district": "西湖区", "streetNumber": [] },
            "pois": [],
            "roads": []
        }),
    };

    Json(json!({ "status": "1", "info": "OK", "regeocode": regeocode }))
}

/// Build a GPX document; times are minutes after 08:00 UTC.
#[allow(dead_code)]
pub fn gpx_document(points: &[(f64, f64, Option<i64>)]) -> String {
    let trkpts: String = points
        .iter()
        .map(|(lat, lon, minute)| {
            let time = minute
                .map(|m| {
                    format!(
                        "<time>2025-05-01T{:02}:{:02}:00Z</time>",
                        8 + m / 60,
                        m % 60
                    )
                })
                .unwrap_or_default();
            format!("      <trkpt lat=\"{}\" lon=\"{}\">{}</trkpt>\n", lat, lon, time)
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="fake-garmin" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Activity</name>
    <trkseg>
{}    </trkseg>
  </trk>
</gpx>"#,
        trkpts
    )
}
