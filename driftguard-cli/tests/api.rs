//! Integration tests for the JSON API endpoints.

use axum::body::Body;
use driftguard::{AppState, SharedState, router};
use driftguard_core::data::CsvSource;
use driftguard_core::DriftEngine;
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

const ROWS: usize = 300;

/// Baseline: `income` 0..300, `age` cycling 20..70, categorical `region`.
fn baseline_csv() -> String {
    let mut out = String::from("income,age,region\n");
    for i in 0..ROWS {
        out.push_str(&format!("{},{},eu\n", i, 20 + i % 50));
    }
    out
}

/// Current: `income` shifted by half its range, `age` unchanged.
fn current_csv() -> String {
    let mut out = String::from("income,age,region\n");
    for i in 0..ROWS {
        out.push_str(&format!("{},{},us\n", i + ROWS / 2, 20 + i % 50));
    }
    out
}

fn make_state(dir: &Path) -> SharedState {
    let baseline = dir.join("training_data.csv");
    let current = dir.join("production_data.csv");
    std::fs::write(&baseline, baseline_csv()).unwrap();
    std::fs::write(&current, current_csv()).unwrap();
    AppState::new(
        DriftEngine::default(),
        Arc::new(CsvSource::new(baseline)),
        Arc::new(CsvSource::new(current)),
    )
    .shared()
}

fn make_request(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn get(
    state: SharedState,
    uri: &str,
) -> (axum::http::StatusCode, axum::http::HeaderMap, serde_json::Value) {
    let app = router(state);
    let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(app, make_request(uri))
        .await
        .unwrap();
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, headers, json)
}

// --- /health ---

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, json) = get(make_state(dir.path()), "/health").await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "ok");
}

// --- /api/drift ---

#[tokio::test]
async fn test_drift_lists_numeric_features_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, json) = get(make_state(dir.path()), "/api/drift").await;
    assert_eq!(status, 200);

    let rows = json["drift_summary"].as_array().unwrap();
    let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["income", "age"]);
    assert_eq!(rows[0]["status"], "critical");
    assert_eq!(rows[1]["status"], "good");
    assert_eq!(rows[1]["psi"], 0.0);
    assert_eq!(json["meta"]["training_samples"], ROWS);
    assert_eq!(json["meta"]["production_samples"], ROWS);
}

// --- /api/drift-report ---

#[tokio::test]
async fn test_drift_report_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, json) = get(make_state(dir.path()), "/api/drift-report").await;
    assert_eq!(status, 200);
    assert_eq!(json["total_features"], 2);
    assert_eq!(json["drifting_features"], 1);
    assert_eq!(json["features"]["income"]["status"], "critical");
    assert!(json["features"]["income"]["psi"].as_f64().unwrap() >= 0.2);
    assert!(json["features"].get("region").is_none());
}

// --- /api/dashboard-data ---

#[tokio::test]
async fn test_dashboard_data() {
    let dir = tempfile::tempdir().unwrap();
    let (status, headers, json) = get(make_state(dir.path()), "/api/dashboard-data").await;
    assert_eq!(status, 200);
    assert_eq!(
        headers.get("cache-control").unwrap(),
        "no-store, no-cache, must-revalidate"
    );

    assert_eq!(json["health_score"], 50);
    assert_eq!(json["drift_summary"]["score"], 0.5);
    assert_eq!(json["drift_summary"]["drifting_count"], 1);
    assert_eq!(json["drift_summary"]["total_count"], 2);
    assert_eq!(json["drift_summary"]["recommendation"]["action"], "RETRAIN_URGENT");
    assert_eq!(json["drift_summary"]["recommendation"]["estimated_time"], "2 hours");
    assert_eq!(json["top_features"][0]["name"], "income");
    assert_eq!(json["alerts"][0]["id"], 1);
    assert_eq!(json["alerts"][0]["type"], "critical");
    assert_eq!(json["alerts"][0]["timestamp"], "Just now");
    assert_eq!(json["metrics"][0]["label"], "Total Predictions");
    assert_eq!(json["metrics"][0]["value"], "300");
    assert_eq!(json["metrics"][2]["value"], "70.0%");
}

// --- /api/feature-details/{name} ---

#[tokio::test]
async fn test_feature_details() {
    let dir = tempfile::tempdir().unwrap();
    let (status, _, json) = get(make_state(dir.path()), "/api/feature-details/income").await;
    assert_eq!(status, 200);
    assert_eq!(json["feature_name"], "income");
    assert_eq!(json["status"], "critical");
    assert_eq!(json["baseline_stats"]["min"], 0.0);
    assert_eq!(json["production_stats"]["max"], 449.0);
    assert_eq!(json["chart_data"].as_array().unwrap().len(), 20);
    assert!(json["chart_data"][0].get("bin_center").is_some());
}

#[tokio::test]
async fn test_feature_details_unknown_feature_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(dir.path());
    for name in ["missing", "region"] {
        let uri = format!("/api/feature-details/{name}");
        let (status, _, json) = get(state.clone(), &uri).await;
        assert_eq!(status, 404);
        assert!(json["error"].as_str().unwrap().contains(name));
    }
}

// --- request-level failures ---

#[tokio::test]
async fn test_missing_dataset_is_500_with_trace() {
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(
        DriftEngine::default(),
        Arc::new(CsvSource::new(dir.path().join("absent.csv"))),
        Arc::new(CsvSource::new(dir.path().join("absent_too.csv"))),
    )
    .shared();

    for uri in ["/api/drift", "/api/dashboard-data", "/api/feature-details/income"] {
        let (status, _, json) = get(state.clone(), uri).await;
        assert_eq!(status, 500);
        assert!(json["error"].as_str().unwrap().contains("Data unavailable"));
        let trace = json["trace"].as_array().unwrap();
        assert!(trace.len() >= 2);
        assert!(trace[0].as_str().unwrap().contains("cannot read file"));
    }
}

#[tokio::test]
async fn test_datasets_are_reloaded_per_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = make_state(dir.path());
    let (_, _, before) = get(state.clone(), "/api/drift-report").await;
    assert_eq!(before["drifting_features"], 1);

    std::fs::write(dir.path().join("production_data.csv"), baseline_csv()).unwrap();
    let (_, _, after) = get(state, "/api/drift-report").await;
    assert_eq!(after["drifting_features"], 0);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let app = router(make_state(dir.path()));
    let req = axum::http::Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(app, req)
        .await
        .unwrap();
    assert_eq!(resp.headers().get("access-control-allow-origin").unwrap(), "*");
}
