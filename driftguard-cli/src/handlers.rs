//! Request handlers for the JSON API.

use crate::server::ApiError;
use crate::state::SharedState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use driftguard_core::drift::Severity;
use driftguard_core::{DashboardSummary, DriftReport, FeatureDetail};
use serde::Serialize;
use serde_json::{Value, json};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Serialize)]
pub struct FeatureRow {
    pub name: String,
    pub psi: f64,
    pub ks: f64,
    pub kl: f64,
    pub status: Severity,
}

#[derive(Debug, Serialize)]
pub struct DriftMeta {
    pub training_samples: usize,
    pub production_samples: usize,
}

/// Flat per-feature listing.
#[derive(Debug, Serialize)]
pub struct DriftOverview {
    pub drift_summary: Vec<FeatureRow>,
    pub meta: DriftMeta,
}

impl From<&DriftReport> for DriftOverview {
    fn from(report: &DriftReport) -> Self {
        Self {
            drift_summary: report
                .iter()
                .map(|r| FeatureRow {
                    name: r.feature_name.clone(),
                    psi: r.metrics.psi,
                    ks: r.metrics.ks,
                    kl: r.metrics.kl,
                    status: r.severity,
                })
                .collect(),
            meta: DriftMeta {
                training_samples: report.baseline_rows,
                production_samples: report.current_rows,
            },
        }
    }
}

async fn report(state: &SharedState) -> Result<DriftReport, ApiError> {
    let (baseline, current) = state.load_datasets().await?;
    Ok(state.engine.build_report(&baseline, &current))
}

pub async fn drift(State(state): State<SharedState>) -> Result<Json<DriftOverview>, ApiError> {
    let report = report(&state).await?;
    Ok(Json(DriftOverview::from(&report)))
}

pub async fn drift_report(State(state): State<SharedState>) -> Result<Json<DriftReport>, ApiError> {
    Ok(Json(report(&state).await?))
}

pub async fn dashboard_data(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = report(&state).await?;
    let summary: DashboardSummary = state.engine.summarize(&report);
    Ok((
        [(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate")],
        Json(summary),
    ))
}

pub async fn feature_details(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<FeatureDetail>, ApiError> {
    let (baseline, current) = state.load_datasets().await?;
    let detail = state.engine.feature_detail(&baseline, &current, &name)?;
    Ok(Json(detail))
}
