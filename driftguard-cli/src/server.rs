//! JSON API built on axum.

use crate::handlers;
use crate::state::SharedState;
use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use driftguard_core::DriftError;
use serde_json::json;
use std::error::Error as _;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Error half of every handler result.
#[derive(Debug)]
pub struct ApiError(pub DriftError);

impl From<DriftError> for ApiError {
    fn from(err: DriftError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// The error followed by each of its sources, outermost first.
    pub fn trace(&self) -> Vec<String> {
        let mut trace = vec![self.0.to_string()];
        let mut source = self.0.source();
        while let Some(err) = source {
            trace.push(err.to_string());
            source = err.source();
        }
        trace
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.0 {
            DriftError::FeatureNotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": self.0.to_string() })),
            )
                .into_response(),
            err => {
                if err.is_request_fatal() {
                    tracing::error!(error = %err, "Request failed");
                } else {
                    tracing::warn!(error = %err, "Request failed");
                }
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string(), "trace": self.trace() })),
                )
                    .into_response()
            }
        }
    }
}

/// Build the API router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/drift", get(handlers::drift))
        .route("/api/drift-report", get(handlers::drift_report))
        .route("/api/dashboard-data", get(handlers::dashboard_data))
        .route("/api/feature-details/{name}", get(handlers::feature_details))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on `host:port` until Ctrl-C.
pub async fn run(state: SharedState, host: &str, port: u16) -> Result<(), std::io::Error> {
    let app = router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "DriftGuard API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
