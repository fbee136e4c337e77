//! # driftguard-core: Feature Drift Detection
//!
//! Compares a baseline (training) dataset against a current (production)
//! dataset, feature by feature, and condenses the result for monitoring.
//!
//! ## Pipeline
//!
//! 1. **Data**: column-oriented [`Dataset`]s loaded through a [`DatasetSource`]
//! 2. **Drift**: shared bin edges, PSI / KS / KL, and a severity tier per feature
//! 3. **Dashboard**: health score, alerts, retraining recommendation, feature detail
//!
//! All policy constants (bucket counts, thresholds, dashboard heuristics) live in
//! [`DriftConfig`], loaded through figment layers by [`config::load_config`].

// Foundation
pub mod config;
pub mod error;

// Inputs
pub mod data;

// Analysis
pub mod drift;

// Presentation
pub mod dashboard;

// Re-exports
pub use config::{DriftConfig, load_config};
pub use dashboard::{DashboardSummarizer, DashboardSummary, FeatureDetail};
pub use data::{CsvSource, Dataset, DatasetSource, Sample};
pub use drift::{DriftEngine, DriftReport, FeatureClassifier, FeatureDriftResult, Severity};
pub use error::DriftError;
