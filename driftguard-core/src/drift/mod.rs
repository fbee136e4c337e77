//! Drift detection: binning, divergence statistics, severity, and reports.

pub mod binning;
pub mod classify;
pub mod divergence;
pub mod engine;
pub mod report;

pub use binning::{BinEdges, BinningError, BinningStrategy};
pub use classify::{Classification, DivergenceMetrics, FeatureClassifier, Severity};
pub use divergence::{Metric, MetricOutcome, kl, ks, psi};
pub use engine::DriftEngine;
pub use report::{DriftReport, FeatureDriftResult, round_to};
