//! Divergence statistics between a baseline and a current sample.
//!
//! - Population Stability Index (PSI): symmetric, binned
//! - Kolmogorov–Smirnov distance (KS): symmetric, distribution-free
//! - Kullback–Leibler divergence (KL): directional, binned
//!
//! Every calculator returns a [`MetricOutcome`] instead of an error so that a
//! single bad feature can never abort a whole report.

use crate::data::Sample;
use crate::drift::binning::{BinEdges, BinningError};
use crate::error::DriftError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which statistic a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Psi,
    Ks,
    Kl,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Psi, Metric::Ks, Metric::Kl];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Psi => "psi",
            Metric::Ks => "ks",
            Metric::Kl => "kl",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single divergence computation.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricOutcome {
    Value(f64),
    /// Constant data or too few distinct bin edges: nothing measurable.
    Degenerate,
    /// The statistic could not be computed (empty input, non-finite result, ...).
    Failed(String),
}

impl MetricOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricOutcome::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, MetricOutcome::Degenerate)
    }

    /// Collapse to the externally visible value: degenerate and failed outcomes
    /// both report `0.0`. The reason is emitted as a diagnostic event.
    pub fn or_zero(self, metric: Metric, feature: &str) -> f64 {
        match self.into_result(metric, feature) {
            Ok(v) => v,
            Err(err @ DriftError::DegenerateDistribution(_)) => {
                tracing::debug!(feature, %metric, error = %err, "Reporting 0");
                0.0
            }
            Err(err) => {
                tracing::warn!(feature, %metric, error = %err, "Reporting 0");
                0.0
            }
        }
    }

    /// Strict form for callers that must not paper over a missing value.
    pub fn into_result(self, metric: Metric, feature: &str) -> Result<f64, DriftError> {
        match self {
            MetricOutcome::Value(v) => Ok(v),
            MetricOutcome::Degenerate => Err(DriftError::DegenerateDistribution(format!(
                "{metric} of '{feature}'"
            ))),
            MetricOutcome::Failed(reason) => Err(DriftError::ComputationFailure(format!(
                "{metric} of '{feature}': {reason}"
            ))),
        }
    }

    fn checked(value: f64) -> Self {
        if value.is_finite() {
            MetricOutcome::Value(value)
        } else {
            MetricOutcome::Failed(format!("non-finite result {value}"))
        }
    }
}

impl From<BinningError> for MetricOutcome {
    fn from(err: BinningError) -> Self {
        match err {
            BinningError::DegenerateRange { .. } => MetricOutcome::Degenerate,
            other => MetricOutcome::Failed(other.to_string()),
        }
    }
}

/// Per-bucket proportions of both samples, floored. Fails on empty samples since
/// a proportion of nothing is undefined.
fn floored_proportions(
    expected: &Sample,
    actual: &Sample,
    edges: &BinEdges,
    zero_floor: f64,
) -> Result<(Vec<f64>, Vec<f64>), MetricOutcome> {
    if expected.is_empty() || actual.is_empty() {
        return Err(MetricOutcome::Failed("empty sample".to_string()));
    }
    Ok((
        edges.proportions(expected, zero_floor),
        edges.proportions(actual, zero_floor),
    ))
}

/// Population Stability Index: `Σ (e_i − a_i) · ln(e_i / a_i)`.
///
/// Swapping `expected` and `actual` negates both factors of every term, so the
/// index is symmetric for a fixed set of edges.
pub fn psi(
    expected: &Sample,
    actual: &Sample,
    edges: &BinEdges,
    zero_floor: f64,
) -> MetricOutcome {
    let (e, a) = match floored_proportions(expected, actual, edges, zero_floor) {
        Ok(p) => p,
        Err(outcome) => return outcome,
    };
    let value: f64 = e
        .iter()
        .zip(&a)
        .map(|(&e, &a)| (e - a) * (e / a).ln())
        .sum();
    MetricOutcome::checked(value)
}

/// Kullback–Leibler divergence of the current distribution from the baseline:
/// `Σ a_i · ln(a_i / e_i)`.
///
/// Current values outside the baseline range drop out of every bucket, so the
/// floored sum can dip a hair below zero; it is clamped at `0.0`.
pub fn kl(
    expected: &Sample,
    actual: &Sample,
    edges: &BinEdges,
    zero_floor: f64,
) -> MetricOutcome {
    let (e, a) = match floored_proportions(expected, actual, edges, zero_floor) {
        Ok(p) => p,
        Err(outcome) => return outcome,
    };
    let value: f64 = e.iter().zip(&a).map(|(&e, &a)| a * (a / e).ln()).sum();
    match MetricOutcome::checked(value) {
        MetricOutcome::Value(v) => MetricOutcome::Value(v.max(0.0)),
        other => other,
    }
}

/// Two-sample Kolmogorov–Smirnov statistic: the largest gap between the two
/// right-continuous empirical CDFs, evaluated at every observed value.
pub fn ks(expected: &Sample, actual: &Sample) -> MetricOutcome {
    let (a, b) = (expected.sorted(), actual.sorted());
    if a.is_empty() || b.is_empty() {
        return MetricOutcome::Failed("empty sample".to_string());
    }
    let (n, m) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d: f64 = 0.0;
    // Once either side is exhausted its ECDF sits at 1 and the gap only shrinks.
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n - j as f64 / m).abs());
    }
    MetricOutcome::checked(d.clamp(0.0, 1.0))
}
