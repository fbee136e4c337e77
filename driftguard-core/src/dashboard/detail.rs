//! Side-by-side view of one feature: summary statistics and a shared histogram.

use crate::data::{Dataset, Sample, SummaryStats};
use crate::drift::binning::{BinEdges, display_edges};
use crate::drift::{DriftEngine, Severity, round_to};
use crate::error::DriftError;
use serde::{Deserialize, Serialize};

/// One histogram bucket, with both densities in percent of their sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub range: String,
    pub bin_center: f64,
    pub baseline_density: f64,
    pub production_density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDetail {
    pub feature_name: String,
    pub psi: f64,
    pub status: Severity,
    pub baseline_stats: SummaryStats,
    pub production_stats: SummaryStats,
    pub chart_data: Vec<HistogramBin>,
}

impl DriftEngine {
    /// Detail view of `feature`.
    ///
    /// Fails with [`DriftError::FeatureNotFound`] whenever the feature would not
    /// appear in [`DriftEngine::build_report`] for the same datasets.
    pub fn feature_detail(
        &self,
        baseline: &Dataset,
        current: &Dataset,
        feature: &str,
    ) -> Result<FeatureDetail, DriftError> {
        let (expected, actual) = self
            .feature_samples(baseline, current, feature)
            .map_err(|reason| {
                tracing::debug!(feature, reason = reason.as_str(), "Feature detail unavailable");
                DriftError::feature_not_found(feature)
            })?;

        let result = self.analyze_samples(feature, &expected, &actual);
        let not_found = || DriftError::feature_not_found(feature);
        let baseline_stats = SummaryStats::from_sample(&expected).ok_or_else(not_found)?;
        let production_stats = SummaryStats::from_sample(&actual).ok_or_else(not_found)?;
        let edges = display_edges(&expected, &actual, self.config().detail.histogram_bins)
            .ok_or_else(not_found)?;

        Ok(FeatureDetail {
            feature_name: result.feature_name,
            psi: result.metrics.psi,
            status: result.severity,
            baseline_stats,
            production_stats,
            chart_data: histogram(&edges, &expected, &actual),
        })
    }
}

fn histogram(edges: &BinEdges, expected: &Sample, actual: &Sample) -> Vec<HistogramBin> {
    let expected_density = density(edges, expected);
    let actual_density = density(edges, actual);
    edges
        .as_slice()
        .windows(2)
        .zip(expected_density.into_iter().zip(actual_density))
        .map(|(w, (baseline_density, production_density))| HistogramBin {
            range: format!("{:.2}-{:.2}", w[0], w[1]),
            bin_center: round_to((w[0] + w[1]) / 2.0, 4),
            baseline_density,
            production_density,
        })
        .collect()
}

/// Percent of `sample` per bucket, two decimals.
fn density(edges: &BinEdges, sample: &Sample) -> Vec<f64> {
    let n = sample.len() as f64;
    edges
        .counts(sample.values())
        .into_iter()
        .map(|c| round_to(c as f64 / n * 100.0, 2))
        .collect()
}
