//! The drift engine: per-feature analysis and report assembly.

use crate::config::DriftConfig;
use crate::data::{Dataset, Sample};
use crate::drift::binning::BinEdges;
use crate::drift::classify::{DivergenceMetrics, FeatureClassifier};
use crate::drift::divergence::{self, Metric, MetricOutcome};
use crate::drift::report::{DriftReport, FeatureDriftResult, round_to};
use crate::error::DriftError;

/// Compares a baseline dataset against a current one.
///
/// The engine holds only immutable configuration, so one instance can be shared
/// across threads and requests.
#[derive(Debug, Clone)]
pub struct DriftEngine {
    config: DriftConfig,
    classifier: FeatureClassifier,
}

impl DriftEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: DriftConfig) -> Result<Self, DriftError> {
        config.validate()?;
        let classifier = FeatureClassifier::new(config.thresholds.clone());
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    pub fn classifier(&self) -> &FeatureClassifier {
        &self.classifier
    }

    /// PSI, KS and KL of `actual` against `expected`, unrounded. Any metric that
    /// cannot be computed is reported as `0.0`.
    pub fn compute_metrics(
        &self,
        feature: &str,
        expected: &Sample,
        actual: &Sample,
    ) -> DivergenceMetrics {
        let binning = &self.config.binning;
        let floor = binning.zero_floor;

        let (psi, kl) =
            match BinEdges::compute(expected, actual, binning.bucket_count, binning.strategy) {
                Ok(edges) => (
                    divergence::psi(expected, actual, &edges, floor),
                    divergence::kl(expected, actual, &edges, floor),
                ),
                Err(err) => {
                    let outcome = MetricOutcome::from(err);
                    (outcome.clone(), outcome)
                }
            };

        DivergenceMetrics {
            psi: psi.or_zero(Metric::Psi, feature),
            ks: divergence::ks(expected, actual).or_zero(Metric::Ks, feature),
            kl: kl.or_zero(Metric::Kl, feature),
        }
    }

    /// Analyse one feature: metrics, severity, then rounding for the report.
    pub fn analyze_samples(
        &self,
        feature: &str,
        expected: &Sample,
        actual: &Sample,
    ) -> FeatureDriftResult {
        let raw = self.compute_metrics(feature, expected, actual);
        let classification = self.classifier.classify_detailed(&raw);
        let digits = self.config.report.precision;
        let metrics = DivergenceMetrics {
            psi: round_to(raw.psi, digits),
            ks: round_to(raw.ks, digits),
            kl: round_to(raw.kl, digits),
        };

        tracing::debug!(
            feature,
            psi = metrics.psi,
            ks = metrics.ks,
            kl = metrics.kl,
            severity = %classification.severity,
            triggered_by = ?classification.triggered_by,
            "Feature analysed"
        );

        FeatureDriftResult {
            feature_name: feature.to_string(),
            metrics,
            severity: classification.severity,
        }
    }

    /// Samples of `feature` on both sides, or the reason the feature is skipped.
    pub(crate) fn feature_samples(
        &self,
        baseline: &Dataset,
        current: &Dataset,
        feature: &str,
    ) -> Result<(Sample, Sample), SkipReason> {
        let expected = baseline
            .column(feature)
            .and_then(|c| c.as_numeric())
            .ok_or(SkipReason::NotNumericInBaseline)?;
        let actual = match current.column(feature) {
            None => return Err(SkipReason::MissingFromCurrent),
            Some(c) => c.as_numeric().ok_or(SkipReason::NotNumericInCurrent)?,
        };
        let expected = Sample::from_column(expected);
        let actual = Sample::from_column(actual);
        if expected.is_empty() || actual.is_empty() {
            return Err(SkipReason::NoSamples);
        }
        Ok((expected, actual))
    }

    /// Build the drift report for every numeric baseline column that is also
    /// numeric in `current` and has observations on both sides.
    pub fn build_report(&self, baseline: &Dataset, current: &Dataset) -> DriftReport {
        let mut features = Vec::new();
        for (name, _) in baseline.numeric_columns() {
            match self.feature_samples(baseline, current, name) {
                Ok((expected, actual)) => {
                    features.push(self.analyze_samples(name, &expected, &actual));
                }
                Err(reason) => {
                    tracing::warn!(feature = name, reason = reason.as_str(), "Skipping feature");
                }
            }
        }

        let report = DriftReport::new(features, baseline.row_count(), current.row_count());
        tracing::info!(
            total = report.total_features(),
            drifting = report.drifting_features(),
            baseline_rows = report.baseline_rows,
            current_rows = report.current_rows,
            "Drift report built"
        );
        report
    }
}

impl Default for DriftEngine {
    fn default() -> Self {
        let config = DriftConfig::default();
        let classifier = FeatureClassifier::new(config.thresholds.clone());
        Self { config, classifier }
    }
}

/// Why a baseline column produced no report entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    NotNumericInBaseline,
    MissingFromCurrent,
    NotNumericInCurrent,
    NoSamples,
}

impl SkipReason {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotNumericInBaseline => "not numeric in baseline",
            SkipReason::MissingFromCurrent => "missing from current dataset",
            SkipReason::NotNumericInCurrent => "not numeric in current dataset",
            SkipReason::NoSamples => "no observations on one side",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetricThresholds;
    use crate::data::Column;
    use crate::drift::classify::Severity;

    fn ramp(n: usize, scale: f64, offset: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * scale + offset).collect()
    }

    #[test]
    fn test_identical_datasets_are_good() {
        let ds = Dataset::new()
            .with_numeric("age", ramp(100, 0.5, 18.0))
            .with_numeric("income", ramp(100, 310.0, 20_000.0));
        let report = DriftEngine::default().build_report(&ds, &ds.clone());
        assert_eq!(report.total_features(), 2);
        assert_eq!(report.drifting_features(), 0);
        for r in &report {
            assert_eq!(r.metrics, DivergenceMetrics::default());
            assert_eq!(r.severity, Severity::Good);
        }
    }

    #[test]
    fn test_report_follows_baseline_column_order() {
        let baseline = Dataset::new()
            .with_numeric("c", ramp(50, 1.0, 0.0))
            .with_numeric("a", ramp(50, 1.0, 0.0))
            .with_numeric("b", ramp(50, 1.0, 0.0));
        let current = Dataset::new()
            .with_numeric("b", ramp(50, 1.0, 0.0))
            .with_numeric("a", ramp(50, 1.0, 0.0))
            .with_numeric("c", ramp(50, 1.0, 0.0));
        let report = DriftEngine::default().build_report(&baseline, &current);
        let names: Vec<_> = report.feature_names().collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_ineligible_features_are_skipped() {
        let baseline = Dataset::new()
            .with_numeric("kept", ramp(40, 1.0, 0.0))
            .with_numeric("only_in_baseline", ramp(40, 1.0, 0.0))
            .with_column(Column::categorical("region", vec![Some("eu".into()); 40]))
            .with_numeric("became_text", ramp(40, 1.0, 0.0))
            .with_column(Column::numeric("empty_current", vec![Some(1.0); 40]))
            .with_column(Column::numeric("empty_baseline", vec![None; 40]));
        let current = Dataset::new()
            .with_numeric("kept", ramp(40, 1.0, 0.0))
            .with_column(Column::categorical("region", vec![Some("us".into()); 40]))
            .with_column(Column::categorical("became_text", vec![Some("n/a".into()); 40]))
            .with_column(Column::numeric("empty_current", vec![None; 40]))
            .with_numeric("empty_baseline", ramp(40, 1.0, 0.0))
            .with_numeric("only_in_current", ramp(40, 1.0, 0.0));
        let report = DriftEngine::default().build_report(&baseline, &current);
        let names: Vec<_> = report.feature_names().collect();
        assert_eq!(names, vec!["kept"]);
        assert_eq!(report.baseline_rows, 40);
    }

    #[test]
    fn test_shifted_feature_is_critical() {
        let baseline = Dataset::new().with_numeric("income", ramp(500, 1.0, 0.0));
        let current = Dataset::new().with_numeric("income", ramp(500, 1.0, 250.0));
        let report = DriftEngine::default().build_report(&baseline, &current);
        let income = report.get("income").unwrap();
        assert_eq!(income.severity, Severity::Critical);
        assert!(income.metrics.psi >= 0.2);
        assert!((income.metrics.ks - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_constant_feature_degrades_to_zero() {
        let ds = Dataset::new().with_numeric("flag", vec![1.0; 30]);
        let report = DriftEngine::default().build_report(&ds, &ds);
        let flag = report.get("flag").unwrap();
        assert_eq!(flag.metrics.psi, 0.0);
        assert_eq!(flag.metrics.kl, 0.0);
        assert_eq!(flag.severity, Severity::Good);
    }

    #[test]
    fn test_constant_baseline_still_reports_ks() {
        let baseline = Dataset::new().with_numeric("x", vec![1.0; 30]);
        let current = Dataset::new().with_numeric("x", vec![2.0; 30]);
        let report = DriftEngine::default().build_report(&baseline, &current);
        let x = report.get("x").unwrap();
        assert_eq!(x.metrics.psi, 0.0);
        assert_eq!(x.metrics.kl, 0.0);
        assert_eq!(x.metrics.ks, 1.0);
        assert_eq!(x.severity, Severity::Critical);
    }

    #[test]
    fn test_metrics_are_rounded() {
        let baseline = Dataset::new().with_numeric("x", ramp(97, 1.0, 0.0));
        let current = Dataset::new().with_numeric("x", ramp(89, 1.07, 3.0));
        let report = DriftEngine::default().build_report(&baseline, &current);
        let x = report.get("x").unwrap();
        for v in [x.metrics.psi, x.metrics.ks, x.metrics.kl] {
            assert_eq!(round_to(v, 4), v);
        }
    }

    #[test]
    fn test_engine_uses_configured_thresholds() {
        let mut config = DriftConfig::default();
        config.thresholds.psi = MetricThresholds::new(50.0, 100.0);
        config.thresholds.ks = MetricThresholds::new(2.0, 3.0);
        config.thresholds.kl = MetricThresholds::new(50.0, 100.0);
        let engine = DriftEngine::new(config).unwrap();
        let baseline = Dataset::new().with_numeric("x", ramp(100, 1.0, 0.0));
        let current = Dataset::new().with_numeric("x", ramp(100, 1.0, 500.0));
        let report = engine.build_report(&baseline, &current);
        assert_eq!(report.get("x").unwrap().severity, Severity::Good);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = DriftConfig::default();
        config.binning.bucket_count = 0;
        assert!(DriftEngine::new(config).is_err());
    }
}
