//! Severity policy: maps a bundle of divergence metrics to a drift tier.

use crate::config::{MetricThresholds, ThresholdConfig};
use crate::drift::divergence::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Drift severity, ordered `Good < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Good,
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Good => "good",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }

    /// Anything but `Good` counts as drifting.
    pub fn is_drifting(&self) -> bool {
        *self != Severity::Good
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PSI, KS and KL for one feature.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DivergenceMetrics {
    pub psi: f64,
    pub ks: f64,
    pub kl: f64,
}

impl DivergenceMetrics {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Psi => self.psi,
            Metric::Ks => self.ks,
            Metric::Kl => self.kl,
        }
    }
}

/// Tier plus the metrics that pushed the feature into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub severity: Severity,
    pub triggered_by: Vec<Metric>,
}

/// OR-across-metrics classifier: any single metric at its critical cut-off makes
/// the feature critical, otherwise any metric at its warning cut-off makes it a
/// warning.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureClassifier {
    thresholds: ThresholdConfig,
}

impl FeatureClassifier {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    fn thresholds_for(&self, metric: Metric) -> MetricThresholds {
        match metric {
            Metric::Psi => self.thresholds.psi,
            Metric::Ks => self.thresholds.ks,
            Metric::Kl => self.thresholds.kl,
        }
    }

    pub fn classify(&self, metrics: &DivergenceMetrics) -> Severity {
        self.classify_detailed(metrics).severity
    }

    pub fn classify_detailed(&self, metrics: &DivergenceMetrics) -> Classification {
        let meeting = |pick: fn(MetricThresholds) -> f64| -> Vec<Metric> {
            Metric::ALL
                .into_iter()
                .filter(|&m| metrics.get(m) >= pick(self.thresholds_for(m)))
                .collect()
        };

        let critical = meeting(|t| t.critical);
        if !critical.is_empty() {
            return Classification {
                severity: Severity::Critical,
                triggered_by: critical,
            };
        }
        let warning = meeting(|t| t.warning);
        if !warning.is_empty() {
            return Classification {
                severity: Severity::Warning,
                triggered_by: warning,
            };
        }
        Classification {
            severity: Severity::Good,
            triggered_by: Vec::new(),
        }
    }
}

impl Default for FeatureClassifier {
    fn default() -> Self {
        Self::new(ThresholdConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(psi: f64, ks: f64, kl: f64) -> DivergenceMetrics {
        DivergenceMetrics { psi, ks, kl }
    }

    #[test]
    fn test_severity_ordering_and_display() {
        assert!(Severity::Good < Severity::Warning);
        assert!(Severity::Warning < Severity::Critical);
        assert_eq!(Severity::Critical.to_string(), "critical");
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert!(!Severity::Good.is_drifting());
        assert!(Severity::Warning.is_drifting());
    }

    #[test]
    fn test_thresholds_are_inclusive() {
        let c = FeatureClassifier::default();
        assert_eq!(c.classify(&m(0.0, 0.0, 0.0)), Severity::Good);
        assert_eq!(c.classify(&m(0.1, 0.0, 0.0)), Severity::Warning);
        assert_eq!(c.classify(&m(0.2, 0.0, 0.0)), Severity::Critical);
        assert_eq!(c.classify(&m(0.0, 0.05, 0.0)), Severity::Warning);
        assert_eq!(c.classify(&m(0.0, 0.1, 0.0)), Severity::Critical);
        assert_eq!(c.classify(&m(0.0, 0.0, 0.2)), Severity::Warning);
        assert_eq!(c.classify(&m(0.0, 0.0, 0.5)), Severity::Critical);
        assert_eq!(c.classify(&m(0.0999, 0.0499, 0.1999)), Severity::Good);
    }

    #[test]
    fn test_single_metric_forces_escalation() {
        let c = FeatureClassifier::default();
        let detail = c.classify_detailed(&m(0.01, 0.12, 0.0));
        assert_eq!(detail.severity, Severity::Critical);
        assert_eq!(detail.triggered_by, vec![Metric::Ks]);

        let detail = c.classify_detailed(&m(0.15, 0.07, 0.0));
        assert_eq!(detail.severity, Severity::Warning);
        assert_eq!(detail.triggered_by, vec![Metric::Psi, Metric::Ks]);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = ThresholdConfig {
            psi: MetricThresholds::new(0.5, 1.0),
            ..ThresholdConfig::default()
        };
        let c = FeatureClassifier::new(thresholds);
        assert_eq!(c.classify(&m(0.3, 0.0, 0.0)), Severity::Good);
        assert_eq!(c.classify(&m(0.6, 0.0, 0.0)), Severity::Warning);
    }

    #[test]
    fn test_monotone_in_each_metric() {
        let c = FeatureClassifier::default();
        let base = m(0.12, 0.02, 0.3);
        for metric in Metric::ALL {
            let mut prev = c.classify(&base);
            for step in 1..=40 {
                let mut bumped = base;
                let v = base.get(metric) + step as f64 * 0.025;
                match metric {
                    Metric::Psi => bumped.psi = v,
                    Metric::Ks => bumped.ks = v,
                    Metric::Kl => bumped.kl = v,
                }
                let next = c.classify(&bumped);
                assert!(next >= prev, "{metric} step {step}: {next} < {prev}");
                prev = next;
            }
            assert_eq!(prev, Severity::Critical);
        }
    }
}
