//! Condenses a drift report into the numbers shown on the monitoring dashboard.

use crate::config::DashboardConfig;
use crate::drift::{DriftReport, FeatureDriftResult, Severity, round_to};
use serde::{Deserialize, Serialize};

/// Tone of a metric card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Positive,
    Negative,
    Warning,
}

/// One headline figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub change: f64,
    pub status: CardStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: Severity,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetrainAction {
    RetrainUrgent,
    Monitor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub action: RetrainAction,
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSummary {
    /// Share of drifting features, two decimals.
    pub score: f64,
    pub drifting_count: usize,
    pub total_count: usize,
    pub recommendation: Recommendation,
}

/// A feature among the largest PSI values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopFeature {
    pub name: String,
    pub psi: f64,
    pub ks: f64,
    pub kl: f64,
    pub status: Severity,
    /// PSI scaled to a percentage for display.
    pub drift_score: f64,
}

impl From<&FeatureDriftResult> for TopFeature {
    fn from(r: &FeatureDriftResult) -> Self {
        Self {
            name: r.feature_name.clone(),
            psi: r.metrics.psi,
            ks: r.metrics.ks,
            kl: r.metrics.kl,
            status: r.severity,
            drift_score: round_to(r.metrics.psi * 100.0, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub health_score: u32,
    pub metrics: Vec<MetricCard>,
    pub alerts: Vec<Alert>,
    pub drift_summary: DriftSummary,
    pub top_features: Vec<TopFeature>,
}

/// Builds [`DashboardSummary`] values from reports.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummarizer {
    config: DashboardConfig,
}

impl DashboardSummarizer {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    pub fn summarize(&self, report: &DriftReport) -> DashboardSummary {
        let total = report.total_features();
        let drifting = report.drifting_features();
        let drift_score = drift_score(drifting, total);
        let health_score = health_score(drift_score);
        let top_features = self.top_features(report);
        let alerts = alerts_for(&top_features);

        let action = if drift_score > self.config.retrain_drift_score {
            RetrainAction::RetrainUrgent
        } else {
            RetrainAction::Monitor
        };

        tracing::info!(
            health_score,
            drift_score,
            drifting,
            total,
            alerts = alerts.len(),
            "Dashboard summary built"
        );

        DashboardSummary {
            health_score,
            metrics: self.metric_cards(report.current_rows, drift_score),
            alerts,
            drift_summary: DriftSummary {
                score: drift_score,
                drifting_count: drifting,
                total_count: total,
                recommendation: Recommendation {
                    action,
                    estimated_time: self.config.estimated_retrain_time.clone(),
                },
            },
            top_features,
        }
    }

    /// Features by PSI, largest first. Ties keep report order.
    pub fn top_features(&self, report: &DriftReport) -> Vec<TopFeature> {
        let mut ranked: Vec<&FeatureDriftResult> = report.iter().collect();
        ranked.sort_by(|a, b| b.psi().total_cmp(&a.psi()));
        ranked
            .into_iter()
            .take(self.config.top_features)
            .map(TopFeature::from)
            .collect()
    }

    /// Display-only accuracy figure derived from the drift score. It does not
    /// predict real model accuracy.
    pub fn estimated_accuracy(&self, drift_score: f64) -> f64 {
        (self.config.base_accuracy - drift_score * self.config.accuracy_penalty).max(0.0)
    }

    fn metric_cards(&self, current_rows: usize, drift_score: f64) -> Vec<MetricCard> {
        let accuracy = self.estimated_accuracy(drift_score);
        let drifting_notably = drift_score > 0.1;
        vec![
            MetricCard {
                label: "Total Predictions".to_string(),
                value: group_thousands(current_rows),
                change: 5.2,
                status: CardStatus::Positive,
            },
            MetricCard {
                label: "Avg Data Drift".to_string(),
                value: format!("{drift_score:.2}"),
                change: round_to(drift_score * 10.0, 2),
                status: if drifting_notably {
                    CardStatus::Negative
                } else {
                    CardStatus::Positive
                },
            },
            MetricCard {
                label: "Model Accuracy".to_string(),
                value: format!("{accuracy:.1}%"),
                change: if drifting_notably { -1.2 } else { 0.5 },
                status: if accuracy < 90.0 {
                    CardStatus::Warning
                } else {
                    CardStatus::Positive
                },
            },
        ]
    }
}

impl Default for DashboardSummarizer {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

/// Fraction of drifting features, rounded to two decimals; `0` for an empty report.
pub fn drift_score(drifting: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(drifting as f64 / total as f64, 2)
}

pub fn health_score(drift_score: f64) -> u32 {
    (100.0 - (drift_score * 100.0).round()).clamp(0.0, 100.0) as u32
}

/// One alert per drifting feature in `top`, numbered from 1.
fn alerts_for(top: &[TopFeature]) -> Vec<Alert> {
    top.iter()
        .filter(|f| f.status.is_drifting())
        .zip(1..)
        .map(|(f, id)| Alert {
            id,
            kind: f.status,
            message: match f.status {
                Severity::Critical => format!("Critical drift detected in '{}'", f.name),
                _ => format!("Warning: '{}' is showing signs of drift", f.name),
            },
            timestamp: "Just now".to_string(),
        })
        .collect()
}

/// `1234567` -> `"1,234,567"`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
