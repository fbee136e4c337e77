//! Dashboard-facing views derived from drift reports.

pub mod detail;
pub mod summary;

pub use detail::{FeatureDetail, HistogramBin};
pub use summary::{
    Alert, CardStatus, DashboardSummarizer, DashboardSummary, DriftSummary, MetricCard,
    Recommendation, RetrainAction, TopFeature,
};

use crate::drift::{DriftEngine, DriftReport};

impl DriftEngine {
    /// Dashboard summary of `report` under this engine's dashboard settings.
    pub fn summarize(&self, report: &DriftReport) -> DashboardSummary {
        DashboardSummarizer::new(self.config().dashboard.clone()).summarize(report)
    }
}
