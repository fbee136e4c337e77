//! Summary statistics shown next to distribution charts.

use crate::data::dataset::Sample;
use serde::{Deserialize, Serialize};

/// Distribution summary of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// Summarize a sample, or `None` when it holds no observations.
    pub fn from_sample(sample: &Sample) -> Option<Self> {
        let n = sample.len();
        if n == 0 {
            return None;
        }
        let mean = sample.values().iter().sum::<f64>() / n as f64;
        let variance = sample
            .values()
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        Some(Self {
            mean,
            median: sample.percentile(50.0)?,
            std: variance.sqrt(),
            min: sample.min()?,
            max: sample.max()?,
        })
    }
}
