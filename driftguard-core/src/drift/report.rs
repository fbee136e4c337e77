//! Per-feature drift results and the report that collects them.

use crate::drift::classify::{DivergenceMetrics, Severity};
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Drift of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDriftResult {
    pub feature_name: String,
    pub metrics: DivergenceMetrics,
    pub severity: Severity,
}

impl FeatureDriftResult {
    pub fn psi(&self) -> f64 {
        self.metrics.psi
    }
}

/// Wire form of a single feature: `{psi, ks, kl, status}`.
#[derive(Serialize)]
struct FeatureEntry<'a> {
    psi: f64,
    ks: f64,
    kl: f64,
    status: &'a Severity,
}

impl<'a> From<&'a FeatureDriftResult> for FeatureEntry<'a> {
    fn from(r: &'a FeatureDriftResult) -> Self {
        Self {
            psi: r.metrics.psi,
            ks: r.metrics.ks,
            kl: r.metrics.kl,
            status: &r.severity,
        }
    }
}

/// Drift results for every feature common to both datasets, in baseline column
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftReport {
    features: Vec<FeatureDriftResult>,
    pub baseline_rows: usize,
    pub current_rows: usize,
    pub generated_at: DateTime<Utc>,
}

impl DriftReport {
    pub fn new(
        features: Vec<FeatureDriftResult>,
        baseline_rows: usize,
        current_rows: usize,
    ) -> Self {
        Self {
            features,
            baseline_rows,
            current_rows,
            generated_at: Utc::now(),
        }
    }

    pub fn get(&self, feature: &str) -> Option<&FeatureDriftResult> {
        self.features.iter().find(|f| f.feature_name == feature)
    }

    pub fn features(&self) -> &[FeatureDriftResult] {
        &self.features
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureDriftResult> {
        self.features.iter()
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|f| f.feature_name.as_str())
    }

    pub fn total_features(&self) -> usize {
        self.features.len()
    }

    pub fn drifting_features(&self) -> usize {
        self.features
            .iter()
            .filter(|f| f.severity.is_drifting())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl<'a> IntoIterator for &'a DriftReport {
    type Item = &'a FeatureDriftResult;
    type IntoIter = std::slice::Iter<'a, FeatureDriftResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

struct FeatureMap<'a>(&'a [FeatureDriftResult]);

impl Serialize for FeatureMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for result in self.0 {
            map.serialize_entry(&result.feature_name, &FeatureEntry::from(result))?;
        }
        map.end()
    }
}

impl Serialize for DriftReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("DriftReport", 6)?;
        s.serialize_field("features", &FeatureMap(&self.features))?;
        s.serialize_field("total_features", &self.total_features())?;
        s.serialize_field("drifting_features", &self.drifting_features())?;
        s.serialize_field("baseline_rows", &self.baseline_rows)?;
        s.serialize_field("current_rows", &self.current_rows)?;
        s.serialize_field("generated_at", &self.generated_at)?;
        s.end()
    }
}

/// Round to `digits` decimal places.
///
/// Rounds the exact binary value, ties to even, through the float formatter:
/// `0.125` becomes `0.12` and `0.075` (stored just below) becomes `0.07`.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", digits as usize, value)
        .parse()
        .unwrap_or(value)
}
