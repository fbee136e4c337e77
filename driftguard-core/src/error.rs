//! Error types for the driftguard-core crate.

use thiserror::Error;

/// Top-level error type for drift operations.
///
/// Only `DataUnavailable`, `FeatureNotFound` and `Config` ever reach a caller
/// of the engine; the distribution-level variants are recovered per feature
/// through [`crate::drift::MetricOutcome`].
#[derive(Debug, Error)]
pub enum DriftError {
    #[error("Data unavailable from {source_name}: {reason}")]
    DataUnavailable {
        source_name: String,
        reason: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Degenerate distribution: {0}")]
    DegenerateDistribution(String),

    #[error("Computation failure: {0}")]
    ComputationFailure(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl DriftError {
    pub fn data_unavailable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
            cause: None,
        }
    }

    /// `DataUnavailable` that keeps the underlying error as its source.
    pub fn data_unavailable_from(
        source_name: impl Into<String>,
        reason: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.into(),
            cause: Some(Box::new(cause)),
        }
    }

    pub fn feature_not_found(name: impl Into<String>) -> Self {
        Self::FeatureNotFound(name.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error should abort the whole request rather than a single lookup.
    pub fn is_request_fatal(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable { .. } | Self::Config(_) | Self::Io(_) | Self::Serialization(_)
        )
    }
}

impl From<Box<figment::Error>> for DriftError {
    fn from(err: Box<figment::Error>) -> Self {
        Self::Config(err.to_string())
    }
}
