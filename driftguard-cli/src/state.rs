//! Shared application state for the HTTP API.

use driftguard_core::data::{CsvSource, Dataset, DatasetSource};
use driftguard_core::{DriftConfig, DriftEngine, DriftError};
use std::path::Path;
use std::sync::Arc;

pub type SharedState = Arc<AppState>;

/// Engine plus where to read both datasets from. Datasets are re-read on every
/// request so the API always reflects the files on disk.
pub struct AppState {
    pub engine: DriftEngine,
    pub baseline: Arc<dyn DatasetSource>,
    pub current: Arc<dyn DatasetSource>,
}

impl AppState {
    pub fn new(
        engine: DriftEngine,
        baseline: Arc<dyn DatasetSource>,
        current: Arc<dyn DatasetSource>,
    ) -> Self {
        Self {
            engine,
            baseline,
            current,
        }
    }

    /// CSV sources from `config.data`, with relative paths resolved against `workspace`.
    pub fn from_config(config: DriftConfig, workspace: &Path) -> Result<Self, DriftError> {
        let delimiter = config.data.delimiter;
        let baseline = CsvSource::new(workspace.join(&config.data.baseline_path))
            .with_delimiter(delimiter);
        let current =
            CsvSource::new(workspace.join(&config.data.current_path)).with_delimiter(delimiter);
        Ok(Self::new(
            DriftEngine::new(config)?,
            Arc::new(baseline),
            Arc::new(current),
        ))
    }

    pub fn shared(self) -> SharedState {
        Arc::new(self)
    }

    /// Load both datasets concurrently.
    pub async fn load_datasets(&self) -> Result<(Dataset, Dataset), DriftError> {
        tokio::try_join!(self.baseline.load(), self.current.load())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("baseline", &self.baseline.describe())
            .field("current", &self.current.describe())
            .finish_non_exhaustive()
    }
}
