//! Configuration system for DriftGuard.
//!
//! Uses `figment` for layered configuration: defaults -> user config -> workspace
//! config -> explicit file -> environment -> programmatic overrides. Every policy
//! constant of the drift engine (bucket counts, severity thresholds, dashboard
//! heuristics) lives here so that the engine can be built with varied settings.

use crate::drift::binning::BinningStrategy;
use crate::error::DriftError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for DriftGuard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftConfig {
    #[serde(default)]
    pub binning: BinningConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub detail: DetailConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Binning used by PSI and KL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinningConfig {
    /// Number of buckets before duplicate edges are collapsed.
    #[serde(default = "default_bucket_count")]
    pub bucket_count: usize,
    #[serde(default)]
    pub strategy: BinningStrategy,
    /// Proportion substituted for empty buckets. This is a smoothing bias that keeps
    /// `ln` finite, not a statistical correction.
    #[serde(default = "default_zero_floor")]
    pub zero_floor: f64,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            bucket_count: default_bucket_count(),
            strategy: BinningStrategy::default(),
            zero_floor: default_zero_floor(),
        }
    }
}

fn default_bucket_count() -> usize {
    10
}

fn default_zero_floor() -> f64 {
    0.0001
}

/// Warning/critical cut-offs for a single metric. A metric meets a tier when it is
/// greater than or equal to the cut-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThresholds {
    pub warning: f64,
    pub critical: f64,
}

impl MetricThresholds {
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }
}

/// Severity thresholds for every metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_psi_thresholds")]
    pub psi: MetricThresholds,
    #[serde(default = "default_ks_thresholds")]
    pub ks: MetricThresholds,
    #[serde(default = "default_kl_thresholds")]
    pub kl: MetricThresholds,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            psi: default_psi_thresholds(),
            ks: default_ks_thresholds(),
            kl: default_kl_thresholds(),
        }
    }
}

fn default_psi_thresholds() -> MetricThresholds {
    MetricThresholds::new(0.1, 0.2)
}

fn default_ks_thresholds() -> MetricThresholds {
    MetricThresholds::new(0.05, 0.1)
}

fn default_kl_thresholds() -> MetricThresholds {
    MetricThresholds::new(0.2, 0.5)
}

/// Report formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Decimal digits every metric is rounded to.
    #[serde(default = "default_precision")]
    pub precision: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

fn default_precision() -> u32 {
    4
}

/// Dashboard aggregation heuristics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Length of the top-features slice (alerts are only raised from this slice).
    #[serde(default = "default_top_features")]
    pub top_features: usize,
    /// Drift score above which retraining is recommended.
    #[serde(default = "default_retrain_drift_score")]
    pub retrain_drift_score: f64,
    #[serde(default = "default_estimated_retrain_time")]
    pub estimated_retrain_time: String,
    /// Accuracy shown on the dashboard when nothing drifts. Illustrative only.
    #[serde(default = "default_base_accuracy")]
    pub base_accuracy: f64,
    #[serde(default = "default_accuracy_penalty")]
    pub accuracy_penalty: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_features: default_top_features(),
            retrain_drift_score: default_retrain_drift_score(),
            estimated_retrain_time: default_estimated_retrain_time(),
            base_accuracy: default_base_accuracy(),
            accuracy_penalty: default_accuracy_penalty(),
        }
    }
}

fn default_top_features() -> usize {
    5
}

fn default_retrain_drift_score() -> f64 {
    0.2
}

fn default_estimated_retrain_time() -> String {
    "2 hours".to_string()
}

fn default_base_accuracy() -> f64 {
    95.0
}

fn default_accuracy_penalty() -> f64 {
    50.0
}

/// Per-feature detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailConfig {
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

impl Default for DetailConfig {
    fn default() -> Self {
        Self {
            histogram_bins: default_histogram_bins(),
        }
    }
}

fn default_histogram_bins() -> usize {
    20
}

/// Locations of the two datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_baseline_path")]
    pub baseline_path: PathBuf,
    #[serde(default = "default_current_path")]
    pub current_path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            baseline_path: default_baseline_path(),
            current_path: default_current_path(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_baseline_path() -> PathBuf {
    PathBuf::from("data/training_data.csv")
}

fn default_current_path() -> PathBuf {
    PathBuf::from("data/production_data.csv")
}

fn default_delimiter() -> char {
    ','
}

/// HTTP API bind address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl DriftConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), DriftError> {
        if self.binning.bucket_count == 0 {
            return Err(DriftError::config("binning.bucket_count must be at least 1"));
        }
        if self.binning.zero_floor.is_nan() || self.binning.zero_floor <= 0.0 {
            return Err(DriftError::config("binning.zero_floor must be positive"));
        }
        if self.detail.histogram_bins == 0 {
            return Err(DriftError::config("detail.histogram_bins must be at least 1"));
        }
        for (name, t) in [
            ("psi", self.thresholds.psi),
            ("ks", self.thresholds.ks),
            ("kl", self.thresholds.kl),
        ] {
            if t.warning > t.critical {
                return Err(DriftError::config(format!(
                    "thresholds.{name}: warning ({}) exceeds critical ({})",
                    t.warning, t.critical
                )));
            }
        }
        Ok(())
    }
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `DRIFTGUARD_`, `__` separates sections)
/// 3. Explicit config file (`--config`)
/// 4. Workspace-local config (`.driftguard/config.toml`)
/// 5. User config (`~/.config/driftguard/config.toml`)
/// 6. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&DriftConfig>,
) -> Result<DriftConfig, DriftError> {
    let mut figment = Figment::from(Serialized::defaults(DriftConfig::default()));

    if let Some(config_dir) = directories::ProjectDirs::from("dev", "driftguard", "driftguard") {
        let user_config = config_dir.config_dir().join("config.toml");
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".driftguard").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = config_file {
        if !path.exists() {
            return Err(DriftError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        figment = figment.merge(Toml::file(path));
    }

    // DRIFTGUARD_SERVER__PORT, DRIFTGUARD_THRESHOLDS__PSI__CRITICAL, ...
    figment = figment.merge(Env::prefixed("DRIFTGUARD_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: DriftConfig = figment.extract().map_err(Box::new)?;
    config.validate()?;
    Ok(config)
}

/// Render the effective configuration as TOML.
pub fn to_toml(config: &DriftConfig) -> Result<String, DriftError> {
    toml::to_string_pretty(config).map_err(|e| DriftError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DriftConfig::default();
        assert_eq!(config.binning.bucket_count, 10);
        assert_eq!(config.binning.strategy, BinningStrategy::Quantiles);
        assert!((config.binning.zero_floor - 0.0001).abs() < f64::EPSILON);
        assert_eq!(config.thresholds.psi, MetricThresholds::new(0.1, 0.2));
        assert_eq!(config.thresholds.ks, MetricThresholds::new(0.05, 0.1));
        assert_eq!(config.thresholds.kl, MetricThresholds::new(0.2, 0.5));
        assert_eq!(config.report.precision, 4);
        assert_eq!(config.dashboard.top_features, 5);
        assert_eq!(config.dashboard.estimated_retrain_time, "2 hours");
        assert_eq!(config.detail.histogram_bins, 20);
        assert_eq!(config.server.port, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = DriftConfig::default();
        let toml_str = to_toml(&config).unwrap();
        let deserialized: DriftConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = DriftConfig::default();
        config.thresholds.ks = MetricThresholds::new(0.3, 0.1);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("thresholds.ks"));
    }

    #[test]
    fn test_validate_rejects_zero_buckets_and_floor() {
        let mut config = DriftConfig::default();
        config.binning.bucket_count = 0;
        assert!(config.validate().is_err());

        let mut config = DriftConfig::default();
        config.binning.zero_floor = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None, None, None).unwrap();
        assert_eq!(config.binning.bucket_count, 10);
    }

    #[test]
    fn test_load_config_with_overrides() {
        let mut overrides = DriftConfig::default();
        overrides.dashboard.top_features = 3;
        overrides.thresholds.psi = MetricThresholds::new(0.05, 0.15);

        let config = load_config(None, None, Some(&overrides)).unwrap();
        assert_eq!(config.dashboard.top_features, 3);
        assert_eq!(config.thresholds.psi.critical, 0.15);
    }

    #[test]
    fn test_load_config_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".driftguard");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            r#"
[binning]
bucket_count = 20
strategy = "equal_width"

[thresholds.psi]
warning = 0.15
critical = 0.3

[server]
port = 8080
"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None, None).unwrap();
        assert_eq!(config.binning.bucket_count, 20);
        assert_eq!(config.binning.strategy, BinningStrategy::EqualWidth);
        assert_eq!(config.thresholds.psi, MetricThresholds::new(0.15, 0.3));
        // untouched sections keep their defaults
        assert_eq!(config.thresholds.kl, MetricThresholds::new(0.2, 0.5));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_load_config_missing_explicit_file() {
        let err = load_config(None, Some(Path::new("/nonexistent/driftguard.toml")), None)
            .unwrap_err();
        assert!(matches!(err, DriftError::Config(_)));
    }

    #[test]
    fn test_load_config_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[binning]\nbucket_count = 0\n").unwrap();
        let err = load_config(None, Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("bucket_count"));
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "driftguard.toml",
                "[report]\nprecision = 2\n\n[dashboard]\ntop_features = 4\n",
            )?;
            jail.set_env("DRIFTGUARD_REPORT__PRECISION", "6");

            let config = load_config(None, Some(Path::new("driftguard.toml")), None)
                .map_err(|e| figment::Error::from(e.to_string()))?;
            assert_eq!(config.report.precision, 6);
            assert_eq!(config.dashboard.top_features, 4);
            Ok(())
        });
    }
}
