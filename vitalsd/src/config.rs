use crate::sampler::Thresholds;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/vitals/vitals.toml";
pub const CONFIG_ENV: &str = "VITALS_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub thresholds: Thresholds,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub listen_addr: String,
    pub sample_interval_secs: u64,
    /// Points kept per history series.
    pub history_max_points: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            sample_interval_secs: 2,
            history_max_points: 300,
        }
    }
}

impl RuntimeConfig {
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// `explicit`, then `VITALS_CONFIG`, then the packaged default.
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// A missing file means defaults, unless the path was given explicitly.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit);
        if !path.exists() {
            if explicit.is_some() {
                bail!("config file {} does not exist", path.display());
            }
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::from_path(&path)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("cpu", self.thresholds.cpu),
            ("memory", self.thresholds.memory),
            ("disk", self.thresholds.disk),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                bail!("thresholds.{name} must be in (0, 100], got {value}");
            }
        }
        if self.runtime.history_max_points == 0 {
            bail!("runtime.history_max_points must be at least 1");
        }
        if self.runtime.sample_interval_secs == 0 {
            bail!("runtime.sample_interval_secs must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.runtime.history_max_points, 300);
        assert_eq!(config.runtime.sample_interval(), Duration::from_secs(2));
        assert_eq!(config.thresholds.disk, 90.0);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::parse(
            r#"
            [thresholds]
            cpu = 70.0

            [runtime]
            history_max_points = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.cpu, 70.0);
        assert_eq!(config.thresholds.memory, 85.0);
        assert_eq!(config.runtime.history_max_points, 60);
        assert_eq!(config.runtime.listen_addr, "0.0.0.0:5000");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        assert!(Config::parse("[thresholds]\ncpu = 0.0\n").is_err());
        assert!(Config::parse("[thresholds]\ndisk = 100.5\n").is_err());
        assert!(Config::parse("[thresholds]\nmemory = 100.0\n").is_ok());
    }

    #[test]
    fn rejects_zero_capacity_and_interval() {
        assert!(Config::parse("[runtime]\nhistory_max_points = 0\n").is_err());
        assert!(Config::parse("[runtime]\nsample_interval_secs = 0\n").is_err());
    }

    #[test]
    fn loads_from_explicit_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[runtime]\nlisten_addr = \"127.0.0.1:9100\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.runtime.listen_addr, "127.0.0.1:9100");
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let raw = toml::to_string(&config).unwrap();
        assert_eq!(Config::parse(&raw).unwrap(), config);
    }
}
