use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use gof_behavioral::TimeServiceConfig;

/// Settings read from the `--config` TOML file. Every key is optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Sort policy used when `gof sort` gets no `--policy`.
    pub sort_policy: String,
    /// Real seconds `gof alarm` runs when `--seconds` is not given.
    pub alarm_seconds: u64,
    pub time_service: TimeServiceSettings,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            sort_policy: "bubble".into(),
            alarm_seconds: 2,
            time_service: TimeServiceSettings::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeServiceSettings {
    pub speed: u32,
    pub tick_ms: u64,
}

impl Default for TimeServiceSettings {
    fn default() -> Self {
        let defaults = TimeServiceConfig::default();
        Self {
            speed: defaults.speed,
            tick_ms: defaults.tick.as_millis() as u64,
        }
    }
}

impl TimeServiceSettings {
    pub fn to_service_config(&self) -> TimeServiceConfig {
        TimeServiceConfig {
            speed: self.speed,
            tick: Duration::from_millis(self.tick_ms),
        }
        .normalized()
    }
}

impl CatalogueConfig {
    /// Read the file at `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let c = CatalogueConfig::load(None).unwrap();
        assert_eq!(c.sort_policy, "bubble");
        assert_eq!(c.alarm_seconds, 2);
        assert_eq!(c.time_service.speed, 1800);
        assert_eq!(c.time_service.tick_ms, 100);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sort_policy = \"selection\"\n\n[time_service]\nspeed = 60").unwrap();
        let c = CatalogueConfig::load(Some(file.path())).unwrap();
        assert_eq!(c.sort_policy, "selection");
        assert_eq!(c.alarm_seconds, 2);
        assert_eq!(c.time_service.speed, 60);
        assert_eq!(c.time_service.tick_ms, 100);
    }

    #[test]
    fn service_config_conversion_clamps_zero() {
        let settings = TimeServiceSettings { speed: 0, tick_ms: 0 };
        let service = settings.to_service_config();
        assert_eq!(service.speed, 1);
        assert_eq!(service.tick, Duration::from_millis(1));
    }

    #[test]
    fn bad_files_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(CatalogueConfig::load(Some(&missing)).is_err());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "alarm_seconds = \"soon\"").unwrap();
        let err = CatalogueConfig::load(Some(&bad)).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }
}
