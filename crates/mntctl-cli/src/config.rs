use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::ValueEnum;
use mntctl_common::error::{MntError, Result};

pub const SNAPSHOT_ENV: &str = "MNTCTL_SNAPSHOT";
pub const COLOR_ENV: &str = "MNTCTL_COLOR";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Always,
    Never,
    #[default]
    Auto,
}

impl ColorMode {
    pub fn enabled(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => console::colors_enabled(),
        }
    }
}

impl FromStr for ColorMode {
    type Err = MntError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            "auto" | "" => Ok(Self::Auto),
            _ => Err(MntError::invalid_value("color", value)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    pub snapshot: Option<PathBuf>,
    pub color: ColorMode,
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var(SNAPSHOT_ENV).ok(),
            std::env::var(COLOR_ENV).ok(),
        )
    }

    fn from_vars(snapshot: Option<String>, color: Option<String>) -> Result<Self> {
        let snapshot = snapshot
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        let color = color
            .as_deref()
            .map(str::parse::<ColorMode>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self { snapshot, color })
    }

    /// Command line flags win over the environment.
    pub fn with_overrides(mut self, snapshot: Option<PathBuf>, color: Option<ColorMode>) -> Self {
        if let Some(snapshot) = snapshot {
            self.snapshot = Some(snapshot);
        }
        if let Some(color) = color {
            self.color = color;
        }
        self
    }

    pub fn snapshot_path(&self) -> Result<&Path> {
        self.snapshot.as_deref().ok_or_else(|| {
            MntError::SnapshotUnavailable(format!(
                "pass --snapshot or set {SNAPSHOT_ENV}"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{CliConfig, ColorMode};

    #[test]
    fn reads_snapshot_and_color() {
        let config =
            CliConfig::from_vars(Some(" /tmp/snap.json ".to_string()), Some("NEVER".to_string()))
                .unwrap();

        assert_eq!(config.snapshot, Some(PathBuf::from("/tmp/snap.json")));
        assert_eq!(config.color, ColorMode::Never);
        assert!(!config.color.enabled());
    }

    #[test]
    fn defaults_when_unset() {
        let config = CliConfig::from_vars(None, None).unwrap();

        assert_eq!(config, CliConfig::default());
        assert_eq!(config.color, ColorMode::Auto);
        assert_eq!(
            config.snapshot_path().unwrap_err().error_code(),
            "SnapshotUnavailable"
        );
    }

    #[test]
    fn rejects_unknown_color() {
        let err = CliConfig::from_vars(None, Some("rainbow".to_string())).unwrap_err();
        assert_eq!(err.error_code(), "InvalidFilterValue");
    }

    #[test]
    fn flags_override_environment() {
        let config = CliConfig::from_vars(Some("env.json".to_string()), None)
            .unwrap()
            .with_overrides(Some(PathBuf::from("flag.json")), Some(ColorMode::Always));

        assert_eq!(config.snapshot_path().unwrap(), PathBuf::from("flag.json"));
        assert!(config.color.enabled());
    }
}
