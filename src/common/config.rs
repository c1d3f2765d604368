//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::{config_override, default_config_path};
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Process run settings
    #[serde(default)]
    pub run: RunConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Process run settings
#[derive(Debug, Deserialize, Default)]
pub struct RunConfig {
    /// Kill the program if it has not exited after this many seconds.
    /// Unset means wait for as long as it takes.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RunConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Report settings
#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    /// Print the pass/fail summary after all scenarios ran
    #[serde(default = "default_summary")]
    pub summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            summary: default_summary(),
        }
    }
}

fn default_summary() -> bool {
    true
}

impl Config {
    /// Load configuration from `PIPECHECK_CONFIG` or the default config file
    ///
    /// A file named through `PIPECHECK_CONFIG` must exist. A missing default
    /// file means default configuration.
    pub fn load() -> Result<Self> {
        Self::load_resolved(config_override(), default_config_path())
    }

    fn load_resolved(explicit: Option<PathBuf>, default: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(&path);
        }
        match default {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.run.timeout().is_none());
        assert!(config.report.summary);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.run.timeout_secs.is_none());
        assert!(config.report.summary);
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            [run]
            timeout_secs = 15

            [report]
            summary = false
            "#,
        )
        .unwrap();
        assert_eq!(config.run.timeout(), Some(Duration::from_secs(15)));
        assert!(!config.report.summary);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[run]\ntimeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, crate::Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = Config::load_from(Path::new("/nonexistent/pipecheck.toml")).unwrap_err();
        assert!(matches!(err, crate::Error::FileRead { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load_resolved(
            Some(PathBuf::from("/nonexistent/typo.toml")),
            Some(PathBuf::from("/nonexistent/pipecheck/config.toml")),
        )
        .unwrap_err();
        match err {
            crate::Error::FileRead { path, .. } => assert_eq!(path, "/nonexistent/typo.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let config =
            Config::load_resolved(None, Some(PathBuf::from("/nonexistent/pipecheck/config.toml")))
                .unwrap();
        assert!(config.run.timeout().is_none());
        assert!(config.report.summary);
    }

    #[test]
    fn test_explicit_file_wins_over_default() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("explicit.toml");
        let default = dir.path().join("config.toml");
        std::fs::write(&explicit, "[run]\ntimeout_secs = 7\n").unwrap();
        std::fs::write(&default, "[run]\ntimeout_secs = 99\n").unwrap();

        let config = Config::load_resolved(Some(explicit), Some(default)).unwrap();
        assert_eq!(config.run.timeout_secs, Some(7));
    }
}
