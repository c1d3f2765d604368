//! Configuration paths
//!
//! The harness keeps no runtime state on disk; the only path it needs is
//! the optional configuration file.

use std::path::PathBuf;

/// Application name used for platform directories
const APP_NAME: &str = "pipecheck";

/// Environment variable that overrides the configuration file location
pub const CONFIG_ENV: &str = "PIPECHECK_CONFIG";

/// Get the configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/pipecheck/`
/// - macOS: `~/Library/Application Support/pipecheck/`
/// - Windows: `%APPDATA%\pipecheck\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Configuration file named explicitly through `PIPECHECK_CONFIG`
pub fn config_override() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV).map(PathBuf::from)
}

/// Platform location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
