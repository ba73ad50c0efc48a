//! Shared TOML config-file plumbing for the relay binaries.
//!
//! Each binary owns its own schema (see `relay-sender`'s and
//! `relay-receiver`'s `infrastructure::storage::config`); this module only
//! resolves where files live and loads them.
//!
//! Default locations:
//! - Windows:  `%APPDATA%\InputRelay\<file>`
//! - Linux:    `$XDG_CONFIG_HOME/input-relay/<file>` or `~/.config/input-relay/<file>`
//! - macOS:    `~/Library/Application Support/InputRelay/<file>`
//!
//! Schemas annotate every field with `#[serde(default = "...")]`, so a missing
//! or partial file still yields a complete config.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Resolves `<platform config dir>/<file_name>`.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the base directory cannot
/// be determined from the environment.
pub fn default_config_path(file_name: &str) -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join(file_name))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads a config from `path`, returning `T::default()` if the file does not
/// exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found; using defaults");
            Ok(T::default())
        }
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolves the per-user config directory for the relay.
pub fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("InputRelay"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("input-relay"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("InputRelay")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Sample {
        #[serde(default = "default_port")]
        port: u16,
        #[serde(default)]
        name: String,
    }

    fn default_port() -> u16 {
        7777
    }

    fn temp_path(file: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("relay-core-test-{}", uuid::Uuid::new_v4()))
            .join(file)
    }

    #[test]
    fn test_missing_file_yields_default() {
        let path = temp_path("absent.toml");
        let loaded: Sample = load_or_default(&path).expect("load");
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields_from_serde_defaults() {
        // Arrange
        let path = temp_path("partial.toml");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "name = \"desk\"\n").expect("write");

        // Act
        let loaded: Sample = load_or_default(&path).expect("load");

        // Assert
        assert_eq!(loaded.port, 7777);
        assert_eq!(loaded.name, "desk");
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let path = temp_path("bad.toml");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, "port = [not toml").expect("write");

        let result: Result<Sample, _> = load_or_default(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
