//! TOML configuration for the sender (`relay-sender.toml`).
//!
//! ```toml
//! [capture]
//! hotkey = "ALT+1"
//! pin_cursor = true
//! log_level = "info"
//!
//! [network]
//! port = 7777
//! ```

use std::path::{Path, PathBuf};

use relay_core::config::{default_config_path, load_or_default, ConfigError};
use relay_core::{HotkeyBinding, HotkeyParseError, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// File name under the platform config directory.
pub const CONFIG_FILE_NAME: &str = "relay-sender.toml";

/// Top-level sender configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SenderConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Capture behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureConfig {
    /// Toggle chord in `[MOD(+MOD)*+]KEY` form.
    #[serde(default = "default_hotkey")]
    pub hotkey: String,
    /// Confine the local cursor while capture is active.
    #[serde(default = "default_true")]
    pub pin_cursor: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Target UDP port.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_hotkey() -> String {
    HotkeyBinding::default().to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            hotkey: default_hotkey(),
            pin_cursor: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl CaptureConfig {
    /// Picks the toggle binding.
    ///
    /// An explicit `cli` value must parse.  The config file value is advisory:
    /// if it does not parse, a warning is logged and `ALT+1` is used.
    ///
    /// # Errors
    ///
    /// Returns [`HotkeyParseError`] only for an invalid `cli` value.
    pub fn resolve_hotkey(&self, cli: Option<&str>) -> Result<HotkeyBinding, HotkeyParseError> {
        if let Some(text) = cli {
            return text.parse();
        }
        match self.hotkey.parse() {
            Ok(binding) => Ok(binding),
            Err(e) => {
                warn!(
                    "ignoring hotkey '{}' from config ({e}); using {}",
                    self.hotkey,
                    HotkeyBinding::default()
                );
                Ok(HotkeyBinding::default())
            }
        }
    }
}

/// Resolves the default config file location.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config
/// directory cannot be determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    default_config_path(CONFIG_FILE_NAME)
}

/// Loads the sender config from `path`, or defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<SenderConfig, ConfigError> {
    load_or_default(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::keymap::windows_vk::VK_F1;

    #[test]
    fn test_defaults_match_documented_values() {
        let cfg = SenderConfig::default();
        assert_eq!(cfg.capture.hotkey, "ALT+1");
        assert!(cfg.capture.pin_cursor);
        assert_eq!(cfg.capture.log_level, "info");
        assert_eq!(cfg.network.port, 7777);
    }

    #[test]
    fn test_partial_toml_keeps_defaults_for_missing_keys() {
        // Arrange
        let text = "[capture]\npin_cursor = false\n";

        // Act
        let cfg: SenderConfig = toml::from_str(text).expect("parse");

        // Assert
        assert!(!cfg.capture.pin_cursor);
        assert_eq!(cfg.capture.hotkey, "ALT+1");
        assert_eq!(cfg.network.port, 7777);
    }

    #[test]
    fn test_cli_hotkey_wins_over_config() {
        let capture = CaptureConfig {
            hotkey: "CTRL+K".to_string(),
            ..CaptureConfig::default()
        };

        let binding = capture.resolve_hotkey(Some("shift+f1")).expect("valid");

        assert_eq!(binding.key, VK_F1);
        assert!(binding.modifiers.shift);
        assert!(!binding.modifiers.ctrl);
    }

    #[test]
    fn test_invalid_cli_hotkey_is_an_error() {
        let capture = CaptureConfig::default();
        assert!(capture.resolve_hotkey(Some("HYPER+Q")).is_err());
    }

    #[test]
    fn test_invalid_config_hotkey_falls_back_to_default() {
        // Arrange
        let capture = CaptureConfig {
            hotkey: "CTRL+".to_string(),
            ..CaptureConfig::default()
        };

        // Act
        let binding = capture.resolve_hotkey(None).expect("falls back");

        // Assert
        assert_eq!(binding, HotkeyBinding::default());
    }

    #[test]
    fn test_config_hotkey_used_without_cli() {
        let capture = CaptureConfig {
            hotkey: "CTRL+SHIFT+K".to_string(),
            ..CaptureConfig::default()
        };
        let binding = capture.resolve_hotkey(None).expect("valid");
        assert_eq!(binding.to_string(), "CTRL+SHIFT+K");
    }
}
