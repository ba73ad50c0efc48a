//! TOML configuration for the receiver (`relay-receiver.toml`).
//!
//! ```toml
//! [network]
//! port = 7777
//! bind_address = "0.0.0.0"
//!
//! [actuation]
//! stickiness_window_ms = 10
//! injections_per_assert = 2
//! boost_thread_priority = true
//! log_level = "info"
//! ```
//!
//! Every field has a serde default, so a missing file or a file with only some
//! keys still produces a complete [`ReceiverConfig`].

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use relay_core::config::{default_config_path, load_or_default, ConfigError};
use relay_core::DEFAULT_PORT;
use serde::{Deserialize, Serialize};

use crate::application::actuate_motion::{StickinessConfig, DEFAULT_INJECTIONS_PER_ASSERT};

/// File name under the platform config directory.
pub const CONFIG_FILE_NAME: &str = "relay-receiver.toml";

/// Top-level receiver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReceiverConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub actuation: ActuationConfig,
}

/// Where to listen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,
}

/// Stickiness tuning and actor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActuationConfig {
    #[serde(default = "default_window_ms")]
    pub stickiness_window_ms: u64,
    #[serde(default = "default_injections_per_assert")]
    pub injections_per_assert: u8,
    #[serde(default = "default_true")]
    pub boost_thread_priority: bool,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}
fn default_window_ms() -> u64 {
    10
}
fn default_injections_per_assert() -> u8 {
    DEFAULT_INJECTIONS_PER_ASSERT
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
        }
    }
}

impl Default for ActuationConfig {
    fn default() -> Self {
        Self {
            stickiness_window_ms: default_window_ms(),
            injections_per_assert: default_injections_per_assert(),
            boost_thread_priority: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl ActuationConfig {
    /// The stickiness parameters, with `injections_per_assert` raised to at
    /// least 1.
    pub fn stickiness(&self) -> StickinessConfig {
        StickinessConfig {
            window: Duration::from_millis(self.stickiness_window_ms),
            injections_per_assert: self.injections_per_assert.max(1),
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

/// Loads the receiver config from `path`, or defaults if it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<ReceiverConfig, ConfigError> {
    load_or_default(path)
}
