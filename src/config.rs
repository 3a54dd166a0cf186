//! Runtime configuration.
//!
//! Everything has a default, so the tool runs without a config file. To
//! override, point `JOYPORT_CONFIG` at a TOML file:
//!
//! ```toml
//! base_address = 0x278      # LPT2
//! poll_interval_ms = 10
//! event_timing = "deferred"
//! clear_screen = true
//! log_level = "info"
//! ```
//!
//! Unknown keys are rejected so a typo does not silently fall back to a default.

use crate::error::{Error, Result};
use crate::port::{DEFAULT_BASE, PORT_SPAN};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "JOYPORT_CONFIG";

/// When the event shown in a frame is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTiming {
    /// Read at the top of the cycle and shown in the same frame.
    #[default]
    Immediate,
    /// Read after the sleep and shown in the next frame.
    Deferred,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// I/O address of the data register.
    pub base_address: u16,
    /// Pause after each frame.
    pub poll_interval_ms: u64,
    pub event_timing: EventTiming,
    /// Erase the terminal before each frame.
    pub clear_screen: bool,
    /// `trace`, `debug`, `info`, `warn` or `error`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE,
            poll_interval_ms: 10,
            event_timing: EventTiming::default(),
            clear_screen: true,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load from the file named by [`CONFIG_ENV`], or defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&text, path)
    }

    /// Parse TOML text; `origin` only labels errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let invalid = |reason: String| Error::Config {
            path: PathBuf::from(origin),
            reason,
        };
        let config: Config = toml::from_str(text).map_err(|e| invalid(e.to_string()))?;
        config.level().map_err(invalid)?;
        if config.base_address > u16::MAX - (PORT_SPAN - 1) {
            return Err(invalid(format!(
                "base_address 0x{:x} leaves no room for {PORT_SPAN} registers",
                config.base_address
            )));
        }
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn level(&self) -> Result<tracing::Level, String> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| format!("unknown log level {:?}", self.log_level))
    }
}
