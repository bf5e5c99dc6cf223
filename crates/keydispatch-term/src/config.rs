//! # Configuration
//!
//! ## Overview
//!
//! Binding tables and the inactivity timeout can be loaded from a TOML file:
//!
//! ```toml
//! [input]
//! timeout = true
//! timeoutlen = 1000
//!
//! [[bindings]]
//! mode = "normal"
//! keys = "Space Space"
//! action = "palette.open"
//! description = "Open the command palette"
//!
//! [[bindings]]
//! mode = "normal"
//! keys = "g g"
//! action = "directory.first"
//! scope = "directory"
//! ```
//!
//! Unknown fields are ignored, and every field of `[input]` has a default matching Vim's.
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use keydispatch::{KeyBinding, KeyError};

/// Errors returned while loading configuration.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// Failure to read the configuration file.
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failure to parse the configuration file.
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A binding's keys could not be parsed.
    #[error("Invalid keys {keys:?}: {source}")]
    InvalidKeys {
        /// The keys as written in the configuration.
        keys: String,

        /// What was wrong with them.
        source: KeyError,
    },
}

/// Settings for how pending keys time out.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct InputConfig {
    /// Whether pending keys time out at all.
    #[serde(default = "InputConfig::default_timeout")]
    pub timeout: bool,

    /// How long to wait for the next key, in milliseconds.
    #[serde(default = "InputConfig::default_timeoutlen")]
    pub timeoutlen: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            timeout: Self::default_timeout(),
            timeoutlen: Self::default_timeoutlen(),
        }
    }
}

impl InputConfig {
    const fn default_timeout() -> bool {
        true
    }

    const fn default_timeoutlen() -> u64 {
        1000
    }

    /// The inactivity timeout, or [None] if timeouts are disabled.
    pub fn timeout_duration(&self) -> Option<Duration> {
        if self.timeout {
            Some(Duration::from_millis(self.timeoutlen))
        } else {
            None
        }
    }
}

/// A binding as written in the configuration file.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct BindingConfig {
    /// The mode the binding is active in.
    pub mode: String,

    /// The whitespace-separated key steps.
    pub keys: String,

    /// The id of the action to run.
    pub action: String,

    /// An optional scope restricting the binding.
    #[serde(default)]
    pub scope: Option<String>,

    /// An optional description.
    #[serde(default)]
    pub description: Option<String>,
}

impl BindingConfig {
    /// Parse this entry into a [KeyBinding].
    pub fn to_binding(&self) -> Result<KeyBinding, ConfigError> {
        let mut binding = KeyBinding::new(self.mode.as_str(), &self.keys, self.action.as_str())
            .map_err(|source| ConfigError::InvalidKeys { keys: self.keys.clone(), source })?;

        binding.scope = self.scope.clone();
        binding.description = self.description.clone();

        Ok(binding)
    }
}

/// The contents of a configuration file.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Config {
    /// Timeout settings.
    #[serde(default)]
    pub input: InputConfig,

    /// The binding table, in declaration order.
    #[serde(default)]
    pub bindings: Vec<BindingConfig>,
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str::<Config>(s)?;

        Ok(config)
    }

    /// Read configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;

        info!(
            target: "keydispatch",
            path = %path.display(),
            bindings = config.bindings.len(),
            "loaded configuration"
        );

        Ok(config)
    }

    /// Read configuration from a file, falling back to the defaults when it doesn't exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                debug!(target: "keydispatch", path = %path.display(), "no configuration file");

                Ok(Config::default())
            },
            res => res,
        }
    }

    /// Parse the binding table, failing on the first entry with invalid keys.
    pub fn bindings(&self) -> Result<Vec<KeyBinding>, ConfigError> {
        self.bindings.iter().map(BindingConfig::to_binding).collect()
    }
}
