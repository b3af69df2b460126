//! Runtime configuration for the task tracker.
//!
//! Configuration is read from a TOML file and then overridden by
//! environment variables. Every field has a default, so an absent file is
//! not an error.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding [`TrackerConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "TASKKEEP_DATA_DIR";

/// Environment variable overriding [`TrackerConfig::sweep_interval_secs`].
pub const SWEEP_INTERVAL_ENV: &str = "TASKKEEP_SWEEP_INTERVAL_SECS";

/// Exclusive upper bound on the sweep interval; sweeps must run more than
/// once per day.
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 86_400;

const DEFAULT_DATA_DIR: &str = ".taskkeep";
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path of the file.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration text is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The sweep interval is zero or not shorter than a day.
    #[error("sweep interval must be between 1 and {max} seconds, got {0}", max = MAX_SWEEP_INTERVAL_SECS - 1)]
    InvalidSweepInterval(u64),
}

/// Settings for the tracker process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackerConfig {
    /// Directory holding the persisted task records.
    pub data_dir: Utf8PathBuf,
    /// Seconds between retention sweeps.
    pub sweep_interval_secs: u64,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: Utf8PathBuf::from(DEFAULT_DATA_DIR),
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl TrackerConfig {
    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::InvalidSweepInterval`] for an out-of-range interval.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`, using defaults when the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read, or any
    /// error from [`Self::from_toml_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |source: io::Error| ConfigError::Read {
            path: path.to_owned(),
            source,
        };
        let parent = match path.parent() {
            Some(parent) if !parent.as_str().is_empty() => parent,
            _ => Utf8Path::new("."),
        };
        let Some(file_name) = path.file_name() else {
            return Err(read_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "config path must name a file",
            )));
        };
        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => return Err(read_error(err)),
        };
        match dir.read_to_string(file_name) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(read_error(err)),
        }
    }

    /// Applies overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] when an override cannot be parsed
    /// and [`ConfigError::InvalidSweepInterval`] when it is out of range.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies overrides looked up through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Self::with_env_overrides`].
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(DATA_DIR_ENV) {
            self.data_dir = Utf8PathBuf::from(dir);
        }
        if let Some(raw) = lookup(SWEEP_INTERVAL_ENV) {
            self.sweep_interval_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidEnv {
                        name: SWEEP_INTERVAL_ENV,
                        value: raw.clone(),
                    })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Returns the sweep interval as a duration.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_secs == 0 || self.sweep_interval_secs >= MAX_SWEEP_INTERVAL_SECS {
            return Err(ConfigError::InvalidSweepInterval(self.sweep_interval_secs));
        }
        Ok(())
    }
}
