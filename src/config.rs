//! Application configuration management.
//!
//! Settings are layered with figment, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config PATH`, or `config.toml` in the platform config dir)
//! 3. `DUPESWEEP_*` environment variables
//! 4. Command-line flags
//!
//! ```toml
//! quarantine_dir = "duplicates"
//! chunk_size = 4096
//! max_suffix = 10000
//! include_quarantine = false
//! sort_entries = true
//! follow_symlinks = false
//! progress = true
//! ```

use std::path::{Path, PathBuf};

use bytesize::ByteSize;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::DEFAULT_MAX_SUFFIX;
use crate::cli::Cli;
use crate::scanner::DEFAULT_CHUNK_SIZE;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPESWEEP_";

/// Largest accepted hashing chunk size (64 MiB).
pub const MAX_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quarantine directory; relative paths resolve under the scan root.
    pub quarantine_dir: PathBuf,
    /// Read chunk size for hashing, in bytes.
    pub chunk_size: usize,
    /// Highest numeric suffix tried when resolving name collisions.
    pub max_suffix: u32,
    /// Scan the quarantine directory along with the rest of the tree.
    pub include_quarantine: bool,
    /// Sort directory entries by name before processing.
    pub sort_entries: bool,
    /// Descend into symlinked directories.
    pub follow_symlinks: bool,
    /// Draw progress bars on stderr.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quarantine_dir: PathBuf::from("duplicates"),
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_suffix: DEFAULT_MAX_SUFFIX,
            include_quarantine: false,
            sort_entries: true,
            follow_symlinks: false,
            progress: true,
        }
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    /// The layered configuration could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] Box<figment::Error>),

    /// A value parsed but is not usable.
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },
}

impl Config {
    /// Build the figment for the given (optional) explicit config file.
    ///
    /// Without an explicit file, the platform default is used when present.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        let file = config_file
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);
        if let Some(path) = file {
            log::debug!("Reading configuration from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load defaults, config file and environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, any layer fails to
    /// parse, or a value is out of range.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
        }

        let config: Config = Self::figment(config_file)
            .extract()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded configuration.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(ref dir) = cli.quarantine {
            self.quarantine_dir = dir.clone();
        }
        if let Some(size) = cli.chunk_size {
            self.chunk_size = usize::try_from(size).unwrap_or(usize::MAX);
        }
        if let Some(max) = cli.max_suffix {
            self.max_suffix = max;
        }
        if cli.include_quarantine {
            self.include_quarantine = true;
        }
        if cli.fs_order {
            self.sort_entries = false;
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if cli.no_progress {
            self.progress = false;
        }
        self
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] for a chunk size outside
    /// `1..=MAX_CHUNK_SIZE`, a zero suffix cap, or an empty quarantine path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size",
                reason: "must be at least 1 byte".to_string(),
            });
        }
        // The hasher allocates one buffer of this size
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "chunk_size",
                reason: format!("must be at most {}", ByteSize::b(MAX_CHUNK_SIZE as u64)),
            });
        }
        if self.max_suffix == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_suffix",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.quarantine_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "quarantine_dir",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Platform config file, if one exists.
    fn default_config_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "dupesweep", "dupesweep")?;
        let path = project_dirs.config_dir().join("config.toml");
        path.is_file().then_some(path)
    }
}
