//! Application configuration management.
//!
//! Settings are layered, later layers winning:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML config file (`--config FILE`, or `config.toml` in the platform
//!    config directory)
//! 3. `DUPESCAN_*` environment variables (e.g. `DUPESCAN_WORKERS=8`)
//! 4. Command-line flags ([`Config::merge_scan_args`])
//!
//! A file or environment value that fails to parse is logged and the
//! defaults are used instead; configuration problems never abort a scan.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{OutputFormat, ScanArgs};
use crate::duplicates::{FinderConfig, ScanMode};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Errors from reading or writing config files.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("Failed to determine the configuration directory")]
    NoConfigDir,

    /// A config file named on the command line does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// The file already exists and would be overwritten.
    #[error("Config file already exists: {0}")]
    AlreadyExists(PathBuf),

    /// Serializing the configuration failed.
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing the file failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Comparison mode.
    pub mode: ScanMode,
    /// Number of hashing workers.
    pub workers: usize,
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Report format.
    pub output: OutputFormat,
    /// Show progress bars.
    pub progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ScanMode::Hash,
            workers: 4,
            follow_symlinks: false,
            output: OutputFormat::Text,
            progress: true,
        }
    }
}

impl Config {
    /// Load from the given file, or the default location when `None`.
    ///
    /// A missing explicit file is warned about; a missing default file is
    /// normal and only traced.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        if let Some(path) = explicit {
            return Self::load_explicit(path).unwrap_or_else(|e| {
                log::warn!("{}, using defaults and environment", e);
                Self::from_figment(Self::figment(None))
            });
        }
        match Self::default_path() {
            Some(path) => Self::load_from_path(path),
            None => {
                log::debug!("No config directory available, using defaults and environment");
                Self::from_figment(Self::figment(None))
            }
        }
    }

    /// Load a file the user asked for by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `path` is not an existing file.
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Ok(Self::load_from_path(path.to_path_buf()))
    }

    /// Load defaults, then `path` (if it exists), then the environment.
    #[must_use]
    pub fn load_from_path(path: PathBuf) -> Self {
        if path.exists() {
            log::debug!("Loading config from {}", path.display());
        } else {
            log::trace!("Config file {} not found", path.display());
        }
        Self::from_figment(Self::figment(Some(&path)))
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn from_figment(figment: Figment) -> Self {
        match figment.extract::<Self>() {
            Ok(config) => config.validated(),
            Err(e) => {
                log::warn!("Invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    fn validated(mut self) -> Self {
        if self.workers == 0 {
            log::warn!("workers = 0 is invalid, using 1");
            self.workers = 1;
        }
        self
    }

    /// Apply flags given on the command line.
    pub fn merge_scan_args(&mut self, args: &ScanArgs) {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(workers) = args.workers {
            self.workers = usize::try_from(workers).unwrap_or(usize::MAX).max(1);
        }
        if let Some(output) = args.output {
            self.output = output;
        }
        if let Some(follow) = args.follow_symlinks_override() {
            self.follow_symlinks = follow;
        }
        if args.no_progress {
            self.progress = false;
        }
    }

    /// Finder settings for this configuration.
    #[must_use]
    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig::default()
            .with_mode(self.mode)
            .with_workers(self.workers)
            .with_follow_symlinks(self.follow_symlinks)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration as TOML, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any filesystem operation fails.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_err)?;
        log::info!("Wrote configuration to {}", path.display());
        Ok(())
    }

    /// Write a default config file unless one already exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyExists`] rather than overwriting.
    pub fn init_file(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }
        Self::default().save_to(path)
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "dupescan", "dupescan")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Resolve the config file path, preferring an explicit one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if there is no explicit path and
    /// no platform config directory.
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        explicit
            .map(Path::to_path_buf)
            .or_else(Self::default_path)
            .ok_or(ConfigError::NoConfigDir)
    }
}
