//! Configuration for lull
//!
//! Loads [`LullConfig`] from TOML. The file is looked up as:
//! 1. an explicit path (command-line flag)
//! 2. `$LULL_CONFIG`
//! 3. `config.toml` in the platform config directory, when present
//!
//! and falls back to built-in defaults otherwise.

pub mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use lull_core::presenter::ContentError;
use lull_core::{
    CrossfadeNeutralizer, DirectoryLoader, Mode, Neutralizer, NeutralizerVariant, NullLoader,
    ProceduralNeutralizer, Session, SessionConfig, SessionError,
};
use serde::{Deserialize, Serialize};
use tokio::runtime::Handle;
use tracing::debug;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "LULL_CONFIG";

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Invalid demo configuration: {0}")]
    Demo(String),

    #[error("Failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Presentation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenterConfig {
    pub variant: NeutralizerVariant,
    /// Directory holding `bucket-<n>.txt` content; crossfade only
    pub content_dir: Option<PathBuf>,
    /// Minimum spacing between applied spikes; crossfade only
    pub cooldown_ms: u64,
}

impl Default for PresenterConfig {
    fn default() -> Self {
        Self {
            variant: NeutralizerVariant::Procedural,
            content_dir: None,
            cooldown_ms: lull_core::neutralizer::SPIKE_COOLDOWN.as_millis() as u64,
        }
    }
}

/// Terminal demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Refresh interval
    pub tick_ms: u64,
    /// Amplitude of simulated restless jitter, in screen fractions
    pub jitter: f64,
    /// Gaze movement per arrow key press
    pub step: f64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            jitter: 0.02,
            step: 0.05,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when neither `LULL_LOG` nor `RUST_LOG` is set
    pub level: String,
    /// Log file for the terminal demo
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LullConfig {
    pub session: SessionConfig,
    pub presenter: PresenterConfig,
    pub demo: DemoConfig,
    pub logging: LoggingConfig,
}

impl LullConfig {
    /// Load from the resolved location, or defaults when there is none
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match resolve_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        if self.demo.tick_ms == 0 {
            return Err(ConfigError::Demo("tick_ms must be at least 1".to_string()));
        }
        if !(0.0..=0.5).contains(&self.demo.jitter) {
            return Err(ConfigError::Demo(format!(
                "jitter must be within [0, 0.5], got {}",
                self.demo.jitter
            )));
        }
        if !(self.demo.step > 0.0 && self.demo.step <= 1.0) {
            return Err(ConfigError::Demo(format!(
                "step must be within (0, 1], got {}",
                self.demo.step
            )));
        }
        Ok(())
    }

    /// Override the starting mode, e.g. from a command-line flag
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.session.mode = mode;
        self
    }

    /// Neutralizer for the configured variant.
    ///
    /// Content is read on `runtime` when given, else on the current tokio
    /// runtime.
    pub fn build_neutralizer(
        &self,
        runtime: Option<Handle>,
    ) -> Result<Box<dyn Neutralizer>, ConfigError> {
        let mode = self.session.mode;
        let neutralizer: Box<dyn Neutralizer> = match self.presenter.variant {
            NeutralizerVariant::Procedural => Box::new(ProceduralNeutralizer::new(mode)),
            NeutralizerVariant::Crossfade => {
                let cooldown = std::time::Duration::from_millis(self.presenter.cooldown_ms);
                match &self.presenter.content_dir {
                    Some(dir) => {
                        let loader = match runtime {
                            Some(handle) => DirectoryLoader::with_runtime(dir, handle),
                            None => DirectoryLoader::new(dir)?,
                        };
                        Box::new(CrossfadeNeutralizer::new(mode, loader).with_cooldown(cooldown))
                    }
                    None => Box::new(
                        CrossfadeNeutralizer::new(mode, NullLoader).with_cooldown(cooldown),
                    ),
                }
            }
        };
        Ok(neutralizer)
    }

    /// Session wired with the configured neutralizer
    pub fn build_session(&self, runtime: Option<Handle>) -> Result<Session, ConfigError> {
        let neutralizer = self.build_neutralizer(runtime)?;
        Ok(Session::new(self.session.clone(), neutralizer)?)
    }
}

/// Platform config file location, e.g. `~/.config/lull/config.toml`
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("rs", "lull", "lull").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Which file to load, if any.
///
/// An explicit path or `$LULL_CONFIG` is returned even when missing so the
/// read fails loudly; the platform path only counts when it exists.
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    default_path().filter(|path| path.is_file())
}
