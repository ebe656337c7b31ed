//! Configuration file support for the editor engine.
//!
//! Settings are stored as JSON. Every field has a default so partial files
//! keep working when new settings are added.

use serde::{Deserialize, Serialize};

use crate::constants::{self, autosave, zoom};

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub autosave: AutoSaveConfig,

    #[serde(default)]
    pub history: HistoryConfig,

    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

/// Auto-save section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSaveConfig {
    /// Whether edits are saved in the background
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Quiet period after the last edit before saving
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Remote requests running longer than this count as failed
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    autosave::DEBOUNCE_MS
}

fn default_request_timeout_ms() -> u64 {
    autosave::REQUEST_TIMEOUT_MS
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            debounce_ms: default_debounce_ms(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Undo history section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of snapshots kept
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

fn default_max_history() -> usize {
    constants::DEFAULT_MAX_HISTORY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history: default_max_history(),
        }
    }
}

/// Pointer interaction tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Resize handle hit zone in image pixels
    #[serde(default = "default_handle_size")]
    pub handle_size: f32,

    /// Smallest width/height accepted for a drawn box
    #[serde(default = "default_min_box_size")]
    pub min_box_size: f32,

    /// Zoom factor per wheel notch
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
}

fn default_handle_size() -> f32 {
    constants::HANDLE_SIZE
}

fn default_min_box_size() -> f32 {
    constants::MIN_DRAW_SIZE
}

fn default_zoom_step() -> f32 {
    zoom::STEP
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            handle_size: default_handle_size(),
            min_box_size: default_min_box_size(),
            zoom_step: default_zoom_step(),
        }
    }
}

impl EditorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            autosave: AutoSaveConfig::default(),
            history: HistoryConfig::default(),
            interaction: InteractionConfig::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(config)
    }

    /// Load configuration from a file.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// I/O error when reading config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
