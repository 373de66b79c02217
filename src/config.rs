//! Configuration file support for UIAT.
//!
//! Settings are stored as pretty-printed JSON, either at an explicit path or
//! in the per-user config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_COCO_FILE_NAME, DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH,
    DEFAULT_PREDICTION_LATENCY_MS, DEFAULT_STAGGER_MS,
};
use crate::format::CocoOptions;
use crate::model::Tag;
use crate::state::Channel;

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

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,

    /// Export settings
    #[serde(default)]
    pub export: ExportSettings,

    /// Stub prediction settings
    #[serde(default)]
    pub prediction: PredictionSettings,
}

/// User preferences section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Tag given to newly drawn boxes
    #[serde(default)]
    pub default_tag: Tag,

    /// Whether boxes are drawn initially
    #[serde(default = "default_true")]
    pub show_boxes: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            default_tag: Tag::default(),
            show_boxes: true,
        }
    }
}

/// Export section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Decode images for their real size in COCO output
    #[serde(default = "default_true")]
    pub include_dimensions: bool,

    /// Fallback COCO image width
    #[serde(default = "default_width")]
    pub default_width: u32,

    /// Fallback COCO image height
    #[serde(default = "default_height")]
    pub default_height: u32,

    /// Gap between batch deliveries in milliseconds
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,

    /// File name of the COCO artifact
    #[serde(default = "default_coco_file_name")]
    pub coco_file_name: String,
}

fn default_width() -> u32 {
    DEFAULT_IMAGE_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_IMAGE_HEIGHT
}

fn default_stagger_ms() -> u64 {
    DEFAULT_STAGGER_MS
}

fn default_coco_file_name() -> String {
    DEFAULT_COCO_FILE_NAME.to_string()
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            include_dimensions: true,
            default_width: default_width(),
            default_height: default_height(),
            stagger_ms: default_stagger_ms(),
            coco_file_name: default_coco_file_name(),
        }
    }
}

impl ExportSettings {
    /// COCO builder options for these settings.
    pub fn coco_options(&self) -> CocoOptions {
        CocoOptions::new()
            .include_dimensions(self.include_dimensions)
            .default_dimensions(self.default_width, self.default_height)
    }

    pub fn stagger(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.stagger_ms)
    }
}

/// Where stub predictions are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PredictionTarget {
    #[default]
    GroundTruth,
    Predictions,
}

impl From<PredictionTarget> for Channel {
    fn from(target: PredictionTarget) -> Self {
        match target {
            PredictionTarget::GroundTruth => Channel::GroundTruth,
            PredictionTarget::Predictions => Channel::Predictions,
        }
    }
}

/// Prediction section of the config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSettings {
    /// Simulated model latency in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    #[serde(default)]
    pub target: PredictionTarget,
}

fn default_latency_ms() -> u64 {
    DEFAULT_PREDICTION_LATENCY_MS
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            target: PredictionTarget::default(),
        }
    }
}

impl PredictionSettings {
    pub fn latency(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.latency_ms)
    }
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            preferences: UserPreferences::default(),
            export: ExportSettings::default(),
            prediction: PredictionSettings::default(),
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

    /// Load configuration from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to an explicit path, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "uiat-config.json"
    }

    /// Get the default config file path.
    /// Returns None on WASM (no filesystem access).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("uiat").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("uiat")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load from the default path, falling back to defaults.
    ///
    /// A missing file is silent; an unreadable or invalid one is logged.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
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

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}
