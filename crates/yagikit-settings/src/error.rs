//! Error types for the settings crate.

use std::io;
use thiserror::Error;
use yagikit_core::GeometryError;

/// Errors that can occur while loading, saving or validating settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// A configuration value is invalid.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlWriteError(#[from] toml::ser::Error),

    /// A dimension fails its geometric precondition.
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// A configuration structure error occurred.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Error reported by the core types, e.g. an unknown element type tag.
    #[error(transparent)]
    Core(#[from] yagikit_core::Error),
}

impl SettingsError {
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SettingsError::InvalidSetting {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Errors related to the structure of the configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file format is not supported.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// Two elements share a label, so their files would collide.
    #[error("Duplicate element label: {0}")]
    DuplicateLabel(String),

    /// The configuration has no band.
    #[error("No band configured")]
    NoBands,
}

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
