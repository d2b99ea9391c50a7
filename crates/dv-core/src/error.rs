//! Error types for dv-core

use thiserror::Error;

/// Core error type for Drover
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Requested environment missing from the config file
    #[error("[C002] Environment '{env}' not found in {path}")]
    EnvironmentNotFound { env: String, path: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Migrations directory not found
    #[error("[C004] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// C005: Version prefix present but not usable
    #[error("[C005] Invalid migration version in '{file}': {reason}")]
    InvalidVersion { file: String, reason: String },

    /// C006: Two migrations share a version
    #[error("[C006] Duplicate migration version {version}: '{first}' and '{second}'")]
    DuplicateVersion {
        version: i64,
        first: String,
        second: String,
    },

    /// C007: Version-prefixed file with an extension no executor handles
    #[error("[C007] Unknown migration kind for '{path}': unsupported extension '{extension}'")]
    UnknownMigrationKind { path: String, extension: String },

    /// C008: IO error
    #[error("[C008] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C009: IO error with file path context
    #[error("[C009] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C010: YAML parse error
    #[error("[C010] Failed to parse config: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
