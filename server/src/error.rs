//! Error types for the WidgetGen server.
//!
//! These cover start-up: configuration and provider client construction.
//! Request-time failures use the API crate's `AuthError` and
//! `GenerationError`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types.
#[derive(Error, Debug)]
pub enum ServerError {
    /// A required setting has no value in the selected environment.
    #[error("Missing setting {name} (set the {env_var} environment variable)")]
    MissingSetting {
        /// Setting name as used in logs.
        name: &'static str,
        /// Environment variable that provides it.
        env_var: String,
    },

    /// A setting has a value that cannot be used.
    #[error("Invalid value for {name}: {reason}")]
    InvalidSetting {
        /// Setting name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// Config file could not be read.
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected shape.
    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        /// File path.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
