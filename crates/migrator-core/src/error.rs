//! Error types for the goal migrator.
//!
//! Every remote, file and parse failure funnels into [`MigratorError`] so the
//! driver can propagate it with `?` and abort the run.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for the migrator library.
#[derive(Debug, Error)]
pub enum MigratorError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited by {service}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        service: String,
        retry_after_secs: Option<u64>,
    },

    // Remote API errors
    #[error("Asana API returned {status_code} for {endpoint}: {message}")]
    Api {
        endpoint: String,
        status_code: u16,
        message: String,
    },

    // File errors
    #[error("CSV error in {path:?}: {message}")]
    Csv {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<csv::Error>,
    },

    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    // Serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Validation errors
    #[error("Validation error for {field}: {message}")]
    Validation { field: String, message: String },
}

/// Result type alias for migrator operations.
pub type Result<T> = std::result::Result<T, MigratorError>;

impl From<std::io::Error> for MigratorError {
    fn from(err: std::io::Error) -> Self {
        MigratorError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for MigratorError {
    fn from(err: serde_json::Error) -> Self {
        MigratorError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<csv::Error> for MigratorError {
    fn from(err: csv::Error) -> Self {
        MigratorError::Csv {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for MigratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            MigratorError::Timeout(Duration::from_secs(0))
        } else {
            MigratorError::Network {
                message: err.to_string(),
                cause: err.url().map(|u| u.to_string()),
            }
        }
    }
}

impl MigratorError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        MigratorError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a CSV error with path context.
    pub fn csv_with_path(err: csv::Error, path: impl Into<PathBuf>) -> Self {
        MigratorError::Csv {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Create a validation error for a named field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MigratorError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Check if this error should trigger a retry.
    ///
    /// Server-side failures (5xx) are retried; other API rejections are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            MigratorError::Network { .. }
            | MigratorError::Timeout(_)
            | MigratorError::RateLimited { .. } => true,
            MigratorError::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }

    /// Whether a request that failed with this error may be sent again.
    ///
    /// Timeouts and transport errors leave it unknown whether the server
    /// acted, so only reads are resent after them. Rate limits and 5xx
    /// responses are retried for every method.
    pub fn is_retryable_for(&self, resendable: bool) -> bool {
        match self {
            MigratorError::Network { .. } | MigratorError::Timeout(_) => resendable,
            _ => self.is_retryable(),
        }
    }

    /// Server-provided wait hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MigratorError::RateLimited {
                retry_after_secs: Some(secs),
                ..
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}
