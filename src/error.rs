use crate::models::Dataset;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// A record source could not produce its collection
    #[error("Source unavailable ({dataset}): {message}")]
    SourceUnavailable { dataset: Dataset, message: String },

    /// A record source produced content that does not decode into records
    #[error("Decode error ({dataset}): {message}")]
    Decode { dataset: Dataset, message: String },

    /// A loader task panicked
    #[error("Loader task failed ({dataset}): {message}")]
    LoaderTask { dataset: Dataset, message: String },

    /// Unknown dataset, unknown field or malformed query value
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The index build was stopped by a shutdown signal
    #[error("Index build cancelled")]
    Cancelled,

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            AppError::Decode { .. } => "DECODE_INVALID",
            AppError::LoaderTask { .. } => "LOADER_TASK_FAILED",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Cancelled => "CANCELLED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error aborts the index build
    pub fn is_build_failure(&self) -> bool {
        matches!(
            self,
            AppError::SourceUnavailable { .. }
                | AppError::Decode { .. }
                | AppError::LoaderTask { .. }
                | AppError::Cancelled
                | AppError::Internal(_)
        )
    }

    /// Dataset the error originated from, if any
    pub fn dataset(&self) -> Option<Dataset> {
        match self {
            AppError::SourceUnavailable { dataset, .. }
            | AppError::Decode { dataset, .. }
            | AppError::LoaderTask { dataset, .. } => Some(*dataset),
            _ => None,
        }
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Conversion from a panicked or aborted loader task
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("loader task failed: {}", err))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
