//! Finder error types
//!
//! Only the collaborators (CRM retrieval, record loading, report export) can
//! fail. Pairwise comparisons always resolve to a verdict.

use thiserror::Error;
use shared::SharedError;

/// Result type for finder operations
pub type FinderResult<T> = Result<T, FinderError>;

/// Finder error types
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("CRM request failed: {message}")]
    CrmError { message: String },

    #[error("CRM rate limit persisted after {attempts} attempts")]
    CrmRateLimited { attempts: u32 },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}
