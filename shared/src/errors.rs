//! Shared error types for the deal duplicate finder

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

pub type SharedResult<T> = Result<T, SharedError>;

/// Failures reported by the classification collaborator
///
/// The `Display` text is embedded verbatim into the explanation of a
/// zero-score verdict when a comparison cannot be completed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierFailure {
    #[error("rate limit exceeded (too many requests)")]
    RateLimited,

    #[error("authentication failed")]
    Authentication,

    #[error("network error: {0}")]
    Network(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ClassifierFailure {
    /// Whether the failure belongs to the retryable "too many requests" class
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ClassifierFailure::RateLimited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_rate_limited_is_retryable() {
        assert!(ClassifierFailure::RateLimited.is_rate_limit());
        assert!(!ClassifierFailure::Authentication.is_rate_limit());
        assert!(!ClassifierFailure::Network("reset".to_string()).is_rate_limit());
        assert!(!ClassifierFailure::Server("500".to_string()).is_rate_limit());
    }

    #[test]
    fn test_failure_display_embeds_detail() {
        let failure = ClassifierFailure::Server("502 Bad Gateway".to_string());
        assert_eq!(failure.to_string(), "server error: 502 Bad Gateway");
    }
}
