//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// No location or route matched the request
    #[error("Not found: {0}")]
    NotFound(String),

    /// The geocoding or routing service failed (network, timeout, non-2xx)
    #[error("Upstream service failure: {0}")]
    UpstreamFailure(String),

    /// The service answered with a payload that could not be understood
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The service refused the request as sent; repeating it will not help
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::UpstreamFailure(_))
    }

    /// Check if this error reports a missing result
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Domain(DomainError::NotFound { .. })
        )
    }
}
