//! Routing error types

use thiserror::Error;

/// Errors that can occur while talking to the routing server
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The server could not be reached at all
    #[error("Routing server unreachable: {0}")]
    Unreachable(String),

    /// Non-success status without an OSRM error body
    #[error("Routing request failed with HTTP {status}")]
    Http { status: u16 },

    /// Body was not a valid OSRM response
    #[error("Unreadable routing response: {0}")]
    ParseError(String),

    /// The server throttled us
    #[error("Routing server throttled the request, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (from `Retry-After`, if sent)
        retry_after_secs: Option<u64>,
    },

    /// OSRM refused the request with an error code such as `InvalidValue`
    #[error("Routing server rejected the request ({code}): {message}")]
    Rejected { code: String, message: String },

    /// 5xx from the server
    #[error("Routing server unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid routing configuration: {0}")]
    InvalidConfig(String),

    #[error("Routing request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },
}

impl NavigationError {
    /// Whether the same request may succeed later
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Unreachable(_)
            | Self::ServiceUnavailable(_)
            | Self::Timeout { .. }
            | Self::RateLimitExceeded { .. } => true,
            Self::Http { status } => *status >= 500,
            Self::ParseError(_) | Self::Rejected { .. } | Self::InvalidConfig(_) => false,
        }
    }
}
