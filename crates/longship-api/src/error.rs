//! Error types for Longship API operations.
//!
//! Errors are categorized so callers can tell transient failures from
//! problems that need a configuration change.

use std::fmt;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, DNS or timeout failure (transient, retryable).
    Network,
    /// Credentials rejected by the API.
    Unauthorized,
    /// The requested record does not exist.
    NotFound,
    /// The API rejected the request (4xx other than auth/not found).
    Rejected,
    /// The API failed while handling the request (5xx).
    Server,
    /// Response body could not be decoded.
    Format,
    /// Client is missing a host or key.
    Configuration,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Unauthorized => "Credentials rejected",
            Self::NotFound => "Record not found",
            Self::Rejected => "Request rejected by the API",
            Self::Server => "API server error",
            Self::Format => "Unexpected response format",
            Self::Configuration => "Client misconfigured",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and the API host, then try again",
            Self::Unauthorized => "Verify the tenant key and application key",
            Self::NotFound => "The record may have been deleted outside of this tool",
            Self::Rejected => "Check the request attributes in the error body",
            Self::Server => "The API may be degraded, try again later",
            Self::Format => "The API may have changed, check for a newer release",
            Self::Configuration => "Set the value in the config file or the named environment variable",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Longship API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API answered with a non-2xx status.
    #[error("status: {status}, body: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Response body could not be decoded.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),

    /// A record the mock server was asked about does not exist.
    #[error("webhook not found: {0}")]
    NotFound(String),

    /// A credential was not configured.
    #[error("missing {attribute}: set it in the provider config or {env_var}")]
    MissingCredential {
        /// Config attribute name.
        attribute: &'static str,
        /// Environment variable consulted as a fallback.
        env_var: &'static str,
    },

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// HTTP status code, if a response was received.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Get the error category for retry logic.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Status { status, .. } => match status {
                401 | 403 => ErrorCategory::Unauthorized,
                404 => ErrorCategory::NotFound,
                400..=499 => ErrorCategory::Rejected,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Other,
            },
            Self::Http(_) => ErrorCategory::Network,
            Self::InvalidResponse(_) => ErrorCategory::Format,
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::MissingCredential { .. } => ErrorCategory::Configuration,
            Self::Other(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Status {
                status: code,
                body: String::new(),
            },
            other => Self::Http(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
