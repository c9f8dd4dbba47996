//! Error types for reconciliation cycles.
//!
//! Errors are categorized so hosts can render a diagnostic and decide what
//! to do next. The engine itself never retries: every error ends the cycle
//! and no state is committed.
//!
//! A resource that vanished from the server is not an error; it is reported
//! as [`ReadOutcome::Removed`](crate::types::ReadOutcome::Removed).

use crate::types::Operation;
use std::fmt;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Path to an attribute inside a resource, e.g. `event_types[1]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributePath {
    steps: Vec<PathStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathStep {
    Attribute(String),
    Key(String),
    Index(usize),
}

impl AttributePath {
    /// Path to a top-level attribute.
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![PathStep::Attribute(name.into())],
        }
    }

    /// Extend the path with a map key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.steps.push(PathStep::Key(key.into()));
        self
    }

    /// Extend the path with a list index.
    pub fn index(mut self, index: usize) -> Self {
        self.steps.push(PathStep::Index(index));
        self
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                PathStep::Attribute(name) if i == 0 => write!(f, "{name}")?,
                PathStep::Attribute(name) => write!(f, ".{name}")?,
                PathStep::Key(key) => write!(f, "[\"{key}\"]")?,
                PathStep::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Categories of reconciliation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or missing input, detected before any remote call.
    Configuration,
    /// Network, timeout or non-success response from the remote API.
    Transport,
    /// Engine misuse; indicates a bug in the host.
    Invariant,
    /// The caller cancelled the cycle.
    Cancelled,
}

impl ErrorCategory {
    /// Whether a later cycle could succeed without changing the input.
    ///
    /// The engine does not act on this; hosts may.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport | Self::Cancelled)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Configuration => "Invalid configuration",
            Self::Transport => "Remote API request failed",
            Self::Invariant => "Internal invariant violated",
            Self::Cancelled => "Operation cancelled",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Configuration => "Fix the attribute named in the error and run again",
            Self::Transport => "Check connectivity and credentials, then run again",
            Self::Invariant => "This is a bug; please report it with the full error",
            Self::Cancelled => "Run again to resume; no state was changed",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can end a reconciliation cycle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input rejected before any remote call was made.
    #[error("invalid value for {path}: {message}")]
    Configuration {
        /// Attribute the problem was found at.
        path: AttributePath,
        /// What is wrong with it.
        message: String,
    },

    /// The remote API call failed.
    #[error("{operation} failed{}: {message}", status_suffix(.status))]
    Transport {
        /// Remote operation that failed.
        operation: Operation,
        /// Underlying transport message, including response body if any.
        message: String,
        /// HTTP status code if a response was received.
        status: Option<u16>,
    },

    /// The engine was used in a way that should never happen.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The caller cancelled the cycle before it could commit.
    #[error("{operation} cancelled")]
    Cancelled {
        /// Operation that was about to run or had just run.
        operation: Operation,
    },
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl Error {
    /// Create a configuration error for an attribute.
    pub fn configuration(path: AttributePath, message: impl Into<String>) -> Self {
        Self::Configuration {
            path,
            message: message.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(operation: Operation, message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Transport {
            operation,
            message: message.into(),
            status,
        }
    }

    /// Create an invariant violation.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Transport { .. } => ErrorCategory::Transport,
            Self::InvariantViolation(_) => ErrorCategory::Invariant,
            Self::Cancelled { .. } => ErrorCategory::Cancelled,
        }
    }

    /// Attribute path, for configuration errors.
    #[must_use]
    pub fn attribute_path(&self) -> Option<&AttributePath> {
        match self {
            Self::Configuration { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Whether this error is typically transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_path_display() {
        assert_eq!(AttributePath::root("name").to_string(), "name");
        assert_eq!(
            AttributePath::root("event_types").index(1).to_string(),
            "event_types[1]"
        );
        assert_eq!(
            AttributePath::root("headers").key("x-token").to_string(),
            "headers[\"x-token\"]"
        );
    }

    #[test]
    fn test_error_categories() {
        let err = Error::configuration(AttributePath::root("url"), "required");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(!err.is_retryable());
        assert_eq!(err.attribute_path(), Some(&AttributePath::root("url")));

        let err = Error::transport(Operation::Get, "timed out", None);
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert!(err.is_retryable());

        let err = Error::invariant("update without identity");
        assert_eq!(err.category(), ErrorCategory::Invariant);
        assert!(err.attribute_path().is_none());

        let err = Error::Cancelled {
            operation: Operation::Create,
        };
        assert_eq!(err.category(), ErrorCategory::Cancelled);
    }

    #[test]
    fn test_error_display() {
        let err = Error::configuration(AttributePath::root("event_types").index(0), "unsupported");
        assert_eq!(
            err.to_string(),
            "invalid value for event_types[0]: unsupported"
        );

        let err = Error::transport(Operation::Create, "status: 400, body: bad", Some(400));
        assert_eq!(err.to_string(), "create failed (HTTP 400): status: 400, body: bad");

        let err = Error::transport(Operation::List, "connection refused", None);
        assert_eq!(err.to_string(), "list failed: connection refused");
    }

    #[test]
    fn test_category_text() {
        for category in [
            ErrorCategory::Configuration,
            ErrorCategory::Transport,
            ErrorCategory::Invariant,
            ErrorCategory::Cancelled,
        ] {
            assert!(!category.description().is_empty());
            assert!(!category.advice().is_empty());
        }
    }
}
