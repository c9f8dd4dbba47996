//! Core types for declarative resource reconciliation

use serde::{Deserialize, Serialize};
use std::fmt;

/// A call made against the remote API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Enumerate all remote records
    List,
    /// Fetch a single record by identity
    Get,
    /// Create a record
    Create,
    /// Replace a record
    Update,
    /// Delete a record
    Delete,
}

impl Operation {
    /// Lowercase name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of reading a resource's remote record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<S> {
    /// The resource exists; refreshed state
    Present(S),
    /// The resource no longer exists remotely; drop it from state
    Removed,
}

impl<S> ReadOutcome<S> {
    /// Check if the resource was found
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Check if the resource vanished
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }

    /// Take the refreshed state, if present
    pub fn into_state(self) -> Option<S> {
        match self {
            Self::Present(state) => Some(state),
            Self::Removed => None,
        }
    }
}

/// Result of applying a single change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was created
    Created,
    /// Resource was modified
    Modified,
    /// Resource was removed
    Removed,
    /// Resource vanished remotely and was dropped from state
    Vanished,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Modified | Self::Removed)
    }
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub vanished: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of changes processed
    pub fn total(&self) -> usize {
        self.total_changes() + self.vanished + self.skipped + self.failed + self.no_change
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Vanished => self.vanished += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Stop at the first failed change instead of continuing
    pub fail_fast: bool,
}
