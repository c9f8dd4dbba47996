//! Diff computation between prior state and planned state

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Flat, displayable view of a plan or state record
///
/// Values are rendered to strings so diffs can be compared and displayed
/// without knowing the resource's types. Collections must render in a
/// canonical order so that equal sets and maps compare equal.
pub trait Attributes {
    /// Attribute names and values, in display order
    fn attributes(&self) -> Vec<(&'static str, Value<String>)>;
}

/// What applying a planned change will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Create a new remote record
    Create,
    /// Replace an existing remote record
    Update,
    /// Delete the remote record
    Delete,
    /// Nothing to do
    NoOp,
}

impl Action {
    /// Diff marker symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update => "~",
            Self::Delete => "-",
            Self::NoOp => " ",
        }
    }
}

/// A single attribute's before and after values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChange {
    /// Attribute name
    pub name: String,
    /// Value in prior state (null when creating)
    pub before: Value<String>,
    /// Planned value (null when deleting)
    pub after: Value<String>,
}

/// A diff between prior state and planned state of a resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Host-local address of the resource
    pub address: String,
    /// Type of the resource
    pub resource_type: String,
    /// Planned action
    pub action: Action,
    /// Attributes whose value changes
    pub changes: Vec<AttributeChange>,
}

impl ResourceDiff {
    /// Compute the diff for one resource
    ///
    /// `prior` is `None` when the resource is not in state yet, `planned` is
    /// `None` when the resource is being removed.
    pub fn between<P: Attributes, S: Attributes>(
        address: impl Into<String>,
        resource_type: impl Into<String>,
        prior: Option<&S>,
        planned: Option<&P>,
    ) -> Self {
        let before: BTreeMap<&'static str, Value<String>> = prior
            .map(|s| s.attributes().into_iter().collect())
            .unwrap_or_default();
        let after_list = planned.map(Attributes::attributes).unwrap_or_default();

        let mut changes = Vec::new();
        for (name, after) in &after_list {
            let previous = before.get(name).cloned().unwrap_or(Value::Null);
            if &previous != after {
                changes.push(AttributeChange {
                    name: (*name).to_string(),
                    before: previous,
                    after: after.clone(),
                });
            }
        }
        if planned.is_none() {
            for (name, previous) in &before {
                changes.push(AttributeChange {
                    name: (*name).to_string(),
                    before: previous.clone(),
                    after: Value::Null,
                });
            }
        }

        let action = match (prior.is_some(), planned.is_some()) {
            (false, true) => Action::Create,
            (true, false) => Action::Delete,
            (true, true) if !changes.is_empty() => Action::Update,
            _ => Action::NoOp,
        };

        Self {
            address: address.into(),
            resource_type: resource_type.into(),
            action,
            changes,
        }
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        self.action == Action::Create
    }

    /// Check if this diff represents a removal
    pub fn is_removal(&self) -> bool {
        self.action == Action::Delete
    }

    /// Check if this diff represents a modification
    pub fn is_modification(&self) -> bool {
        self.action == Action::Update
    }

    /// Check if anything would change
    pub fn has_changes(&self) -> bool {
        self.action != Action::NoOp
    }
}

/// Diff summary statistics
#[derive(Debug, Clone, Default)]
pub struct DiffSummary {
    /// Number of resources to add
    pub additions: usize,
    /// Number of resources to remove
    pub removals: usize,
    /// Number of resources to modify
    pub modifications: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.action {
                Action::Create => summary.additions += 1,
                Action::Delete => summary.removals += 1,
                Action::Update => summary.modifications += 1,
                Action::NoOp => {}
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group diffs by resource type
pub fn group_by_type(diffs: &[ResourceDiff]) -> HashMap<String, Vec<&ResourceDiff>> {
    let mut groups: HashMap<String, Vec<&ResourceDiff>> = HashMap::new();
    for diff in diffs {
        groups
            .entry(diff.resource_type.clone())
            .or_default()
            .push(diff);
    }
    groups
}
