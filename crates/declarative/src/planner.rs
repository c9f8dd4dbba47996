//! Execution planner - builds ordered change sets from config and state

use crate::context::CycleContext;
use crate::diff::{Action, ResourceDiff};
use crate::resource::Resource;
use anyhow::{Context, Result};
use std::collections::BTreeMap;

/// One change to apply to a resource
pub enum Change<R: Resource> {
    /// Create a resource that is not in state
    Create { plan: R::Plan },
    /// Replace a resource that drifted from configuration
    Update { prior: R::State, plan: R::Plan },
    /// Delete a resource that is no longer configured
    Delete { prior: R::State },
}

/// A change together with its address and display diff
pub struct PlannedChange<R: Resource> {
    /// Host-local address of the resource
    pub address: String,
    /// What to do
    pub change: Change<R>,
    /// Attribute-level diff for display
    pub diff: ResourceDiff,
}

/// An ordered set of changes for one resource type
pub struct ExecutionPlan<R: Resource> {
    /// Changes in the order they will be applied
    pub changes: Vec<PlannedChange<R>>,
}

impl<R: Resource> ExecutionPlan<R> {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Build a plan by comparing desired configuration with stored state
    ///
    /// Configured addresses are planned in address order, followed by
    /// deletions for addresses present only in state. Addresses whose plan
    /// matches state produce no change.
    pub fn build(
        resource: &R,
        desired: &BTreeMap<String, R::Config>,
        state: &BTreeMap<String, R::State>,
        ctx: &CycleContext<'_>,
    ) -> Result<Self> {
        let mut plan = Self::new();

        for (address, config) in desired {
            let prior = state.get(address);
            let planned = resource
                .plan(config, prior, ctx)
                .with_context(|| format!("Failed to plan {}.{}", resource.resource_type(), address))?;

            let diff =
                ResourceDiff::between(address.as_str(), resource.resource_type(), prior, Some(&planned));
            let change = match (prior, diff.action) {
                (None, _) => Change::Create { plan: planned },
                (Some(_), Action::NoOp) => continue,
                (Some(prior), _) => Change::Update {
                    prior: prior.clone(),
                    plan: planned,
                },
            };
            plan.changes.push(PlannedChange {
                address: address.clone(),
                change,
                diff,
            });
        }

        for (address, prior) in state {
            if desired.contains_key(address) {
                continue;
            }
            plan.push_delete(resource, address, prior.clone());
        }

        Ok(plan)
    }

    /// Build a plan that deletes every resource in state
    pub fn destroy_all(resource: &R, state: &BTreeMap<String, R::State>) -> Self {
        let mut plan = Self::new();
        for (address, prior) in state {
            plan.push_delete(resource, address, prior.clone());
        }
        plan
    }

    fn push_delete(&mut self, resource: &R, address: &str, prior: R::State) {
        let diff =
            ResourceDiff::between::<R::Plan, R::State>(address, resource.resource_type(), Some(&prior), None);
        self.changes.push(PlannedChange {
            address: address.to_string(),
            change: Change::Delete { prior },
            diff,
        });
    }

    /// Filter plan to only include changes matching a target pattern
    ///
    /// Target format: "address" or "type.address"
    pub fn filter_by_target(self, resource_type: &str, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (kind, address) = parse_target(t);
                if kind.as_deref().is_some_and(|k| k != resource_type) {
                    return Self::new();
                }
                Self {
                    changes: self
                        .changes
                        .into_iter()
                        .filter(|c| address.as_deref().is_none_or(|a| c.address == a))
                        .collect(),
                }
            }
        }
    }

    /// Display diffs for every change
    pub fn diffs(&self) -> Vec<ResourceDiff> {
        self.changes.iter().map(|c| c.diff.clone()).collect()
    }

    /// Total number of changes in the plan
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<R: Resource> Default for ExecutionPlan<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a target string like "type.address" into (type, address)
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once('.') {
        None => (None, Some(target.to_string())),
        Some((kind, "")) => (Some(kind.to_string()), None),
        Some((kind, address)) => (Some(kind.to_string()), Some(address.to_string())),
    }
}
