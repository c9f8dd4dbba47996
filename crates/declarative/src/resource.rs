//! Resource trait for declarative reconciliation
//!
//! A Resource knows how to turn user configuration into a plan, and how to
//! drive one remote record through its lifecycle:
//!
//! ```text
//! NoState --create--> Created --read--> Synced --update--> Updated --read--> Synced
//!                                          \                                  /
//!                                           `------------ delete ------------'--> Deleted
//! ```
//!
//! Each method is one reconciliation cycle. Implementations must not keep
//! mutable state between calls: the same resource value may serve many
//! cycles for disjoint identities at once.

use crate::context::CycleContext;
use crate::diff::Attributes;
use crate::error::Result;
use crate::types::ReadOutcome;

/// Core trait for reconciled resources
///
/// # Example
///
/// ```ignore
/// use declarative::{CycleContext, ReadOutcome, Resource};
///
/// let ctx = CycleContext::default();
/// let plan = resource.plan(&config, None, &ctx)?;
/// let state = resource.create(&plan, &ctx)?;
///
/// match resource.read(&state, &ctx)? {
///     ReadOutcome::Present(fresh) => store.put("hook", fresh),
///     ReadOutcome::Removed => store.remove("hook"),
/// }
/// ```
pub trait Resource: Send + Sync {
    /// User-declared configuration, possibly containing unknown values
    type Config;
    /// Planned next state, with computed attributes resolved or unknown
    type Plan: Attributes;
    /// Fully concrete persisted state
    type State: Attributes + Clone;

    /// Resource type name used for grouping and display (e.g. "webhook")
    fn resource_type(&self) -> &'static str;

    /// Identity stored in a state record
    fn identity<'s>(&self, state: &'s Self::State) -> &'s str;

    /// Compute the planned state from configuration and prior state
    ///
    /// Validates configuration and applies plan modifiers. Makes no remote
    /// calls.
    fn plan(
        &self,
        config: &Self::Config,
        prior: Option<&Self::State>,
        ctx: &CycleContext<'_>,
    ) -> Result<Self::Plan>;

    /// Create the remote record; the plan must not carry an identity
    fn create(&self, plan: &Self::Plan, ctx: &CycleContext<'_>) -> Result<Self::State>;

    /// Refresh state from the remote record
    fn read(&self, state: &Self::State, ctx: &CycleContext<'_>) -> Result<ReadOutcome<Self::State>>;

    /// Replace the remote record; the plan must carry an identity
    fn update(&self, plan: &Self::Plan, ctx: &CycleContext<'_>) -> Result<Self::State>;

    /// Delete the remote record
    fn delete(&self, identity: &str, ctx: &CycleContext<'_>) -> Result<()>;

    /// Build state for an existing remote record from its identity alone
    fn import(&self, identity: &str, ctx: &CycleContext<'_>) -> Result<ReadOutcome<Self::State>>;
}
