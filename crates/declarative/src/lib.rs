//! # Declarative
//!
//! A framework for reconciling remote API records with declared configuration.
//!
//! This crate provides the core abstractions for planning changes from
//! user configuration, driving remote records through their lifecycle, and
//! detecting drift between stored state and what the remote side reports.
//!
//! ## Core Concepts
//!
//! - **Value**: A three-state attribute value (null, unknown, known)
//! - **PlanModifier**: Adjusts planned values before apply, e.g. [`UseStateForUnknown`]
//! - **Resource**: Plan, create, read, update, delete and import for one record type
//! - **ExecutionPlan**: Ordered changes computed from configuration and state
//! - **Executor**: Applies changes sequentially and commits each successful cycle
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     AutoConfirm, Commit, CycleContext, ExecuteOptions, ExecutionPlan, LogObserver, NoProgress,
//!     execute,
//! };
//!
//! let observer = LogObserver::new("webhook");
//! let ctx = CycleContext::new(&observer);
//!
//! let plan = ExecutionPlan::build(&resource, &desired, &state, &ctx)?;
//! let summary = execute(
//!     plan,
//!     &resource,
//!     &ExecuteOptions::default(),
//!     &ctx,
//!     &mut NoProgress,
//!     &mut AutoConfirm,
//!     |address, commit| {
//!         match commit {
//!             Commit::Put(s) => store.insert(address.to_string(), s),
//!             Commit::Remove => store.remove(address),
//!         };
//!         Ok(())
//!     },
//! )?;
//! ```
//!
//! ## Provider Traits
//!
//! The crate uses traits for dependency injection:
//!
//! - [`ReconcileObserver`]: Receives structured events around remote calls
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks, logging backends, or HTTP clients.

pub mod context;
pub mod diff;
pub mod error;
pub mod executor;
pub mod modifier;
pub mod planner;
pub mod resource;
pub mod types;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use context::{
    AutoConfirm, AutoDecline, CallOutcome, CancelToken, ConfirmCallback, CycleContext,
    LogObserver, NoObserver, NoProgress, ProgressCallback, ReconcileObserver,
};
pub use diff::{Action, AttributeChange, Attributes, DiffSummary, ResourceDiff, group_by_type};
pub use error::{AttributePath, Error, ErrorCategory, Result};
pub use executor::{Commit, execute, refresh};
pub use modifier::{ModifyRequest, PlanModifier, UseStateForUnknown, resolve};
pub use planner::{Change, ExecutionPlan, PlannedChange};
pub use resource::Resource;
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary, Operation, ReadOutcome};
pub use value::{UNKNOWN_DISPLAY, Value};
