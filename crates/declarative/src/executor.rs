//! Execution engine - applies planned changes one cycle at a time
//!
//! Changes run sequentially. Each successful cycle is handed to the
//! caller's commit callback before the next one starts, so a failure or
//! cancellation part way through leaves every earlier change persisted and
//! nothing from the failed cycle.

use crate::context::{ConfirmCallback, CycleContext, ProgressCallback};
use crate::planner::{Change, ExecutionPlan};
use crate::resource::Resource;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary, ReadOutcome};
use anyhow::Result;
use std::collections::BTreeMap;

/// A state mutation produced by a successful cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit<S> {
    /// Store (or replace) the state for an address
    Put(S),
    /// Forget the address
    Remove,
}

/// Execute a plan with the given options and callbacks
///
/// # Arguments
/// * `plan` - The changes to apply
/// * `resource` - Resource implementation driving each cycle
/// * `opts` - Execution options (dry_run, fail_fast)
/// * `ctx` - Cycle context shared by every change
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback
/// * `commit` - Called with each successful cycle's state mutation
///
/// # Returns
/// Summary of execution results. Errors are only returned for callback
/// failures; failed cycles are counted in the summary.
pub fn execute<R, P, C, F>(
    plan: ExecutionPlan<R>,
    resource: &R,
    opts: &ExecuteOptions,
    ctx: &CycleContext<'_>,
    progress: &mut P,
    confirm: &mut C,
    mut commit: F,
) -> Result<ExecuteSummary>
where
    R: Resource,
    P: ProgressCallback,
    C: ConfirmCallback,
    F: FnMut(&str, Commit<R::State>) -> Result<()>,
{
    if plan.is_empty() {
        return Ok(ExecuteSummary::default());
    }

    if opts.dry_run {
        return Ok(ExecuteSummary::default());
    }

    if !confirm.confirm("Apply changes?")? {
        return Ok(ExecuteSummary {
            skipped: plan.len(),
            ..Default::default()
        });
    }

    let mut summary = ExecuteSummary::default();
    let mut stop = false;

    progress.on_batch_start(plan.len());
    for planned in plan.changes {
        if stop {
            let result = ApplyResult::Skipped {
                reason: "Earlier change failed".into(),
            };
            progress.on_resource_complete(&planned.address, &result);
            summary.add_result(&result);
            continue;
        }

        let description = format!(
            "{} {}.{}",
            planned.diff.action.symbol(),
            resource.resource_type(),
            planned.address
        );
        progress.on_resource_start(&planned.address, &description);

        let result = match apply_change(resource, planned.change, ctx) {
            Ok((result, mutation)) => {
                let identity = match &mutation {
                    Commit::Put(state) => resource.identity(state).to_string(),
                    Commit::Remove => String::new(),
                };
                if let Err(e) = commit(&planned.address, mutation) {
                    log::error!(
                        "{}.{} changed remotely (id {:?}) but could not be recorded: {e:#}",
                        resource.resource_type(),
                        planned.address,
                        identity
                    );
                    return Err(e.context(format!(
                        "Failed to record {}.{} (remote id {:?})",
                        resource.resource_type(),
                        planned.address,
                        identity
                    )));
                }
                result
            }
            Err(e) => {
                if opts.fail_fast || ctx.cancel.is_cancelled() {
                    stop = true;
                }
                ApplyResult::Failed {
                    error: e.to_string(),
                }
            }
        };

        progress.on_resource_complete(&planned.address, &result);
        summary.add_result(&result);
    }
    progress.on_batch_complete();

    Ok(summary)
}

/// Run one cycle for a single change
fn apply_change<R: Resource>(
    resource: &R,
    change: Change<R>,
    ctx: &CycleContext<'_>,
) -> crate::error::Result<(ApplyResult, Commit<R::State>)> {
    match change {
        Change::Create { plan } => {
            let state = resource.create(&plan, ctx)?;
            Ok((ApplyResult::Created, Commit::Put(state)))
        }
        Change::Update { plan, .. } => {
            let state = resource.update(&plan, ctx)?;
            Ok((ApplyResult::Modified, Commit::Put(state)))
        }
        Change::Delete { prior } => {
            resource.delete(resource.identity(&prior), ctx)?;
            Ok((ApplyResult::Removed, Commit::Remove))
        }
    }
}

/// Refresh every stored state from the remote API
///
/// Addresses whose identity vanished remotely are committed as removals.
/// A failed read leaves the stored state untouched.
pub fn refresh<R, P, F>(
    resource: &R,
    state: &BTreeMap<String, R::State>,
    ctx: &CycleContext<'_>,
    progress: &mut P,
    mut commit: F,
) -> Result<ExecuteSummary>
where
    R: Resource,
    P: ProgressCallback,
    F: FnMut(&str, Commit<R::State>) -> Result<()>,
{
    let mut summary = ExecuteSummary::default();
    if state.is_empty() {
        return Ok(summary);
    }

    progress.on_batch_start(state.len());
    for (address, stored) in state {
        progress.on_resource_start(address, &format!("refresh {}.{}", resource.resource_type(), address));

        let result = match resource.read(stored, ctx) {
            Ok(ReadOutcome::Present(fresh)) => {
                commit(address, Commit::Put(fresh))?;
                ApplyResult::NoChange
            }
            Ok(ReadOutcome::Removed) => {
                commit(address, Commit::Remove)?;
                ApplyResult::Vanished
            }
            Err(e) => ApplyResult::Failed {
                error: e.to_string(),
            },
        };

        progress.on_resource_complete(address, &result);
        summary.add_result(&result);
        if ctx.cancel.is_cancelled() {
            break;
        }
    }
    progress.on_batch_complete();

    Ok(summary)
}
