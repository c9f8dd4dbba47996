//! `longship destroy` - delete every managed webhook

use anyhow::{Result, bail};
use declarative::{CycleContext, ExecuteOptions, ExecuteSummary, ExecutionPlan, LogObserver, execute};
use longship_api::WebhookApi;

use crate::Context;
use crate::cli::DestroyArgs;
use crate::engine::{DialoguerConfirm, display_diff, print_summary};
use crate::progress::SpinnerProgress;
use crate::resource::webhook::{RESOURCE_TYPE, WebhookReconciler};
use crate::state::StateFile;
use crate::ui;

pub fn run(ctx: &Context, args: &DestroyArgs) -> Result<()> {
    let config = ctx.load_config_or_default()?;
    let mut state_file = ctx.open_state()?;
    if state_file.state.webhooks.is_empty() {
        ui::info("No webhooks in state; nothing to destroy");
        return Ok(());
    }

    let reconciler = super::connect(&config)?;
    destroy(&reconciler, &mut state_file, args, ctx.quiet)?;
    Ok(())
}

/// Refresh, then delete every stored webhook still present remotely
pub fn destroy<B: WebhookApi>(
    reconciler: &WebhookReconciler<B>,
    state_file: &mut StateFile,
    args: &DestroyArgs,
    quiet: bool,
) -> Result<ExecuteSummary> {
    let observer = LogObserver::new(RESOURCE_TYPE);
    let cycle = CycleContext::new(&observer);

    let stored = state_file.state.webhooks.clone();
    super::refresh_state(reconciler, &stored, &cycle, quiet, |address, commit| {
        state_file.commit(address, commit)
    })?;

    let plan = ExecutionPlan::destroy_all(reconciler, &state_file.state.webhooks)
        .filter_by_target(RESOURCE_TYPE, args.target.as_deref());
    display_diff(&plan.diffs());
    if plan.is_empty() {
        return Ok(ExecuteSummary::default());
    }

    let planned = plan.len();
    let mut progress = SpinnerProgress::new(quiet);
    let mut confirm = DialoguerConfirm::new(args.yes);
    let summary = execute(
        plan,
        reconciler,
        &ExecuteOptions::default(),
        &cycle,
        &mut progress,
        &mut confirm,
        |address, commit| state_file.commit(address, commit),
    )?;

    if summary.skipped == planned && summary.failed == 0 {
        return Ok(summary);
    }

    print_summary(&summary, "Destroy");
    if !summary.is_success() {
        bail!("{} webhook(s) could not be deleted", summary.failed);
    }
    Ok(summary)
}
