//! `longship refresh` - sync state with the API

use anyhow::Result;
use declarative::{CycleContext, ExecuteSummary, LogObserver};
use longship_api::WebhookApi;

use crate::Context;
use crate::engine::print_summary;
use crate::resource::webhook::{RESOURCE_TYPE, WebhookReconciler};
use crate::state::StateFile;
use crate::ui;

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.load_config_or_default()?;
    let mut state_file = ctx.open_state()?;
    if state_file.state.webhooks.is_empty() {
        ui::info("No webhooks in state; nothing to refresh");
        return Ok(());
    }

    let reconciler = super::connect(&config)?;
    let summary = refresh(&reconciler, &mut state_file, ctx.quiet)?;
    print_summary(&summary, "Refresh");
    Ok(())
}

/// Read every stored webhook and save the result
pub fn refresh<B: WebhookApi>(
    reconciler: &WebhookReconciler<B>,
    state_file: &mut StateFile,
    quiet: bool,
) -> Result<ExecuteSummary> {
    let observer = LogObserver::new(RESOURCE_TYPE);
    let cycle = CycleContext::new(&observer);

    let stored = state_file.state.webhooks.clone();
    super::refresh_state(reconciler, &stored, &cycle, quiet, |address, commit| {
        state_file.commit(address, commit)
    })
}
