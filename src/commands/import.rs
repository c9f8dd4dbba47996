//! `longship import` - adopt an existing webhook

use anyhow::{Context as AnyhowContext, Result, bail};
use declarative::{Commit, CycleContext, LogObserver, ReadOutcome, Resource};
use longship_api::WebhookApi;

use crate::Context;
use crate::config::{LongshipConfig, validate_address};
use crate::resource::webhook::{RESOURCE_TYPE, WebhookReconciler, WebhookState};
use crate::state::StateFile;
use crate::ui;

pub fn run(ctx: &Context, address: &str, id: &str) -> Result<()> {
    let config = ctx.load_config_or_default()?;
    let mut state_file = ctx.open_state()?;
    let reconciler = super::connect(&config)?;

    let state = import(&reconciler, &config, &mut state_file, address, id)?;
    ui::success(&format!(
        "Imported webhook {} as {}.{}",
        state.id, RESOURCE_TYPE, address
    ));
    Ok(())
}

/// Read a webhook by id and record it under an address
pub fn import<B: WebhookApi>(
    reconciler: &WebhookReconciler<B>,
    config: &LongshipConfig,
    state_file: &mut StateFile,
    address: &str,
    id: &str,
) -> Result<WebhookState> {
    validate_address(address)?;
    if let Some(existing) = state_file.state.webhooks.get(address) {
        bail!(
            "{RESOURCE_TYPE}.{address} is already managed (id {}); run `longship state rm {address}` first",
            existing.id
        );
    }
    if let Some((other, _)) = state_file.state.webhooks.iter().find(|(_, w)| w.id == id) {
        bail!(
            "Webhook {id} is already managed as {RESOURCE_TYPE}.{other}; run `longship state rm {other}` first"
        );
    }
    if !config.webhooks.contains_key(address) {
        ui::warn(&format!(
            "{RESOURCE_TYPE}.{address} is not in the config; the next apply will delete it"
        ));
    }

    let observer = LogObserver::new(RESOURCE_TYPE);
    let cycle = CycleContext::new(&observer);

    let outcome = reconciler
        .import(id, &cycle)
        .with_context(|| format!("Failed to import webhook {id}"))?;
    match outcome {
        ReadOutcome::Present(state) => {
            state_file.commit(address, Commit::Put(state.clone()))?;
            Ok(state)
        }
        ReadOutcome::Removed => bail!("Webhook {id} does not exist"),
    }
}
