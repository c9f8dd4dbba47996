//! Command implementations
//!
//! Each command loads config and state through [`Context`](crate::Context),
//! then hands a reconciler to a function that is generic over the API
//! client so it can run against `MockBackend` in tests.

pub mod apply;
pub mod data;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod refresh;
pub mod state;

use anyhow::{Context as AnyhowContext, Result, bail};
use declarative::{Commit, CycleContext, ExecuteSummary};
use longship_api::{HttpBackend, WebhookApi};
use std::collections::BTreeMap;

use crate::config::LongshipConfig;
use crate::progress::SpinnerProgress;
use crate::resource::webhook::{WebhookReconciler, WebhookState};
use crate::ui;

/// Build a reconciler for the configured account
pub fn connect(config: &LongshipConfig) -> Result<WebhookReconciler<HttpBackend>> {
    let credentials = config
        .credentials()
        .context("Failed to resolve provider credentials")?;
    log::debug!("Using Longship API at {}", credentials.host);
    Ok(WebhookReconciler::new(HttpBackend::new(credentials)))
}

/// Refresh stored webhooks, committing each result through `commit`
pub fn refresh_state<B, F>(
    reconciler: &WebhookReconciler<B>,
    webhooks: &BTreeMap<String, WebhookState>,
    cycle: &CycleContext<'_>,
    quiet: bool,
    commit: F,
) -> Result<ExecuteSummary>
where
    B: WebhookApi,
    F: FnMut(&str, Commit<WebhookState>) -> Result<()>,
{
    let mut progress = SpinnerProgress::new(quiet);
    let summary = declarative::refresh(reconciler, webhooks, cycle, &mut progress, commit)?;

    if summary.vanished > 0 {
        ui::warn(&format!(
            "{} webhook(s) were removed outside longship and dropped from state",
            summary.vanished
        ));
    }
    if !summary.is_success() {
        bail!("Failed to refresh {} webhook(s)", summary.failed);
    }
    Ok(summary)
}
