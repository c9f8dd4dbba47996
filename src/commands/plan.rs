//! `longship plan` - preview what apply would change

use anyhow::Result;
use declarative::{CycleContext, ExecutionPlan, LogObserver, ResourceDiff};
use longship_api::WebhookApi;

use crate::Context;
use crate::cli::PlanArgs;
use crate::config::LongshipConfig;
use crate::engine::display_diff;
use crate::resource::webhook::{RESOURCE_TYPE, WebhookReconciler};
use crate::state::LongshipState;

pub fn run(ctx: &Context, args: &PlanArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let state_file = ctx.open_state()?;
    let reconciler = super::connect(&config)?;

    let diffs = preview(&reconciler, &config, &state_file.state, args, ctx.quiet)?;
    display_diff(&diffs);
    Ok(())
}

/// Compute the diffs apply would act on
///
/// Refreshed state is kept in memory only; the state file is not written.
pub fn preview<B: WebhookApi>(
    reconciler: &WebhookReconciler<B>,
    config: &LongshipConfig,
    state: &LongshipState,
    args: &PlanArgs,
    quiet: bool,
) -> Result<Vec<ResourceDiff>> {
    let observer = LogObserver::new(RESOURCE_TYPE);
    let cycle = CycleContext::new(&observer);

    let mut current = state.clone();
    if !args.no_refresh {
        super::refresh_state(reconciler, &state.webhooks, &cycle, quiet, |address, commit| {
            current.commit(address, commit);
            Ok(())
        })?;
    }

    let plan = ExecutionPlan::build(reconciler, &config.desired(), &current.webhooks, &cycle)?
        .filter_by_target(RESOURCE_TYPE, args.target.as_deref());
    Ok(plan.diffs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::apply::apply;
    use crate::commands::testing::{TWO_WEBHOOKS, config, state_file};
    use crate::cli::ApplyArgs;
    use declarative::{Action, UNKNOWN_DISPLAY, Value};
    use longship_api::{Endpoint, MockBackend};
    use tempfile::TempDir;

    fn plan_args() -> PlanArgs {
        PlanArgs {
            target: None,
            no_refresh: false,
        }
    }

    fn apply_all(reconciler: &WebhookReconciler<MockBackend>, dir: &TempDir) -> LongshipState {
        let mut file = state_file(dir);
        let args = ApplyArgs {
            dry_run: false,
            yes: true,
            target: None,
            no_refresh: false,
            fail_fast: false,
        };
        apply(reconciler, &config(TWO_WEBHOOKS), &mut file, &args, true).unwrap();
        file.state
    }

    #[test]
    fn test_preview_new_webhooks_shows_unknown_computed() {
        let mock = MockBackend::new();
        let reconciler = WebhookReconciler::new(mock.clone());

        let diffs = preview(
            &reconciler,
            &config(TWO_WEBHOOKS),
            &LongshipState::default(),
            &plan_args(),
            true,
        )
        .unwrap();

        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| d.action == Action::Create));
        let id = diffs[0].changes.iter().find(|c| c.name == "id").unwrap();
        assert_eq!(id.after, Value::Unknown);
        assert_eq!(id.after.to_string(), UNKNOWN_DISPLAY);
        assert_eq!(mock.total_calls(), 0);
    }

    #[test]
    fn test_preview_change_keeps_identity_concrete() {
        let mock = MockBackend::new();
        let reconciler = WebhookReconciler::new(mock.clone());
        let dir = TempDir::new().unwrap();
        let state = apply_all(&reconciler, &dir);

        let renamed = TWO_WEBHOOKS.replace("name = \"cdrs\"", "name = \"cdr-feed\"");
        let diffs = preview(&reconciler, &config(&renamed), &state, &plan_args(), true).unwrap();

        let cdrs = diffs.iter().find(|d| d.address == "cdrs").unwrap();
        assert_eq!(cdrs.action, Action::Update);
        let changed: Vec<_> = cdrs.changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(changed, vec!["name", "updated"]);

        assert!(diffs.iter().all(|d| d.address != "sessions"));
    }

    #[test]
    fn test_preview_does_not_write_state() {
        let mock = MockBackend::new();
        let reconciler = WebhookReconciler::new(mock.clone());
        let dir = TempDir::new().unwrap();
        let state = apply_all(&reconciler, &dir);
        let id = state.webhooks["sessions"].id.clone();
        mock.remove(&id);

        let diffs = preview(&reconciler, &config(TWO_WEBHOOKS), &state, &plan_args(), true).unwrap();
        let sessions = diffs.iter().find(|d| d.address == "sessions").unwrap();
        assert_eq!(sessions.action, Action::Create);

        let saved = LongshipState::load(&dir.path().join("state.toml")).unwrap();
        assert!(saved.webhooks.contains_key("sessions"));
    }

    #[test]
    fn test_preview_without_refresh_makes_no_calls() {
        let mock = MockBackend::new();
        let reconciler = WebhookReconciler::new(mock.clone());
        let dir = TempDir::new().unwrap();
        let state = apply_all(&reconciler, &dir);
        let calls = mock.total_calls();

        let args = PlanArgs {
            target: Some("sessions".to_string()),
            no_refresh: true,
        };
        let diffs = preview(&reconciler, &config(TWO_WEBHOOKS), &state, &args, true).unwrap();

        assert!(diffs.iter().all(|d| d.address == "sessions"));
        assert_eq!(mock.total_calls(), calls);
        assert_eq!(mock.calls(Endpoint::GetWebhook), 0);
    }
}
