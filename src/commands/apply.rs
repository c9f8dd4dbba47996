//! `longship apply` - make remote webhooks match the config

use anyhow::{Result, bail};
use declarative::{CycleContext, ExecuteOptions, ExecuteSummary, ExecutionPlan, LogObserver, execute};
use longship_api::WebhookApi;

use crate::Context;
use crate::cli::ApplyArgs;
use crate::config::LongshipConfig;
use crate::engine::{DialoguerConfirm, display_diff, print_summary};
use crate::progress::SpinnerProgress;
use crate::resource::webhook::{RESOURCE_TYPE, WebhookReconciler};
use crate::state::StateFile;
use crate::ui;

pub fn run(ctx: &Context, args: &ApplyArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let mut state_file = ctx.open_state()?;
    let reconciler = super::connect(&config)?;

    apply(&reconciler, &config, &mut state_file, args, ctx.quiet)?;
    Ok(())
}

/// Refresh, plan and execute; every successful change is saved immediately
pub fn apply<B: WebhookApi>(
    reconciler: &WebhookReconciler<B>,
    config: &LongshipConfig,
    state_file: &mut StateFile,
    args: &ApplyArgs,
    quiet: bool,
) -> Result<ExecuteSummary> {
    let observer = LogObserver::new(RESOURCE_TYPE);
    let cycle = CycleContext::new(&observer);

    if !args.no_refresh {
        let stored = state_file.state.webhooks.clone();
        super::refresh_state(reconciler, &stored, &cycle, quiet, |address, commit| {
            state_file.commit(address, commit)
        })?;
    }

    let plan = ExecutionPlan::build(
        reconciler,
        &config.desired(),
        &state_file.state.webhooks,
        &cycle,
    )?
    .filter_by_target(RESOURCE_TYPE, args.target.as_deref());

    display_diff(&plan.diffs());
    if plan.is_empty() {
        return Ok(ExecuteSummary::default());
    }

    if args.dry_run {
        println!();
        ui::info("Dry run - no changes made");
        return Ok(ExecuteSummary::default());
    }

    let planned = plan.len();
    let opts = ExecuteOptions {
        dry_run: false,
        fail_fast: args.fail_fast,
    };
    let mut progress = SpinnerProgress::new(quiet);
    let mut confirm = DialoguerConfirm::new(args.yes);

    let summary = execute(
        plan,
        reconciler,
        &opts,
        &cycle,
        &mut progress,
        &mut confirm,
        |address, commit| state_file.commit(address, commit),
    )?;

    if summary.skipped == planned && summary.failed == 0 {
        return Ok(summary);
    }

    print_summary(&summary, "Apply");
    if !summary.is_success() {
        bail!("{} change(s) failed", summary.failed);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{TWO_WEBHOOKS, config, state_file};
    use crate::resource::webhook::EventType;
    use longship_api::{Endpoint, MockBackend};
    use tempfile::TempDir;

    fn args() -> ApplyArgs {
        ApplyArgs {
            dry_run: false,
            yes: true,
            target: None,
            no_refresh: false,
            fail_fast: false,
        }
    }

    fn setup() -> (MockBackend, WebhookReconciler<MockBackend>, TempDir) {
        let mock = MockBackend::new();
        let reconciler = WebhookReconciler::new(mock.clone());
        (mock, reconciler, TempDir::new().unwrap())
    }

    #[test]
    fn test_apply_creates_and_saves_state() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);

        let summary = apply(&reconciler, &config(TWO_WEBHOOKS), &mut file, &args(), true).unwrap();
        assert_eq!(summary.created, 2);
        assert_eq!(mock.calls(Endpoint::CreateWebhook), 2);

        let saved = crate::state::LongshipState::load(file.path()).unwrap();
        assert_eq!(saved.webhooks.len(), 2);
        assert_eq!(saved.webhooks["sessions"].headers["x-token"], "abc");
        assert!(saved.webhooks["sessions"].enabled);
        assert!(!saved.webhooks["cdrs"].enabled);
    }

    #[test]
    fn test_second_apply_is_noop() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        let config = config(TWO_WEBHOOKS);

        apply(&reconciler, &config, &mut file, &args(), true).unwrap();
        let summary = apply(&reconciler, &config, &mut file, &args(), true).unwrap();

        assert_eq!(summary.total(), 0);
        assert_eq!(mock.calls(Endpoint::CreateWebhook), 2);
        assert_eq!(mock.calls(Endpoint::UpdateWebhook), 0);
        assert_eq!(mock.calls(Endpoint::GetWebhook), 2);
    }

    #[test]
    fn test_apply_updates_changed_webhook() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        apply(&reconciler, &config(TWO_WEBHOOKS), &mut file, &args(), true).unwrap();
        let before = file.state.webhooks["cdrs"].clone();

        let changed = TWO_WEBHOOKS.replace(r#"["CDR_CREATED"]"#, r#"["CDR_CREATED", "SESSION_STOP"]"#);
        let summary = apply(&reconciler, &config(&changed), &mut file, &args(), true).unwrap();

        assert_eq!(summary.modified, 1);
        let after = &file.state.webhooks["cdrs"];
        assert_eq!(after.id, before.id);
        assert_eq!(after.created, before.created);
        assert!(after.event_types.contains(&EventType::SessionStop));
        assert_eq!(mock.calls(Endpoint::UpdateWebhook), 1);
    }

    #[test]
    fn test_apply_deletes_unconfigured_webhook() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        apply(&reconciler, &config(TWO_WEBHOOKS), &mut file, &args(), true).unwrap();
        let id = file.state.webhooks["cdrs"].id.clone();

        let only_sessions = TWO_WEBHOOKS
            .split("[webhooks.cdrs]")
            .next()
            .unwrap()
            .to_string();
        let summary = apply(&reconciler, &config(&only_sessions), &mut file, &args(), true).unwrap();

        assert_eq!(summary.removed, 1);
        assert!(mock.peek(&id).is_none());
        assert!(!file.state.webhooks.contains_key("cdrs"));
    }

    #[test]
    fn test_apply_recreates_webhook_removed_elsewhere() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        let config = config(TWO_WEBHOOKS);
        apply(&reconciler, &config, &mut file, &args(), true).unwrap();
        let old_id = file.state.webhooks["sessions"].id.clone();
        mock.remove(&old_id);

        let summary = apply(&reconciler, &config, &mut file, &args(), true).unwrap();
        assert_eq!(summary.created, 1);
        assert_ne!(file.state.webhooks["sessions"].id, old_id);
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        let dry_run = ApplyArgs {
            dry_run: true,
            ..args()
        };

        apply(&reconciler, &config(TWO_WEBHOOKS), &mut file, &dry_run, true).unwrap();
        assert_eq!(mock.calls(Endpoint::CreateWebhook), 0);
        assert!(file.state.webhooks.is_empty());
        assert!(!file.path().exists());
    }

    #[test]
    fn test_target_limits_changes() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        let targeted = ApplyArgs {
            target: Some("webhook.cdrs".to_string()),
            ..args()
        };

        let summary = apply(&reconciler, &config(TWO_WEBHOOKS), &mut file, &targeted, true).unwrap();
        assert_eq!(summary.created, 1);
        assert_eq!(mock.calls(Endpoint::CreateWebhook), 1);
        assert!(file.state.webhooks.contains_key("cdrs"));
    }

    #[test]
    fn test_invalid_config_makes_no_calls() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        let bad = TWO_WEBHOOKS.replace("CDR_CREATED", "CDR_DELETED");

        let err = apply(&reconciler, &config(&bad), &mut file, &args(), true).unwrap_err();
        assert!(format!("{err:#}").contains("event_types[0]"));
        assert_eq!(mock.total_calls(), 0);
    }

    #[test]
    fn test_failed_create_is_reported_and_not_saved() {
        let (mock, reconciler, dir) = setup();
        let mut file = state_file(&dir);
        mock.fail(Endpoint::CreateWebhook, 400, "bad url");

        let err = apply(&reconciler, &config(TWO_WEBHOOKS), &mut file, &args(), true).unwrap_err();
        assert!(err.to_string().contains("failed"));
        assert!(file.state.webhooks.is_empty());
    }
}
