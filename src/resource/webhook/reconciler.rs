//! Webhook reconciler - drives one webhook through its lifecycle
//!
//! Each method is one reconciliation cycle against a [`WebhookApi`]:
//!
//! - `create` sends the planned attributes and records the server's record
//! - `read` lists webhooks to confirm the identity still exists, then
//!   fetches the full record; a missing identity is reported as `Removed`
//! - `update` replaces the whole record, keeping identity and created
//! - `delete` removes the record
//! - `import` reads a record the host has no state for

use super::model::{WebhookConfig, WebhookPlan, WebhookState};
use super::schema;
use declarative::{
    CallOutcome, CycleContext, Error, ModifyRequest, Operation, PlanModifier, ReadOutcome, Resource,
    Result, UseStateForUnknown, Value,
};
use longship_api::WebhookApi;

/// Resource type name
pub const RESOURCE_TYPE: &str = "webhook";

/// Reconciles webhooks through an owned API client
pub struct WebhookReconciler<B> {
    client: B,
}

impl<B: WebhookApi> WebhookReconciler<B> {
    /// Create a reconciler that owns its client
    pub fn new(client: B) -> Self {
        Self { client }
    }

    /// Make one remote call, reporting it to the observer
    ///
    /// Cancellation is checked before the call is made and again after it
    /// returns, so a cancelled cycle never produces state.
    fn call<T, F>(
        &self,
        ctx: &CycleContext<'_>,
        operation: Operation,
        identity: Option<&str>,
        f: F,
    ) -> Result<T>
    where
        F: FnOnce(&B) -> longship_api::Result<T>,
    {
        ctx.checkpoint(operation)?;
        ctx.observer.on_pre_call(operation, identity);

        let value = match f(&self.client) {
            Ok(value) => {
                ctx.observer
                    .on_post_call(operation, identity, CallOutcome::Success);
                value
            }
            Err(e) => {
                let message = e.to_string();
                let status = e.status_code();
                ctx.observer.on_post_call(
                    operation,
                    identity,
                    CallOutcome::Failure {
                        message: &message,
                        status,
                    },
                );
                return Err(Error::transport(operation, message, status));
            }
        };

        ctx.checkpoint(operation)?;
        Ok(value)
    }

    /// List, then get: the shared path of `read` and `import`
    fn fetch(
        &self,
        identity: &str,
        fallback_created: &str,
        ctx: &CycleContext<'_>,
    ) -> Result<ReadOutcome<WebhookState>> {
        let listed = self.call(ctx, Operation::List, Some(identity), |c| c.list_webhooks())?;
        if !listed.iter().any(|w| w.id == identity) {
            log::info!("Webhook {identity} no longer exists remotely");
            ctx.observer.on_drift_detected(identity);
            return Ok(ReadOutcome::Removed);
        }

        let remote = self.call(ctx, Operation::Get, Some(identity), |c| c.get_webhook(identity))?;
        let state = WebhookState::from_remote(Operation::Get, remote, identity, fallback_created)?;
        Ok(ReadOutcome::Present(state))
    }
}

impl<B: WebhookApi> Resource for WebhookReconciler<B> {
    type Config = WebhookConfig;
    type Plan = WebhookPlan;
    type State = WebhookState;

    fn resource_type(&self) -> &'static str {
        RESOURCE_TYPE
    }

    fn identity<'s>(&self, state: &'s WebhookState) -> &'s str {
        &state.id
    }

    fn plan(
        &self,
        config: &WebhookConfig,
        prior: Option<&WebhookState>,
        ctx: &CycleContext<'_>,
    ) -> Result<WebhookPlan> {
        let mut plan = WebhookPlan::from_config(config)?;
        let Some(prior) = prior else {
            return Ok(plan);
        };

        if plan.matches_user_attributes(prior) {
            plan.id = Value::Known(prior.id.clone());
            plan.created = Value::Known(prior.created.clone());
            plan.updated = Value::Known(prior.updated.clone());
            return Ok(plan);
        }

        let modifier = UseStateForUnknown;
        for attribute in schema::preserved_attributes() {
            let state_value: Value<String> = prior
                .computed(attribute.name)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .into();
            let Some(planned) = plan.computed_mut(attribute.name) else {
                continue;
            };
            let resolved = modifier.modify(&ModifyRequest {
                has_prior_state: true,
                state_value: &state_value,
                plan_value: &*planned,
                config_value: &Value::Null,
            });
            if resolved != *planned {
                ctx.observer.on_plan_modified(attribute.name);
                *planned = resolved;
            }
        }

        Ok(plan)
    }

    fn create(&self, plan: &WebhookPlan, ctx: &CycleContext<'_>) -> Result<WebhookState> {
        if let Value::Known(id) = &plan.id {
            return Err(Error::invariant(format!(
                "create called for webhook that already has id {id}"
            )));
        }
        let request = plan.to_request()?;

        let remote = self.call(ctx, Operation::Create, None, |c| c.create_webhook(&request))?;
        if remote.id.is_empty() {
            return Err(Error::transport(
                Operation::Create,
                "invalid response: server did not return an id",
                None,
            ));
        }

        let state = WebhookState::from_remote(Operation::Create, remote, "", "")?;
        log::info!("Created webhook {} ({})", state.name, state.id);
        Ok(state)
    }

    fn read(&self, state: &WebhookState, ctx: &CycleContext<'_>) -> Result<ReadOutcome<WebhookState>> {
        self.fetch(&state.id, &state.created, ctx)
    }

    fn update(&self, plan: &WebhookPlan, ctx: &CycleContext<'_>) -> Result<WebhookState> {
        let id = match &plan.id {
            Value::Known(id) if !id.is_empty() => id.as_str(),
            _ => {
                return Err(Error::invariant(
                    "update called for webhook without a known id",
                ));
            }
        };
        let request = plan.to_request()?;

        let remote = self.call(ctx, Operation::Update, Some(id), |c| c.update_webhook(id, &request))?;
        if !remote.id.is_empty() && remote.id != id {
            return Err(Error::invariant(format!(
                "server changed webhook id from {id} to {}",
                remote.id
            )));
        }

        let mut state = WebhookState::from_remote(Operation::Update, remote, id, "")?;
        if let Value::Known(created) = &plan.created
            && !created.is_empty()
        {
            state.created = created.clone();
        }
        log::info!("Updated webhook {} ({})", state.name, state.id);
        Ok(state)
    }

    fn delete(&self, identity: &str, ctx: &CycleContext<'_>) -> Result<()> {
        self.call(ctx, Operation::Delete, Some(identity), |c| c.delete_webhook(identity))?;
        log::info!("Deleted webhook {identity}");
        Ok(())
    }

    fn import(&self, identity: &str, ctx: &CycleContext<'_>) -> Result<ReadOutcome<WebhookState>> {
        self.fetch(identity, "", ctx)
    }
}
