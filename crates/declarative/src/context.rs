//! Cycle context and callback traits
//!
//! These traits let hosts observe and steer reconciliation without the
//! engine depending on any particular logging, UI, or prompt library.

use crate::error::{Error, Result};
use crate::types::{ApplyResult, Operation};
use anyhow::Result as AnyResult;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of a remote call, as reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome<'a> {
    /// The call succeeded
    Success,
    /// The call failed
    Failure {
        message: &'a str,
        status: Option<u16>,
    },
}

/// Structured events emitted at the engine's extension points
///
/// Every method has an empty default so observers only implement what
/// they care about. Observers are shared across cycles and must not
/// assume calls for different identities arrive in any order.
pub trait ReconcileObserver: Send + Sync {
    /// Called right before a remote call is made
    fn on_pre_call(&self, _operation: Operation, _identity: Option<&str>) {}

    /// Called right after a remote call returns
    fn on_post_call(&self, _operation: Operation, _identity: Option<&str>, _outcome: CallOutcome<'_>) {
    }

    /// Called when a stored identity is missing from the remote listing
    fn on_drift_detected(&self, _identity: &str) {}

    /// Called when a plan modifier replaced an unknown planned value
    fn on_plan_modified(&self, _attribute: &str) {}
}

/// Observer that ignores every event
pub struct NoObserver;

impl ReconcileObserver for NoObserver {}

/// Observer that renders events through the `log` facade
pub struct LogObserver {
    resource_type: &'static str,
}

impl LogObserver {
    /// Create an observer tagging events with a resource type
    pub fn new(resource_type: &'static str) -> Self {
        Self { resource_type }
    }
}

impl ReconcileObserver for LogObserver {
    fn on_pre_call(&self, operation: Operation, identity: Option<&str>) {
        log::debug!(
            "resource={} op={} id={} event=pre_call",
            self.resource_type,
            operation,
            identity.unwrap_or("-")
        );
    }

    fn on_post_call(&self, operation: Operation, identity: Option<&str>, outcome: CallOutcome<'_>) {
        match outcome {
            CallOutcome::Success => log::debug!(
                "resource={} op={} id={} event=post_call outcome=ok",
                self.resource_type,
                operation,
                identity.unwrap_or("-")
            ),
            CallOutcome::Failure { message, status } => log::warn!(
                "resource={} op={} id={} event=post_call outcome=error status={} message={}",
                self.resource_type,
                operation,
                identity.unwrap_or("-"),
                status.map_or_else(|| "-".to_string(), |s| s.to_string()),
                message
            ),
        }
    }

    fn on_drift_detected(&self, identity: &str) {
        log::warn!(
            "resource={} id={} event=drift_detected removed=true",
            self.resource_type,
            identity
        );
    }

    fn on_plan_modified(&self, attribute: &str) {
        log::debug!(
            "resource={} attribute={} event=plan_modified source=prior_state",
            self.resource_type,
            attribute
        );
    }
}

/// Cooperative cancellation flag shared between a host and its cycles
///
/// Library hosts pass their own token through [`CycleContext::with_cancel`].
/// The `longship` CLI does not cancel its tokens: it installs no signal
/// handler, so its cycles only end by completing or failing.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that has not been cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

static NO_OBSERVER: NoObserver = NoObserver;

/// Context passed to every reconciliation cycle
#[derive(Clone)]
pub struct CycleContext<'a> {
    /// Cancellation flag checked before and after remote calls
    pub cancel: CancelToken,
    /// Receiver for structured events
    pub observer: &'a dyn ReconcileObserver,
}

impl<'a> CycleContext<'a> {
    /// Create a context reporting to an observer
    pub fn new(observer: &'a dyn ReconcileObserver) -> Self {
        Self {
            cancel: CancelToken::new(),
            observer,
        }
    }

    /// Use a caller-owned cancellation token
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Fail with `Cancelled` if the caller asked to stop
    pub fn checkpoint(&self, operation: Operation) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled { operation });
        }
        Ok(())
    }
}

impl Default for CycleContext<'static> {
    fn default() -> Self {
        Self::new(&NO_OBSERVER)
    }
}

/// Progress callback for execution operations
pub trait ProgressCallback: Send {
    /// Called once before the first change is applied
    fn on_batch_start(&mut self, count: usize);

    /// Called when starting to apply a single change
    fn on_resource_start(&mut self, address: &str, description: &str);

    /// Called when a change completes
    fn on_resource_complete(&mut self, address: &str, result: &ApplyResult);

    /// Called after the last change
    fn on_batch_complete(&mut self);
}

/// Confirmation callback for user interaction
pub trait ConfirmCallback: Send {
    /// Ask the user to confirm an action
    fn confirm(&mut self, prompt: &str) -> AnyResult<bool>;
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_batch_start(&mut self, _count: usize) {}
    fn on_resource_start(&mut self, _address: &str, _description: &str) {}
    fn on_resource_complete(&mut self, _address: &str, _result: &ApplyResult) {}
    fn on_batch_complete(&mut self) {}
}

/// Auto-confirm callback (always returns true)
pub struct AutoConfirm;

impl ConfirmCallback for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> AnyResult<bool> {
        Ok(true)
    }
}

/// Auto-decline callback (always returns false)
pub struct AutoDecline;

impl ConfirmCallback for AutoDecline {
    fn confirm(&mut self, _prompt: &str) -> AnyResult<bool> {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_checkpoint() {
        let ctx = CycleContext::default();
        assert!(ctx.checkpoint(Operation::Get).is_ok());

        ctx.cancel.cancel();
        let err = ctx.checkpoint(Operation::Get).unwrap_err();
        assert!(matches!(err, Error::Cancelled { operation: Operation::Get }));
    }

    #[test]
    fn test_with_cancel_uses_caller_token() {
        let token = CancelToken::new();
        let ctx = CycleContext::default().with_cancel(token.clone());
        token.cancel();
        assert!(ctx.checkpoint(Operation::Delete).is_err());
    }

    #[test]
    fn test_auto_callbacks() {
        assert!(AutoConfirm.confirm("go?").unwrap());
        assert!(!AutoDecline.confirm("go?").unwrap());
    }
}
