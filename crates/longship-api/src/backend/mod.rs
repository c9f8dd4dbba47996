//! Backend trait and implementations for the webhook endpoints.
//!
//! [`http::HttpBackend`] talks to the real API. [`MockBackend`] keeps
//! webhooks in memory and is what the reconciler tests drive.
//!
//! # Testing
//!
//! ```
//! use longship_api::backend::{Endpoint, MockBackend, WebhookApi};
//! use longship_api::WebhookRequest;
//!
//! let mock = MockBackend::new();
//! let created = mock
//!     .create_webhook(&WebhookRequest {
//!         name: "test".into(),
//!         ou_code: "0000".into(),
//!         enabled: true,
//!         event_types: vec!["SESSION_START".into()],
//!         headers: vec![],
//!         url: "https://example.com".into(),
//!     })
//!     .unwrap();
//!
//! assert_eq!(mock.list_webhooks().unwrap().len(), 1);
//! assert_eq!(mock.calls(Endpoint::CreateWebhook), 1);
//! assert!(!created.id.is_empty());
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{Webhook, WebhookRequest};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Remote operations on webhook records.
///
/// Implementations make exactly one request per call and never retry.
pub trait WebhookApi: Send + Sync {
    /// List every webhook visible to the tenant.
    fn list_webhooks(&self) -> Result<Vec<Webhook>>;

    /// Fetch a single webhook, including its headers.
    fn get_webhook(&self, id: &str) -> Result<Webhook>;

    /// Create a webhook and return the server's record.
    fn create_webhook(&self, request: &WebhookRequest) -> Result<Webhook>;

    /// Replace a webhook and return the server's record.
    fn update_webhook(&self, id: &str, request: &WebhookRequest) -> Result<Webhook>;

    /// Delete a webhook.
    fn delete_webhook(&self, id: &str) -> Result<()>;
}

impl<T: WebhookApi + ?Sized> WebhookApi for Arc<T> {
    fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        (**self).list_webhooks()
    }

    fn get_webhook(&self, id: &str) -> Result<Webhook> {
        (**self).get_webhook(id)
    }

    fn create_webhook(&self, request: &WebhookRequest) -> Result<Webhook> {
        (**self).create_webhook(request)
    }

    fn update_webhook(&self, id: &str, request: &WebhookRequest) -> Result<Webhook> {
        (**self).update_webhook(id, request)
    }

    fn delete_webhook(&self, id: &str) -> Result<()> {
        (**self).delete_webhook(id)
    }
}

/// Webhook endpoints, used to count calls and inject failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `GET /v1/webhooks`
    ListWebhooks,
    /// `GET /v1/webhooks/{id}`
    GetWebhook,
    /// `POST /v1/webhooks`
    CreateWebhook,
    /// `PUT /v1/webhooks/{id}`
    UpdateWebhook,
    /// `DELETE /v1/webhooks/{id}`
    DeleteWebhook,
}

impl Endpoint {
    /// Request line for display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListWebhooks => "GET /v1/webhooks",
            Self::GetWebhook => "GET /v1/webhooks/{id}",
            Self::CreateWebhook => "POST /v1/webhooks",
            Self::UpdateWebhook => "PUT /v1/webhooks/{id}",
            Self::DeleteWebhook => "DELETE /v1/webhooks/{id}",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Default)]
struct MockState {
    webhooks: BTreeMap<String, Webhook>,
    next_id: u64,
    clock: u64,
    calls: HashMap<Endpoint, usize>,
    failures: HashMap<Endpoint, (u16, String)>,
    omit_identity_on_get: bool,
    reassign_id_on_update: bool,
}

impl MockState {
    fn tick(&mut self) -> String {
        self.clock += 1;
        format!("2024-01-01T00:00:00.{:06}Z", self.clock)
    }

    fn enter(&mut self, endpoint: Endpoint) -> Result<()> {
        *self.calls.entry(endpoint).or_default() += 1;
        match self.failures.get(&endpoint) {
            Some((status, body)) => Err(Error::status(*status, body.clone())),
            None => Ok(()),
        }
    }

    fn not_found(id: &str) -> Error {
        Error::status(404, format!(r#"{{"message":"webhook {id} not found"}}"#))
    }
}

/// In-memory webhook server for testing without network access.
///
/// Clones share the same server, so a test can keep a handle after handing
/// one to a reconciler.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a webhook as if it had been created elsewhere.
    pub fn insert(&self, webhook: Webhook) {
        self.lock().webhooks.insert(webhook.id.clone(), webhook);
    }

    /// Delete a webhook out of band.
    pub fn remove(&self, id: &str) -> Option<Webhook> {
        self.lock().webhooks.remove(id)
    }

    /// Current server-side record, without counting a call.
    #[must_use]
    pub fn peek(&self, id: &str) -> Option<Webhook> {
        self.lock().webhooks.get(id).cloned()
    }

    /// Number of calls made to an endpoint.
    #[must_use]
    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.lock().calls.get(&endpoint).copied().unwrap_or(0)
    }

    /// Total number of calls across every endpoint.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Make every call to an endpoint fail with a status and body.
    pub fn fail(&self, endpoint: Endpoint, status: u16, body: impl Into<String>) {
        self.lock().failures.insert(endpoint, (status, body.into()));
    }

    /// Stop injecting failures.
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Make single-record fetches omit the identity and created timestamp.
    pub fn omit_identity_on_get(&self, omit: bool) {
        self.lock().omit_identity_on_get = omit;
    }

    /// Make updates answer with a freshly assigned identity.
    pub fn reassign_id_on_update(&self, reassign: bool) {
        self.lock().reassign_id_on_update = reassign;
    }
}

impl WebhookApi for MockBackend {
    fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        let mut state = self.lock();
        state.enter(Endpoint::ListWebhooks)?;
        Ok(state
            .webhooks
            .values()
            .map(|w| Webhook {
                headers: Vec::new(),
                ..w.clone()
            })
            .collect())
    }

    fn get_webhook(&self, id: &str) -> Result<Webhook> {
        let mut state = self.lock();
        state.enter(Endpoint::GetWebhook)?;
        let mut webhook = state
            .webhooks
            .get(id)
            .cloned()
            .ok_or_else(|| MockState::not_found(id))?;
        if state.omit_identity_on_get {
            webhook.id.clear();
            webhook.created.clear();
        }
        Ok(webhook)
    }

    fn create_webhook(&self, request: &WebhookRequest) -> Result<Webhook> {
        let mut state = self.lock();
        state.enter(Endpoint::CreateWebhook)?;
        state.next_id += 1;
        let id = format!("wh-{:04}", state.next_id);
        let now = state.tick();
        let webhook = Webhook {
            id: id.clone(),
            name: request.name.clone(),
            ou_code: request.ou_code.clone(),
            enabled: request.enabled,
            event_types: request.event_types.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            created: now.clone(),
            updated: now,
        };
        state.webhooks.insert(id, webhook.clone());
        Ok(webhook)
    }

    fn update_webhook(&self, id: &str, request: &WebhookRequest) -> Result<Webhook> {
        let mut state = self.lock();
        state.enter(Endpoint::UpdateWebhook)?;
        let created = state
            .webhooks
            .get(id)
            .map(|w| w.created.clone())
            .ok_or_else(|| MockState::not_found(id))?;
        let now = state.tick();
        let mut webhook = Webhook {
            id: id.to_string(),
            name: request.name.clone(),
            ou_code: request.ou_code.clone(),
            enabled: request.enabled,
            event_types: request.event_types.clone(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            created,
            updated: now,
        };
        state.webhooks.insert(id.to_string(), webhook.clone());
        if state.reassign_id_on_update {
            state.next_id += 1;
            webhook.id = format!("wh-{:04}", state.next_id);
        }
        Ok(webhook)
    }

    fn delete_webhook(&self, id: &str) -> Result<()> {
        let mut state = self.lock();
        state.enter(Endpoint::DeleteWebhook)?;
        state
            .webhooks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MockState::not_found(id))
    }
}
