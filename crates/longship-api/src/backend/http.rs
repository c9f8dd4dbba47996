//! HTTP backend for the Longship API.
//!
//! Every request carries the tenant key as `Ocp-Apim-Subscription-Key` and
//! the application key as `x-api-key`. Any 2xx response is a success;
//! anything else becomes [`Error::Status`] with the response body attached.

use crate::backend::WebhookApi;
use crate::error::{Error, Result};
use crate::types::{Chargepoint, Credentials, OrganizationalUnit, Webhook, WebhookRequest};
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::Body;
use ureq::http::Response;

/// Timeout applied to every request, connect through body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Blocking Longship API client.
///
/// # Example
///
/// ```no_run
/// use longship_api::backend::WebhookApi;
/// use longship_api::backend::http::HttpBackend;
/// use longship_api::Credentials;
///
/// let backend = HttpBackend::new(Credentials::from_env().unwrap());
/// let webhooks = backend.list_webhooks().unwrap();
/// println!("Found {} webhooks", webhooks.len());
/// ```
pub struct HttpBackend {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Host and keys.
    credentials: Credentials,
}

impl HttpBackend {
    /// Create a backend for the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, credentials }
    }

    /// Get the API base URL.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.credentials.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.credentials.host, path)
    }

    fn webhook_url(&self, id: &str) -> String {
        self.url(&format!("webhooks/{id}"))
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        request
            .header("Ocp-Apim-Subscription-Key", self.credentials.tenant_key.as_str())
            .header("x-api-key", self.credentials.application_key.as_str())
            .header("Accept", "application/json")
    }

    /// Read the body, turning non-2xx responses into errors.
    fn read_body(method: &str, url: &str, mut response: Response<Body>) -> Result<String> {
        let status = response.status();
        let body = response.body_mut().read_to_string()?;
        log::debug!("{method} {url} -> {}", status.as_u16());
        if !status.is_success() {
            return Err(Error::status(status.as_u16(), body));
        }
        Ok(body)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("GET {url}");
        let response = self.authorize(self.agent.get(url)).call()?;
        let body = Self::read_body("GET", url, response)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// List every charge point visible to the tenant.
    pub fn list_chargepoints(&self) -> Result<Vec<Chargepoint>> {
        self.get_json(&self.url("chargepoints"))
    }

    /// List every organizational unit visible to the tenant.
    pub fn list_organizational_units(&self) -> Result<Vec<OrganizationalUnit>> {
        self.get_json(&self.url("organizationalunits"))
    }
}

impl WebhookApi for HttpBackend {
    fn list_webhooks(&self) -> Result<Vec<Webhook>> {
        self.get_json(&self.url("webhooks"))
    }

    fn get_webhook(&self, id: &str) -> Result<Webhook> {
        self.get_json(&self.webhook_url(id))
    }

    fn create_webhook(&self, request: &WebhookRequest) -> Result<Webhook> {
        let url = self.url("webhooks");
        log::debug!("POST {url}");
        let response = self.authorize(self.agent.post(&url)).send_json(request)?;
        let body = Self::read_body("POST", &url, response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn update_webhook(&self, id: &str, request: &WebhookRequest) -> Result<Webhook> {
        let url = self.webhook_url(id);
        log::debug!("PUT {url}");
        let response = self.authorize(self.agent.put(&url)).send_json(request)?;
        let body = Self::read_body("PUT", &url, response)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn delete_webhook(&self, id: &str) -> Result<()> {
        let url = self.webhook_url(id);
        log::debug!("DELETE {url}");
        let response = self.authorize(self.agent.delete(&url)).call()?;
        Self::read_body("DELETE", &url, response)?;
        Ok(())
    }
}
