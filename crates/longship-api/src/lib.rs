//! # longship-api
//!
//! Blocking client for the Longship charging platform API.
//!
//! This crate provides:
//! - Wire types for webhooks, charge points and organizational units
//! - The [`WebhookApi`] trait covering webhook list/get/create/update/delete
//! - [`HttpBackend`], a `ureq` implementation with a bounded request timeout
//! - [`MockBackend`], an in-memory server for tests
//!
//! ## Example
//!
//! ```no_run
//! use longship_api::{Credentials, HttpBackend, WebhookApi};
//!
//! let backend = HttpBackend::new(Credentials::from_env().expect("credentials"));
//!
//! for webhook in backend.list_webhooks().expect("list failed") {
//!     println!("{} {}", webhook.id, webhook.name);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
#[allow(missing_docs)]
pub mod types;

pub use backend::http::HttpBackend;
pub use backend::{Endpoint, MockBackend, WebhookApi};
pub use error::{Error, ErrorCategory, Result};
pub use types::{
    APPLICATION_KEY_ENV, Chargepoint, Connector, Credentials, Evse, FinancialDetails, HOST_ENV,
    Header, OrganizationalUnit, TENANT_KEY_ENV, Webhook, WebhookRequest,
};
