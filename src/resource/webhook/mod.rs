//! Longship webhook resource

pub mod event_type;
pub mod model;
pub mod reconciler;
pub mod schema;

pub use event_type::EventType;
pub use model::{WebhookConfig, WebhookState};
pub use reconciler::{RESOURCE_TYPE, WebhookReconciler};
