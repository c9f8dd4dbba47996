//! Attribute schema and configuration validation for webhooks
//!
//! The schema is static. Validation runs during planning, before any
//! remote call, and reports the exact attribute that is wrong.

use super::event_type::EventType;
use declarative::{AttributePath, Error, Result, Value};
use std::collections::{BTreeMap, BTreeSet};

/// How an attribute gets its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    /// Must be set in configuration
    Required,
    /// May be omitted; the default is planned instead
    Optional { default: &'static str },
    /// Set by the server, never by configuration
    Computed,
}

/// One attribute of the webhook resource
#[derive(Debug, Clone, Copy)]
pub struct AttributeSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub mode: AttributeMode,
    /// Carry the prior state value forward when the plan leaves it unknown
    pub use_state_for_unknown: bool,
}

pub static WEBHOOK_SCHEMA: &[AttributeSchema] = &[
    AttributeSchema {
        name: "id",
        description: "Server-assigned identifier",
        mode: AttributeMode::Computed,
        use_state_for_unknown: true,
    },
    AttributeSchema {
        name: "name",
        description: "Display name",
        mode: AttributeMode::Required,
        use_state_for_unknown: false,
    },
    AttributeSchema {
        name: "ou_code",
        description: "Organizational unit the webhook is scoped to",
        mode: AttributeMode::Required,
        use_state_for_unknown: false,
    },
    AttributeSchema {
        name: "enabled",
        description: "Whether deliveries are active",
        mode: AttributeMode::Optional { default: "true" },
        use_state_for_unknown: false,
    },
    AttributeSchema {
        name: "event_types",
        description: "Events that trigger a delivery",
        mode: AttributeMode::Required,
        use_state_for_unknown: false,
    },
    AttributeSchema {
        name: "url",
        description: "Delivery URL",
        mode: AttributeMode::Required,
        use_state_for_unknown: false,
    },
    AttributeSchema {
        name: "headers",
        description: "Extra headers sent with every delivery",
        mode: AttributeMode::Optional { default: "{}" },
        use_state_for_unknown: false,
    },
    AttributeSchema {
        name: "created",
        description: "Creation timestamp",
        mode: AttributeMode::Computed,
        use_state_for_unknown: true,
    },
    AttributeSchema {
        name: "updated",
        description: "Last modification timestamp",
        mode: AttributeMode::Computed,
        use_state_for_unknown: false,
    },
];

/// Look up an attribute by name
pub fn attribute(name: &str) -> Option<&'static AttributeSchema> {
    WEBHOOK_SCHEMA.iter().find(|a| a.name == name)
}

/// Computed attributes that keep their prior value across updates
pub fn preserved_attributes() -> impl Iterator<Item = &'static AttributeSchema> {
    WEBHOOK_SCHEMA
        .iter()
        .filter(|a| a.mode == AttributeMode::Computed && a.use_state_for_unknown)
}

/// Fail if a required attribute is null
pub fn require<T>(name: &'static str, value: &Value<T>) -> Result<()> {
    if value.is_null() {
        return Err(Error::configuration(
            AttributePath::root(name),
            "attribute is required",
        ));
    }
    Ok(())
}

/// Parse event type names into a set
///
/// The list must be non-empty, contain only supported event types, and
/// name each one at most once.
pub fn validate_event_types(names: &[String]) -> Result<BTreeSet<EventType>> {
    if names.is_empty() {
        return Err(Error::configuration(
            AttributePath::root("event_types"),
            "at least one event type is required",
        ));
    }

    let mut events = BTreeSet::new();
    for (i, name) in names.iter().enumerate() {
        let path = || AttributePath::root("event_types").index(i);
        let event: EventType = name.parse().map_err(|e| {
            Error::configuration(path(), format!("{e}; expected one of {}", EventType::expected()))
        })?;
        if !events.insert(event) {
            return Err(Error::configuration(
                path(),
                format!("duplicate event type \"{event}\""),
            ));
        }
    }
    Ok(events)
}

/// Check header names
pub fn validate_headers(headers: &BTreeMap<String, String>) -> Result<()> {
    for name in headers.keys() {
        if name.trim().is_empty() {
            return Err(Error::configuration(
                AttributePath::root("headers").key(name.as_str()),
                "header name must not be empty",
            ));
        }
    }
    Ok(())
}
