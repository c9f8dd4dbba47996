//! Webhook configuration, plan and state shapes, and translation to and
//! from the API's wire records

use super::event_type::EventType;
use super::schema;
use declarative::{Attributes, Error, Operation, Result, Value};
use longship_api::{Header, Webhook, WebhookRequest};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// User-declared webhook configuration
///
/// Null means "not set". Unknown means the value depends on something that
/// has not been applied yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookConfig {
    pub name: Value<String>,
    pub ou_code: Value<String>,
    pub enabled: Value<bool>,
    pub event_types: Value<Vec<String>>,
    pub url: Value<String>,
    pub headers: Value<BTreeMap<String, String>>,
}

/// Planned next state of a webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookPlan {
    pub id: Value<String>,
    pub name: Value<String>,
    pub ou_code: Value<String>,
    pub enabled: Value<bool>,
    pub event_types: Value<BTreeSet<EventType>>,
    pub url: Value<String>,
    pub headers: Value<BTreeMap<String, String>>,
    pub created: Value<String>,
    pub updated: Value<String>,
}

/// Persisted webhook state, fully concrete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookState {
    pub id: String,
    pub name: String,
    pub ou_code: String,
    pub enabled: bool,
    pub event_types: BTreeSet<EventType>,
    pub url: String,
    pub created: String,
    pub updated: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl WebhookPlan {
    /// Validate configuration and plan user attributes
    ///
    /// Defaults are filled for omitted optional attributes. Computed
    /// attributes start unknown.
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        schema::require("name", &config.name)?;
        schema::require("ou_code", &config.ou_code)?;
        schema::require("event_types", &config.event_types)?;
        schema::require("url", &config.url)?;

        let event_types = match &config.event_types {
            Value::Known(names) => Value::Known(schema::validate_event_types(names)?),
            _ => Value::Unknown,
        };
        if let Value::Known(headers) = &config.headers {
            schema::validate_headers(headers)?;
        }

        Ok(Self {
            id: Value::Unknown,
            name: config.name.clone(),
            ou_code: config.ou_code.clone(),
            enabled: config.enabled.clone().or_default_with(|| true),
            event_types,
            url: config.url.clone(),
            headers: config.headers.clone().or_default_with(BTreeMap::new),
            created: Value::Unknown,
            updated: Value::Unknown,
        })
    }

    /// Check if every user attribute equals the prior state's value
    pub fn matches_user_attributes(&self, state: &WebhookState) -> bool {
        self.name.as_known() == Some(&state.name)
            && self.ou_code.as_known() == Some(&state.ou_code)
            && self.enabled.as_known() == Some(&state.enabled)
            && self.event_types.as_known() == Some(&state.event_types)
            && self.url.as_known() == Some(&state.url)
            && self.headers.as_known() == Some(&state.headers)
    }

    /// Planned value of a computed attribute
    pub fn computed_mut(&mut self, name: &str) -> Option<&mut Value<String>> {
        match name {
            "id" => Some(&mut self.id),
            "created" => Some(&mut self.created),
            "updated" => Some(&mut self.updated),
            _ => None,
        }
    }

    /// Build the create/update payload
    ///
    /// Every user attribute must be known by apply time. Optional
    /// attributes that are still null fall back to their defaults.
    pub fn to_request(&self) -> Result<WebhookRequest> {
        Ok(WebhookRequest {
            name: known("name", &self.name)?.clone(),
            ou_code: known("ou_code", &self.ou_code)?.clone(),
            enabled: match &self.enabled {
                Value::Null => true,
                other => *known("enabled", other)?,
            },
            event_types: known("event_types", &self.event_types)?
                .iter()
                .map(|e| e.as_str().to_string())
                .collect(),
            headers: match &self.headers {
                Value::Null => Vec::new(),
                other => known("headers", other)?
                    .iter()
                    .map(|(name, value)| Header::new(name, value))
                    .collect(),
            },
            url: known("url", &self.url)?.clone(),
        })
    }
}

fn known<'a, T>(name: &str, value: &'a Value<T>) -> Result<&'a T> {
    value
        .as_known()
        .ok_or_else(|| Error::invariant(format!("{name} is not known at apply time")))
}

impl WebhookState {
    /// Computed attribute value recorded in state
    pub fn computed(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "created" => Some(&self.created),
            "updated" => Some(&self.updated),
            _ => None,
        }
    }

    /// Build state from a server record
    ///
    /// Every mutable attribute is taken from the record. The identity and
    /// created timestamp come from the record when present, otherwise from
    /// the fallbacks.
    pub fn from_remote(
        operation: Operation,
        remote: Webhook,
        fallback_id: &str,
        fallback_created: &str,
    ) -> Result<Self> {
        let mut event_types = BTreeSet::new();
        for name in &remote.event_types {
            let event = name.parse::<EventType>().map_err(|e| {
                Error::transport(operation, format!("invalid response: {e}"), None)
            })?;
            event_types.insert(event);
        }

        Ok(Self {
            id: prefer_remote(remote.id, fallback_id),
            name: remote.name,
            ou_code: remote.ou_code,
            enabled: remote.enabled,
            event_types,
            url: remote.url,
            headers: headers_to_map(remote.headers),
            created: prefer_remote(remote.created, fallback_created),
            updated: remote.updated,
        })
    }
}

fn prefer_remote(remote: String, fallback: &str) -> String {
    if remote.is_empty() {
        fallback.to_string()
    } else {
        remote
    }
}

/// Convert a wire header list into a map; later duplicates win
pub fn headers_to_map(headers: Vec<Header>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for header in headers {
        if map.insert(header.name.clone(), header.value).is_some() {
            log::warn!(
                "Server returned header {} more than once, keeping the last value",
                header.name
            );
        }
    }
    map
}

fn render_events(events: &BTreeSet<EventType>) -> String {
    let names: Vec<_> = events.iter().map(|e| format!("\"{e}\"")).collect();
    format!("[{}]", names.join(", "))
}

fn render_headers(headers: &BTreeMap<String, String>) -> String {
    let pairs: Vec<_> = headers
        .iter()
        .map(|(k, v)| format!("{k:?} = {v:?}"))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

fn quoted(value: &Value<String>) -> Value<String> {
    value.clone().map(|s| format!("{s:?}"))
}

impl Attributes for WebhookPlan {
    fn attributes(&self) -> Vec<(&'static str, Value<String>)> {
        vec![
            ("id", quoted(&self.id)),
            ("name", quoted(&self.name)),
            ("ou_code", quoted(&self.ou_code)),
            ("enabled", self.enabled.clone().map(|b| b.to_string())),
            ("event_types", self.event_types.as_ref().map(render_events)),
            ("url", quoted(&self.url)),
            ("headers", self.headers.as_ref().map(render_headers)),
            ("created", quoted(&self.created)),
            ("updated", quoted(&self.updated)),
        ]
    }
}

impl Attributes for WebhookState {
    fn attributes(&self) -> Vec<(&'static str, Value<String>)> {
        let text = |s: &str| Value::Known(format!("{s:?}"));
        vec![
            ("id", text(&self.id)),
            ("name", text(&self.name)),
            ("ou_code", text(&self.ou_code)),
            ("enabled", Value::Known(self.enabled.to_string())),
            ("event_types", Value::Known(render_events(&self.event_types))),
            ("url", text(&self.url)),
            ("headers", Value::Known(render_headers(&self.headers))),
            ("created", text(&self.created)),
            ("updated", text(&self.updated)),
        ]
    }
}
