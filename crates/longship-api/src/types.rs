//! Wire types for the Longship API.
//!
//! Field names follow the API's JSON. Most records are camelCase; the
//! organizational unit record mixes in snake_case fields, which are renamed
//! one by one.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Environment variable holding the API base URL.
pub const HOST_ENV: &str = "LONGSHIP_HOST";
/// Environment variable holding the tenant key.
pub const TENANT_KEY_ENV: &str = "LONGSHIP_TENANT_KEY";
/// Environment variable holding the application key.
pub const APPLICATION_KEY_ENV: &str = "LONGSHIP_APPLICATION_KEY";

/// A single HTTP header the platform sends with webhook deliveries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Create a header.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A webhook as returned by the API.
///
/// Listings omit headers, and some responses omit the identity or the
/// created timestamp; missing fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Server-assigned identity.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Organizational unit code the webhook is scoped to.
    #[serde(default)]
    pub ou_code: String,
    /// Whether deliveries are active.
    #[serde(default)]
    pub enabled: bool,
    /// Subscribed event types.
    #[serde(default)]
    pub event_types: Vec<String>,
    /// Delivery URL.
    #[serde(default)]
    pub url: String,
    /// Extra delivery headers.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Creation timestamp.
    #[serde(default)]
    pub created: String,
    /// Last modification timestamp.
    #[serde(default)]
    pub updated: String,
}

/// Payload for creating or replacing a webhook.
///
/// Updates are full replacements, so every field is always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookRequest {
    /// Display name.
    pub name: String,
    /// Organizational unit code.
    pub ou_code: String,
    /// Whether deliveries are active.
    pub enabled: bool,
    /// Subscribed event types.
    pub event_types: Vec<String>,
    /// Extra delivery headers.
    pub headers: Vec<Header>,
    /// Delivery URL.
    pub url: String,
}

/// A charge point registered with the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Chargepoint {
    pub id: String,
    #[serde(rename = "chargePointId")]
    pub chargepoint_id: String,
    pub date_deleted: String,
    pub display_name: String,
    pub roaming_name: String,
    pub charge_box_serial_number: String,
    #[serde(rename = "chargePointVendor")]
    pub chargepoint_vendor: String,
    pub evses: Vec<Evse>,
}

/// An EVSE (charging station unit) on a charge point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Evse {
    pub evse_id: String,
    pub connectors: Vec<Connector>,
}

/// A physical connector on an EVSE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Connector {
    pub id: String,
    pub operational_status: String,
    pub standard: String,
    pub format: String,
    pub power_type: String,
    pub max_voltage: i64,
    pub max_amperage: i64,
    pub max_electrical_power: i64,
}

/// An organizational unit (tenant hierarchy node).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationalUnit {
    pub id: String,
    #[serde(rename = "parentId")]
    pub parent_id: String,
    pub name: String,
    pub code: String,
    pub external_reference: String,
    pub grid_owner_reference: String,
    pub tenant_reference: String,
    pub customer_reference: String,
    pub address: String,
    pub state: String,
    pub country: String,
    pub city: String,
    pub house_number: String,
    pub postal_code: String,
    pub hotline_phone_number: String,
    pub company_email: String,
    pub primary_contact_person: String,
    pub primary_contact_person_email: String,
    pub direct_payment_profile_id: String,
    pub msp_ou_id: String,
    pub msp_ou_name: String,
    pub msp_ou_code: String,
    pub msp_external_id: String,
    #[serde(rename = "financialDetails")]
    pub financial_details: FinancialDetails,
}

/// Bank details attached to an organizational unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialDetails {
    pub beneficiary_name: String,
    pub iban: String,
    pub bic: String,
}

/// Host and keys used to reach the API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL, e.g. `https://api.longship.io`.
    pub host: String,
    /// Sent as `Ocp-Apim-Subscription-Key`.
    pub tenant_key: String,
    /// Sent as `x-api-key`.
    pub application_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("tenant_key", &"<redacted>")
            .field("application_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve every credential from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, None, None, |name| std::env::var(name).ok())
    }

    /// Resolve credentials, preferring explicit values over the environment.
    ///
    /// Empty strings count as unset. The first missing attribute is reported.
    pub fn resolve<F>(
        host: Option<&str>,
        tenant_key: Option<&str>,
        application_key: Option<&str>,
        env: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |value: Option<&str>, attribute: &'static str, env_var: &'static str| {
            value
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .or_else(|| env(env_var).filter(|v| !v.is_empty()))
                .ok_or(Error::MissingCredential { attribute, env_var })
        };

        Ok(Self {
            host: pick(host, "host", HOST_ENV)?
                .trim_end_matches('/')
                .to_string(),
            tenant_key: pick(tenant_key, "tenant_key", TENANT_KEY_ENV)?,
            application_key: pick(application_key, "application_key", APPLICATION_KEY_ENV)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_webhook_decodes_listing_without_headers() {
        let json = r#"{
            "id": "abc",
            "name": "test",
            "ouCode": "0000",
            "enabled": true,
            "eventTypes": ["SESSION_START"],
            "url": "https://example.com",
            "created": "2024-01-01T00:00:00Z",
            "updated": "2024-01-02T00:00:00Z"
        }"#;

        let webhook: Webhook = serde_json::from_str(json).unwrap();
        assert_eq!(webhook.id, "abc");
        assert_eq!(webhook.ou_code, "0000");
        assert!(webhook.headers.is_empty());
    }

    #[test]
    fn test_webhook_decodes_missing_identity() {
        let webhook: Webhook = serde_json::from_str(r#"{"name":"test"}"#).unwrap();
        assert!(webhook.id.is_empty());
        assert!(webhook.created.is_empty());
    }

    #[test]
    fn test_request_encodes_camel_case() {
        let request = WebhookRequest {
            name: "test".into(),
            ou_code: "0000".into(),
            enabled: false,
            event_types: vec!["SESSION_START".into()],
            headers: vec![Header::new("hello", "world")],
            url: "https://example.com".into(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["ouCode"], "0000");
        assert_eq!(json["eventTypes"][0], "SESSION_START");
        assert_eq!(json["headers"][0]["name"], "hello");
        assert_eq!(json["enabled"], false);
    }

    #[test]
    fn test_chargepoint_field_names() {
        let json = r#"{
            "id": "cp-1",
            "chargePointId": "NL*LSP*1",
            "chargePointVendor": "Alfen",
            "evses": [{"evse_id": "NL*LSP*E1", "connectors": [{"id": "1", "maxVoltage": 230}]}]
        }"#;

        let cp: Chargepoint = serde_json::from_str(json).unwrap();
        assert_eq!(cp.chargepoint_id, "NL*LSP*1");
        assert_eq!(cp.chargepoint_vendor, "Alfen");
        assert_eq!(cp.evses[0].evse_id, "NL*LSP*E1");
        assert_eq!(cp.evses[0].connectors[0].max_voltage, 230);
    }

    #[test]
    fn test_organizational_unit_mixed_case_fields() {
        let json = r#"{
            "id": "ou-1",
            "parentId": "root",
            "code": "0000",
            "external_reference": "ext",
            "financialDetails": {"beneficiaryName": "ACME", "iban": "NL00", "bic": "ABNA"}
        }"#;

        let ou: OrganizationalUnit = serde_json::from_str(json).unwrap();
        assert_eq!(ou.parent_id, "root");
        assert_eq!(ou.external_reference, "ext");
        assert_eq!(ou.financial_details.beneficiary_name, "ACME");
    }

    #[test]
    fn test_credentials_prefer_explicit_values() {
        let env = |name: &str| Some(format!("env-{name}"));
        let creds = Credentials::resolve(Some("https://api/"), None, Some("app"), env).unwrap();

        assert_eq!(creds.host, "https://api");
        assert_eq!(creds.tenant_key, "env-LONGSHIP_TENANT_KEY");
        assert_eq!(creds.application_key, "app");
    }

    #[test]
    fn test_credentials_empty_counts_as_missing() {
        let err = Credentials::resolve(Some("https://api"), Some(""), Some("app"), no_env).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingCredential {
                attribute: "tenant_key",
                ..
            }
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_keys() {
        let creds = Credentials::resolve(Some("h"), Some("secret-t"), Some("secret-a"), no_env).unwrap();
        let debug = format!("{creds:?}");
        assert!(!debug.contains("secret"));
    }
}
