//! Configuration file: provider credentials and desired webhooks

use anyhow::{Context, Result, bail};
use declarative::Value;
use longship_api::Credentials;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::resource::webhook::WebhookConfig;

/// Default config file path (~/.config/longship/longship.toml)
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("longship").join("longship.toml"))
}

/// Resolve a user-supplied path, expanding `~`
pub fn resolve_path(path: Option<&str>, default: fn() -> Result<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(PathBuf::from(shellexpand::tilde(p).as_ref())),
        None => default(),
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LongshipConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Desired webhooks keyed by address
    #[serde(default)]
    pub webhooks: BTreeMap<String, WebhookBlock>,
}

/// `[provider]` table; each value falls back to its environment variable
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    pub host: Option<String>,
    pub tenant_key: Option<String>,
    pub application_key: Option<String>,
}

/// `[webhooks.<address>]` table
///
/// Every field is optional here so that missing attributes are reported by
/// the resource with their attribute name instead of as a TOML error.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookBlock {
    pub name: Option<String>,
    pub ou_code: Option<String>,
    pub enabled: Option<bool>,
    pub event_types: Option<Vec<String>>,
    pub url: Option<String>,
    pub headers: Option<BTreeMap<String, String>>,
}

impl From<&WebhookBlock> for WebhookConfig {
    fn from(block: &WebhookBlock) -> Self {
        Self {
            name: Value::from(block.name.clone()),
            ou_code: Value::from(block.ou_code.clone()),
            enabled: Value::from(block.enabled),
            event_types: Value::from(block.event_types.clone()),
            url: Value::from(block.url.clone()),
            headers: Value::from(block.headers.clone()),
        }
    }
}

impl LongshipConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config format: {}", path.display()))?;
        config.validate()?;
        log::debug!(
            "Loaded {} webhook(s) from {}",
            config.webhooks.len(),
            path.display()
        );
        Ok(config)
    }

    /// Load a config file, or an empty config if it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("Config file {} does not exist", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    fn validate(&self) -> Result<()> {
        for address in self.webhooks.keys() {
            validate_address(address)?;
        }
        Ok(())
    }

    /// Resolve provider credentials against the process environment
    pub fn credentials(&self) -> Result<Credentials> {
        self.credentials_with(|name| std::env::var(name).ok())
    }

    fn credentials_with(&self, env: impl Fn(&str) -> Option<String>) -> Result<Credentials> {
        let credentials = Credentials::resolve(
            self.provider.host.as_deref(),
            self.provider.tenant_key.as_deref(),
            self.provider.application_key.as_deref(),
            env,
        )?;
        Ok(credentials)
    }

    /// Desired webhook configuration keyed by address
    pub fn desired(&self) -> BTreeMap<String, WebhookConfig> {
        self.webhooks
            .iter()
            .map(|(address, block)| (address.clone(), WebhookConfig::from(block)))
            .collect()
    }
}

/// Check that an address can be used as `webhook.<address>`
pub fn validate_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        bail!("Webhook address must not be empty");
    }
    if address.contains('.') || address.chars().any(char::is_whitespace) {
        bail!("Invalid webhook address '{address}': must not contain '.' or whitespace");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[provider]
host = "https://api.example.com"
tenant_key = "tenant"

[webhooks.sessions]
name = "sessions"
ou_code = "0000"
enabled = false
event_types = ["SESSION_START", "SESSION_STOP"]
url = "https://example.com/hook"

[webhooks.sessions.headers]
x-token = "abc"

[webhooks.cdrs]
name = "cdrs"
ou_code = "0001"
event_types = ["CDR_CREATED"]
url = "https://example.com/cdr"
"#;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_sample() {
        let file = write_config(SAMPLE);
        let config = LongshipConfig::load(file.path()).unwrap();

        assert_eq!(config.webhooks.len(), 2);
        let sessions = &config.webhooks["sessions"];
        assert_eq!(sessions.enabled, Some(false));
        assert_eq!(sessions.headers.as_ref().unwrap()["x-token"], "abc");
        assert!(config.webhooks["cdrs"].headers.is_none());
    }

    #[test]
    fn test_desired_maps_missing_to_null() {
        let file = write_config(SAMPLE);
        let config = LongshipConfig::load(file.path()).unwrap();
        let desired = config.desired();

        let cdrs = &desired["cdrs"];
        assert!(cdrs.enabled.is_null());
        assert!(cdrs.headers.is_null());
        assert_eq!(cdrs.name, Value::Known("cdrs".to_string()));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let file = write_config("[webhooks.a]\nnmae = \"typo\"\n");
        let err = LongshipConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("nmae"));
    }

    #[test]
    fn test_invalid_address_rejected() {
        let file = write_config("[webhooks.\"a.b\"]\nname = \"x\"\n");
        assert!(LongshipConfig::load(file.path()).is_err());
        assert!(validate_address("").is_err());
        assert!(validate_address("with space").is_err());
        assert!(validate_address("sessions").is_ok());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LongshipConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert!(config.webhooks.is_empty());
    }

    #[test]
    fn test_credentials_prefer_config_then_env() {
        let file = write_config(SAMPLE);
        let config = LongshipConfig::load(file.path()).unwrap();

        let credentials = config
            .credentials_with(|name| match name {
                longship_api::TENANT_KEY_ENV => Some("from-env".to_string()),
                longship_api::APPLICATION_KEY_ENV => Some("app".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(credentials.host, "https://api.example.com");
        assert_eq!(credentials.tenant_key, "tenant");
        assert_eq!(credentials.application_key, "app");
    }

    #[test]
    fn test_credentials_missing_reports_attribute() {
        let config = LongshipConfig::default();
        let err = config.credentials_with(|_| None).unwrap_err();
        assert!(err.to_string().contains("host"));
    }

    #[test]
    fn test_resolve_path_expands_tilde() {
        let path = resolve_path(Some("~/longship.toml"), default_path).unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert_eq!(resolve_path(Some("/tmp/x.toml"), default_path).unwrap(), PathBuf::from("/tmp/x.toml"));
    }
}
