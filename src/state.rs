use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use declarative::Commit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::resource::webhook::WebhookState;

// ============================================================================
// State Structures
// ============================================================================

/// Persisted state for every managed webhook
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LongshipState {
    /// Incremented on every committed change
    #[serde(default)]
    pub serial: u64,

    /// Last time the state was updated
    pub last_updated: DateTime<Utc>,

    /// Webhook state keyed by address
    #[serde(default)]
    pub webhooks: BTreeMap<String, WebhookState>,
}

impl Default for LongshipState {
    fn default() -> Self {
        Self {
            serial: 0,
            last_updated: Utc::now(),
            webhooks: BTreeMap::new(),
        }
    }
}

/// Default state file path (~/.local/state/longship/state.toml)
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".local")
        .join("state")
        .join("longship")
        .join("state.toml"))
}

// ============================================================================
// LongshipState Implementation
// ============================================================================

impl LongshipState {
    /// Load state from disk, or return default if file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file does not exist, using default state");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!("Loaded state serial {} from {}", state.serial, path.display());
        Ok(state)
    }

    /// Save state to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state serial {} to {}", self.serial, path.display());
        Ok(())
    }

    /// Apply one committed cycle
    pub fn commit(&mut self, address: &str, commit: Commit<WebhookState>) {
        match commit {
            Commit::Put(state) => {
                self.webhooks.insert(address.to_string(), state);
            }
            Commit::Remove => {
                self.webhooks.remove(address);
            }
        }
        self.touch();
    }

    /// Drop an address without touching the remote record
    pub fn forget(&mut self, address: &str) -> Option<WebhookState> {
        let removed = self.webhooks.remove(address);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.serial += 1;
        self.last_updated = Utc::now();
    }
}

/// State bound to its file; every commit is written through
pub struct StateFile {
    path: PathBuf,
    pub state: LongshipState,
}

impl StateFile {
    /// Open the state file at a path
    pub fn open(path: PathBuf) -> Result<Self> {
        let state = LongshipState::load(&path)?;
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit one cycle and save
    pub fn commit(&mut self, address: &str, commit: Commit<WebhookState>) -> Result<()> {
        self.state.commit(address, commit);
        self.state.save(&self.path)
    }

    /// Forget an address and save
    pub fn forget(&mut self, address: &str) -> Result<Option<WebhookState>> {
        let removed = self.state.forget(address);
        if removed.is_some() {
            self.state.save(&self.path)?;
        }
        Ok(removed)
    }
}

// ============================================================================
// Tests
// ============================================================================
