//! Process-wide credential selection.
//!
//! The provider key is selected by the caller (the original front-end's
//! key-selection modal), held here for the lifetime of the process, and
//! cleared again when the provider rejects it so the caller re-prompts.
//! The engine never reads this store directly; the key is handed to it
//! explicitly per run.

use tokio::sync::RwLock;
use tracing::info;

use reel_veo::ApiKey;

/// Holds the currently selected provider credential, if any.
#[derive(Debug, Default)]
pub struct CredentialStore {
    inner: RwLock<Option<ApiKey>>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from the `VEO_API_KEY` environment variable.
    pub fn from_env() -> Self {
        let seeded = std::env::var("VEO_API_KEY")
            .ok()
            .map(ApiKey::new)
            .filter(|key| !key.is_empty());

        if seeded.is_some() {
            info!("Seeded provider credential from environment");
        }

        Self {
            inner: RwLock::new(seeded),
        }
    }

    /// Whether a credential is currently selected.
    pub async fn is_selected(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// The currently selected credential, if any.
    pub async fn current(&self) -> Option<ApiKey> {
        self.inner.read().await.clone()
    }

    /// Select a credential. Empty keys are rejected by the caller before
    /// reaching here; selecting replaces any previous key.
    pub async fn select(&self, key: ApiKey) {
        *self.inner.write().await = Some(key);
    }

    /// Clear the selected credential (explicit deselection, or
    /// invalidation after the provider rejected it).
    pub async fn clear(&self) {
        *self.inner.write().await = None;
    }
}
