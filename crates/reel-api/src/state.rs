//! Application state.

use std::sync::Arc;

use reel_engine::{DiskStore, EngineConfig, Orchestrator};
use reel_veo::VeoClient;

use crate::config::ApiConfig;
use crate::credentials::CredentialStore;
use crate::registry::JobRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub engine: Arc<Orchestrator<DiskStore>>,
    pub jobs: Arc<JobRegistry>,
    pub credentials: Arc<CredentialStore>,
}

impl AppState {
    /// Create new application state from environment configuration.
    pub fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let engine_config = EngineConfig::from_env();
        let veo = VeoClient::from_env()?;
        let store = DiskStore::new(&engine_config.work_dir);
        let engine = Orchestrator::new(veo, store, engine_config);

        Ok(Self {
            config,
            engine: Arc::new(engine),
            jobs: Arc::new(JobRegistry::new()),
            credentials: Arc::new(CredentialStore::from_env()),
        })
    }

    /// Build state around an existing orchestrator (tests point it at a
    /// mock provider).
    pub fn with_engine(config: ApiConfig, engine: Orchestrator<DiskStore>) -> Self {
        Self {
            config,
            engine: Arc::new(engine),
            jobs: Arc::new(JobRegistry::new()),
            credentials: Arc::new(CredentialStore::new()),
        }
    }
}
