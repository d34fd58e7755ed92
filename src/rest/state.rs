//! Shared state for the REST server.

use std::sync::Arc;

use crate::config::Config;
use crate::directory::DirectoryStore;
use crate::schema::StepRegistry;
use crate::telemetry::TelemetrySink;
use crate::wizard::{SessionStore, Wizard};

/// Shared state for the REST API
#[derive(Clone)]
pub struct ApiState {
    /// The onboarding state machine
    pub wizard: Arc<Wizard>,
    /// Per-browsing-session wizard data
    pub sessions: SessionStore,
    /// Listing store (thread-safe read-write access)
    pub directory: Arc<DirectoryStore>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl ApiState {
    /// Create API state around an already-loaded directory store.
    pub fn new(
        config: Config,
        directory: DirectoryStore,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        let registry = Arc::new(StepRegistry::builtin());
        Self {
            wizard: Arc::new(Wizard::new(registry, telemetry)),
            sessions: SessionStore::new(),
            directory: Arc::new(directory),
            config: Arc::new(config),
        }
    }
}
