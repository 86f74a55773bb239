use std::sync::Arc;

use gantry_store::ResourceRegistry;
use mongodb::Database;

use crate::config::ServerConfig;

/// Shared application state, injected into every handler via
/// `axum::extract::State`.
///
/// Built once before serving and immutable afterwards; the store handle
/// inside the registry is the process's single connection and is never
/// reassigned.
pub struct AppState {
    pub config: ServerConfig,
    pub registry: ResourceRegistry,
}

impl AppState {
    pub fn new(config: ServerConfig, db: Database) -> Self {
        Self {
            config,
            registry: ResourceRegistry::new(db),
        }
    }
}

pub type SharedState = Arc<AppState>;
