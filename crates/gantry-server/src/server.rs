use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ApiError, ApiResult};
use crate::router::build_router;
use crate::state::AppState;

/// The gantry gateway server.
pub struct GantryServer {
    config: ServerConfig,
}

impl GantryServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Connect the store and serve requests until the process exits.
    ///
    /// The store handle is established once here and shared read-only by
    /// every request handler through the injected state.
    pub async fn serve(self) -> ApiResult<()> {
        let db = gantry_store::connect(&self.config.mongo_url, &self.config.database).await?;
        let state = Arc::new(AppState::new(self.config.clone(), db));
        let app = build_router(state);
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("gantry listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(ApiError::Io)
    }
}
