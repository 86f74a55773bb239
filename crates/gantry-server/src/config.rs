use std::env;
use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// A configuration environment variable that failed to parse.
#[derive(Debug, thiserror::Error)]
#[error("invalid {var}: {detail}")]
pub struct ConfigError {
    pub var: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub mongo_url: String,
    pub database: String,
    /// Shared secret for the upstream webhook-signature collaborator.
    /// Held in configuration only; core request handling never reads it.
    pub hook_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".parse().unwrap(),
            mongo_url: "mongodb://127.0.0.1:27017".to_string(),
            database: "gantry".to_string(),
            hook_secret: None,
        }
    }
}

impl ServerConfig {
    /// Build a config from the environment: `GANTRY_PORT`,
    /// `GANTRY_MONGO_URL`, `GANTRY_DB`, `GANTRY_HOOK_SECRET`. Unset
    /// variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(port) = env::var("GANTRY_PORT") {
            let port: u16 = port.parse().map_err(|e| ConfigError {
                var: "GANTRY_PORT",
                detail: format!("{e}"),
            })?;
            config.bind_addr.set_port(port);
        }
        if let Ok(url) = env::var("GANTRY_MONGO_URL") {
            config.mongo_url = url;
        }
        if let Ok(db) = env::var("GANTRY_DB") {
            config.database = db;
        }
        config.hook_secret = env::var("GANTRY_HOOK_SECRET").ok();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.mongo_url, "mongodb://127.0.0.1:27017");
        assert_eq!(c.database, "gantry");
        assert!(c.hook_secret.is_none());
    }
}
