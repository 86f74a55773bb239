//! HTTP gateway for the gantry system.
//!
//! Exposes the collections of a MongoDB database as generic RESTful
//! resources — no compile-time schema, any URL segment routes to the
//! correspondingly named collection — plus a webhook ingestion endpoint
//! that turns repository push notifications into queued build jobs.
//!
//! List responses are streamed straight from the store cursor; the
//! gateway never buffers a whole collection in memory.

pub mod config;
pub mod error;
pub mod handler;
pub mod hook;
pub mod router;
pub mod server;
pub mod state;
pub mod stream;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use hook::{BuildJob, Disposition, BUILD_QUEUE_COLLECTION, HOOK_RECORD_COLLECTION};
pub use server::GantryServer;
pub use state::{AppState, SharedState};
