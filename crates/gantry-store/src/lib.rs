//! MongoDB access layer for the gantry gateway.
//!
//! This crate owns everything that talks to the document store: parsing
//! store-native identifiers, resolving URL segments into live collection
//! handles, the generic CRUD adapter, and the streaming schema-inference
//! engine. The HTTP layer in `gantry-server` builds entirely on these
//! pieces and never touches the driver directly.
//!
//! # Key Types
//!
//! - [`DocumentId`] — validated wrapper over the store's 12-byte identifier
//! - [`ResourceRegistry`] — canonical resource names mapped to cached
//!   collection handles
//! - [`CollectionAdapter`] — list / get / insert / replace / delete / count
//!   against one collection, with cursor-streamed list results
//! - [`SchemaNode`] — field-shape accumulator produced by [`infer_schema`]
//!
//! # Design Rules
//!
//! 1. Identifiers are validated before any store round-trip; malformed
//!    input never reaches the driver.
//! 2. List results are streams, never buffered vectors. Dropping the
//!    stream releases the server-side cursor.
//! 3. Store failures propagate immediately. No retries, no suppression.

pub mod adapter;
pub mod error;
pub mod id;
pub mod resource;
pub mod schema;

// Re-export primary types at crate root for ergonomic imports.
pub use adapter::{connect, list_collections, CollectionAdapter};
pub use error::{StoreError, StoreResult};
pub use id::DocumentId;
pub use resource::{camel_case, parent_link_field, Resource, ResourceRegistry};
pub use schema::{infer_schema, SchemaNode};
