use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::hook;
use crate::state::SharedState;

/// Build the axum router with all gateway endpoints.
///
/// Reserved paths (`/_health`, `/_collection`, `/_hook`) are static
/// routes, so they win over the dynamic `/:resource` captures. Dynamic
/// segments reuse the `resource` name at each depth: for nested routes,
/// the first segment is the parent resource.
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/_health", get(handler::health))
        .route("/_collection", get(handler::collections))
        .route("/_collection/:resource", get(handler::describe))
        .route("/_hook", post(hook::ingest_root))
        .route("/_hook/:endpoint", post(hook::ingest_endpoint))
        .route(
            "/:resource",
            get(handler::list_documents).post(handler::create_document),
        )
        .route(
            "/:resource/:id",
            get(handler::get_document)
                .put(handler::replace_document)
                .delete(handler::delete_document),
        )
        .route(
            "/:resource/:id/:child",
            get(handler::list_children).post(handler::create_child),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
