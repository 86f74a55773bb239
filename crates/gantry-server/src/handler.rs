use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Json, Response};
use bson::{doc, Bson, Document};
use serde_json::{json, Value};

use gantry_store::{
    infer_schema, list_collections, parent_link_field, CollectionAdapter, DocumentId, StoreError,
};

use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;
use crate::stream::stream_list;

/// Liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET `/_collection` — user-visible collection names.
pub async fn collections(State(state): State<SharedState>) -> ApiResult<Json<Vec<String>>> {
    let names = list_collections(state.registry.database()).await?;
    Ok(Json(names))
}

/// GET `/_collection/:resource` — document count plus inferred schema.
///
/// The schema is recomputed per request by streaming the collection
/// through the inference fold; nothing is persisted.
pub async fn describe(
    State(state): State<SharedState>,
    Path(resource): Path<String>,
) -> ApiResult<Json<Value>> {
    let resource = state.registry.resolve(&resource);
    let adapter = CollectionAdapter::new(resource.collection);
    let count = adapter.count(doc! {}).await?;
    let cursor = adapter.list(doc! {}).await?;
    let schema = infer_schema(cursor).await.map_err(StoreError::from)?;
    Ok(Json(json!({ "count": count, "schema": schema })))
}

/// GET `/:resource` — stream all documents, query string taken verbatim
/// as an equality filter.
pub async fn list_documents(
    State(state): State<SharedState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let resource = state.registry.resolve(&resource);
    let adapter = CollectionAdapter::new(resource.collection);
    let filter = filter_from_query(&params);
    let count = adapter.count(filter.clone()).await?;
    let cursor = adapter.list(filter).await?;
    Ok(stream_list(count, cursor))
}

/// POST `/:resource` — create a document.
pub async fn create_document(
    State(state): State<SharedState>,
    Path(resource): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<Json<Value>> {
    let body = require_body(body)?;
    let resource = state.registry.resolve(&resource);
    let adapter = CollectionAdapter::new(resource.collection);
    let inserted = adapter.insert(body, None).await?;
    Ok(Json(Bson::Document(inserted).into_relaxed_extjson()))
}

/// GET `/:resource/:id` — fetch one document.
pub async fn get_document(
    State(state): State<SharedState>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let id = DocumentId::parse(&id)?;
    let resource = state.registry.resolve(&resource);
    let adapter = CollectionAdapter::new(resource.collection);
    let document = adapter.get(id).await?;
    Ok(Json(Bson::Document(document).into_relaxed_extjson()))
}

/// PUT `/:resource/:id` — full replace. Any client-supplied `_id` is
/// discarded; the path identifier wins.
pub async fn replace_document(
    State(state): State<SharedState>,
    Path((resource, id)): Path<(String, String)>,
    body: Option<Json<Value>>,
) -> ApiResult<StatusCode> {
    let id = DocumentId::parse(&id)?;
    let body = require_body(body)?;
    let resource = state.registry.resolve(&resource);
    let adapter = CollectionAdapter::new(resource.collection);
    adapter.replace(id, body).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE `/:resource/:id` — remove one document.
pub async fn delete_document(
    State(state): State<SharedState>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let id = DocumentId::parse(&id)?;
    let resource = state.registry.resolve(&resource);
    let adapter = CollectionAdapter::new(resource.collection);
    adapter.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/:resource/:id/:child` — stream child documents linked to the
/// parent through the `<camelCase(parent)>Id` field.
pub async fn list_children(
    State(state): State<SharedState>,
    Path((parent, id, child)): Path<(String, String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> ApiResult<Response> {
    let parent_id = DocumentId::parse(&id)?;
    let link = parent_link_field(&parent);
    let resource = state.registry.resolve(&child);
    let adapter = CollectionAdapter::new(resource.collection);
    let mut filter = filter_from_query(&params);
    filter.insert(link, parent_id.as_oid());
    let count = adapter.count(filter.clone()).await?;
    let cursor = adapter.list(filter).await?;
    Ok(stream_list(count, cursor))
}

/// POST `/:resource/:id/:child` — create a child document under a parent.
pub async fn create_child(
    State(state): State<SharedState>,
    Path((parent, id, child)): Path<(String, String, String)>,
    body: Option<Json<Value>>,
) -> ApiResult<Json<Value>> {
    let parent_id = DocumentId::parse(&id)?;
    let body = require_body(body)?;
    let link = parent_link_field(&parent);
    let resource = state.registry.resolve(&child);
    let adapter = CollectionAdapter::new(resource.collection);
    let inserted = adapter.insert(body, Some((&link, parent_id))).await?;
    Ok(Json(Bson::Document(inserted).into_relaxed_extjson()))
}

/// Query parameters become a field-equality filter, values verbatim.
fn filter_from_query(params: &HashMap<String, String>) -> Document {
    let mut filter = Document::new();
    for (key, value) in params {
        filter.insert(key.clone(), value.clone());
    }
    filter
}

/// A write request must carry a JSON object body.
fn require_body(body: Option<Json<Value>>) -> ApiResult<Document> {
    let Some(Json(value)) = body else {
        return Err(ApiError::Validation("missing request body".to_string()));
    };
    match value {
        Value::Object(map) => {
            bson::to_document(&map).map_err(|e| ApiError::Validation(e.to_string()))
        }
        _ => Err(ApiError::Validation(
            "request body must be a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_params_become_equality_filter() {
        let params = HashMap::from([("name".to_string(), "foo".to_string())]);
        let filter = filter_from_query(&params);
        assert_eq!(filter.get_str("name").unwrap(), "foo");
    }

    #[test]
    fn missing_body_is_validation_error() {
        assert!(matches!(
            require_body(None),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn non_object_body_is_validation_error() {
        assert!(matches!(
            require_body(Some(Json(json!([1, 2])))),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn object_body_converts() {
        let doc = require_body(Some(Json(json!({ "name": "foo" })))).unwrap();
        assert_eq!(doc.get_str("name").unwrap(), "foo");
    }
}
