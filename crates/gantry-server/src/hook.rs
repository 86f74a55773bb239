//! Webhook ingestion and build-queue production.
//!
//! Every inbound payload is recorded verbatim in the `_hooks` bookkeeping
//! collection before anything else happens; a failure there is terminal.
//! A build job is then derived only for push events targeting
//! `refs/heads/master`. The two writes are independent and non-atomic: a
//! queue insert failing after the record succeeded leaves a recorded hook
//! with no job, which is accepted, observable behavior.
//!
//! Signature verification happens upstream; this module trusts its input.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use gantry_store::CollectionAdapter;

use crate::error::{ApiError, ApiResult};
use crate::state::SharedState;

/// Bookkeeping collection for raw webhook payloads. The leading
/// underscore keeps it out of collection introspection.
pub const HOOK_RECORD_COLLECTION: &str = "_hooks";

/// Pending build jobs, consumed by the external build worker.
pub const BUILD_QUEUE_COLLECTION: &str = "builds";

/// Only pushes to this ref qualify for a build.
const BUILD_REF: &str = "refs/heads/master";

/// A queued build. `buildAt`, `nrOfAttempts`, `isSuccessful`, and
/// `message` are mutated exclusively by the external worker; this system
/// only ever creates jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildJob {
    pub full_name: String,
    pub name: String,
    pub repo: String,
    pub commit: Option<String>,
    pub endpoint: String,
    pub created_at: bson::DateTime,
    pub build_at: Option<bson::DateTime>,
    pub nr_of_attempts: i32,
    pub is_successful: Option<bool>,
    pub message: Option<String>,
    pub pusher: Option<Value>,
}

impl BuildJob {
    fn from_payload(payload: &Value, endpoint: &str) -> Self {
        let repository = payload.get("repository");
        let text = |value: Option<&Value>, key: &str| {
            value
                .and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            full_name: text(repository, "full_name"),
            name: text(repository, "name"),
            repo: text(repository, "clone_url"),
            commit: payload
                .get("head_commit")
                .and_then(|c| c.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string),
            endpoint: endpoint.to_string(),
            created_at: bson::DateTime::from_chrono(Utc::now()),
            build_at: None,
            nr_of_attempts: 0,
            is_successful: None,
            message: None,
            pusher: payload.get("pusher").cloned(),
        }
    }
}

/// Outcome of inspecting a recorded payload.
#[derive(Debug)]
pub enum Disposition {
    /// Recorded only; no build job. Responds 204.
    Skip(&'static str),
    /// A job to enqueue. Responds 201 once inserted.
    Build(BuildJob),
}

/// Decide whether a payload qualifies for a build. Pure; runs after the
/// payload has already been recorded.
pub fn classify(payload: &Value, endpoint: &str) -> Disposition {
    let Some(git_ref) = payload.get("ref").and_then(Value::as_str) else {
        return Disposition::Skip("no ref field, not a push event");
    };
    if git_ref != BUILD_REF {
        return Disposition::Skip("ref does not target master");
    }
    Disposition::Build(BuildJob::from_payload(payload, endpoint))
}

/// POST `/_hook` — ingestion without an endpoint segment.
pub async fn ingest_root(
    State(state): State<SharedState>,
    body: Option<Json<Value>>,
) -> ApiResult<StatusCode> {
    ingest(state, String::new(), body).await
}

/// POST `/_hook/:endpoint`.
pub async fn ingest_endpoint(
    State(state): State<SharedState>,
    Path(endpoint): Path<String>,
    body: Option<Json<Value>>,
) -> ApiResult<StatusCode> {
    ingest(state, endpoint, body).await
}

async fn ingest(
    state: SharedState,
    endpoint: String,
    body: Option<Json<Value>>,
) -> ApiResult<StatusCode> {
    let Some(Json(payload)) = body else {
        return Err(ApiError::Validation("missing request body".to_string()));
    };
    if !payload.is_object() {
        return Err(ApiError::Validation(
            "webhook payload must be a JSON object".to_string(),
        ));
    }
    let raw = bson::to_document(&payload).map_err(|e| ApiError::Validation(e.to_string()))?;

    let db = state.registry.database();
    let records = CollectionAdapter::new(db.collection(HOOK_RECORD_COLLECTION));
    records.insert_raw(raw).await?;

    match classify(&payload, &endpoint) {
        Disposition::Skip(reason) => {
            tracing::debug!(reason, "webhook recorded, no build queued");
            Ok(StatusCode::NO_CONTENT)
        }
        Disposition::Build(job) => {
            let entry = bson::to_document(&job).map_err(|e| ApiError::Store(e.to_string()))?;
            let queue = CollectionAdapter::new(db.collection(BUILD_QUEUE_COLLECTION));
            queue.insert_raw(entry).await?;
            tracing::info!(repo = %job.full_name, commit = ?job.commit, "build queued");
            Ok(StatusCode::CREATED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn push_payload(git_ref: &str) -> Value {
        json!({
            "ref": git_ref,
            "repository": {
                "full_name": "acme/widgets",
                "name": "widgets",
                "clone_url": "https://example.com/acme/widgets.git",
            },
            "head_commit": { "id": "deadbeef" },
            "pusher": { "name": "alice" },
        })
    }

    #[test]
    fn payload_without_ref_is_skipped() {
        let payload = json!({ "zen": "Keep it logically awesome." });
        assert!(matches!(classify(&payload, ""), Disposition::Skip(_)));
    }

    #[test]
    fn non_master_ref_is_skipped() {
        let payload = push_payload("refs/heads/develop");
        assert!(matches!(classify(&payload, ""), Disposition::Skip(_)));
    }

    #[test]
    fn master_push_builds_a_job() {
        let payload = push_payload("refs/heads/master");
        let Disposition::Build(job) = classify(&payload, "ci") else {
            panic!("expected a build job");
        };
        assert_eq!(job.full_name, "acme/widgets");
        assert_eq!(job.name, "widgets");
        assert_eq!(job.repo, "https://example.com/acme/widgets.git");
        assert_eq!(job.commit.as_deref(), Some("deadbeef"));
        assert_eq!(job.endpoint, "ci");
        assert!(job.build_at.is_none());
        assert_eq!(job.nr_of_attempts, 0);
        assert!(job.is_successful.is_none());
        assert!(job.message.is_none());
        assert_eq!(job.pusher, Some(json!({ "name": "alice" })));
    }

    #[test]
    fn missing_head_commit_leaves_commit_unset() {
        let mut payload = push_payload("refs/heads/master");
        payload.as_object_mut().unwrap().remove("head_commit");
        let Disposition::Build(job) = classify(&payload, "") else {
            panic!("expected a build job");
        };
        assert!(job.commit.is_none());
        assert_eq!(job.endpoint, "");
    }

    #[test]
    fn job_serializes_with_camel_case_fields() {
        let payload = push_payload("refs/heads/master");
        let Disposition::Build(job) = classify(&payload, "ci") else {
            panic!("expected a build job");
        };
        let doc = bson::to_document(&job).unwrap();
        for field in [
            "fullName",
            "name",
            "repo",
            "commit",
            "endpoint",
            "createdAt",
            "buildAt",
            "nrOfAttempts",
            "isSuccessful",
            "message",
            "pusher",
        ] {
            assert!(doc.contains_key(field), "missing field {field}");
        }
        assert_eq!(doc.get("buildAt"), Some(&bson::Bson::Null));
        assert_eq!(doc.get_i32("nrOfAttempts").unwrap(), 0);
    }
}
