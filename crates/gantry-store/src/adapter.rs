use bson::{doc, Document};
use chrono::Utc;
use mongodb::{Client, Collection, Cursor, Database};

use crate::error::{StoreError, StoreResult};
use crate::id::DocumentId;

/// Connect to the store and select the working database.
///
/// The driver connects lazily; this performs no I/O beyond URI parsing,
/// and the returned handle is shared read-only by every request handler.
pub async fn connect(uri: &str, database: &str) -> StoreResult<Database> {
    let client = Client::with_uri_str(uri).await?;
    Ok(client.database(database))
}

/// Enumerate user-visible collection names.
///
/// Drops names carrying the driver's reserved `system.` marker and names
/// beginning with an underscore (internal bookkeeping, e.g. the webhook
/// record store). A `<dbname>.` prefix is stripped when the driver
/// reports one. Output is sorted.
pub async fn list_collections(db: &Database) -> StoreResult<Vec<String>> {
    let names = db.list_collection_names(None).await?;
    Ok(visible_names(db.name(), names))
}

fn visible_names(db_name: &str, names: Vec<String>) -> Vec<String> {
    let prefix = format!("{db_name}.");
    let mut names: Vec<String> = names
        .into_iter()
        .map(|name| match name.strip_prefix(&prefix) {
            Some(stripped) => stripped.to_string(),
            None => name,
        })
        .filter(|name| !name.contains("system.") && !name.starts_with('_'))
        .collect();
    names.sort();
    names
}

/// Uniform CRUD operations against one named collection.
///
/// Contracts, uniform across all resources:
/// - `list` hands back the driver cursor; results are streamed, never
///   collected. Dropping the cursor releases it server-side.
/// - `insert` stamps `createdAt` / `updatedAt` (equal at creation) and
///   returns the document as stored.
/// - `replace` discards any client-supplied `_id` and resets `updatedAt`;
///   the original identifier is preserved because the replace is keyed on
///   the path identifier.
/// - `delete` distinguishes zero matches ([`StoreError::NotFound`]) from
///   one.
#[derive(Clone)]
pub struct CollectionAdapter {
    collection: Collection<Document>,
}

impl CollectionAdapter {
    pub fn new(collection: Collection<Document>) -> Self {
        Self { collection }
    }

    /// Stream every document matching `filter`, lazily.
    pub async fn list(&self, filter: Document) -> StoreResult<Cursor<Document>> {
        Ok(self.collection.find(filter, None).await?)
    }

    /// Count documents matching `filter`.
    pub async fn count(&self, filter: Document) -> StoreResult<u64> {
        Ok(self.collection.count_documents(filter, None).await?)
    }

    /// Fetch one document by identifier.
    pub async fn get(&self, id: DocumentId) -> StoreResult<Document> {
        self.collection
            .find_one(doc! { "_id": id.as_oid() }, None)
            .await?
            .ok_or(StoreError::NotFound)
    }

    /// Insert a document, stamping timestamps and the optional parent
    /// linkage field. Returns the document as stored, identifier included.
    pub async fn insert(
        &self,
        mut body: Document,
        parent: Option<(&str, DocumentId)>,
    ) -> StoreResult<Document> {
        let now = bson::DateTime::from_chrono(Utc::now());
        body.insert("createdAt", now);
        body.insert("updatedAt", now);
        if let Some((field, parent_id)) = parent {
            body.insert(field, parent_id.as_oid());
        }
        let result = self.collection.insert_one(&body, None).await?;
        if !body.contains_key("_id") {
            body.insert("_id", result.inserted_id);
        }
        tracing::debug!(collection = self.collection.name(), "inserted document");
        Ok(body)
    }

    /// Insert a document exactly as given, no stamping.
    ///
    /// Used where the caller owns the document shape: verbatim webhook
    /// records and pre-built queue entries.
    pub async fn insert_raw(&self, body: Document) -> StoreResult<()> {
        self.collection.insert_one(body, None).await?;
        Ok(())
    }

    /// Full-document replace keyed by identifier.
    ///
    /// Matching zero documents is not an error here; the caller observes
    /// success either way, matching the gateway's PUT contract.
    pub async fn replace(&self, id: DocumentId, mut body: Document) -> StoreResult<()> {
        body.remove("_id");
        body.insert("updatedAt", bson::DateTime::from_chrono(Utc::now()));
        self.collection
            .replace_one(doc! { "_id": id.as_oid() }, body, None)
            .await?;
        Ok(())
    }

    /// Remove at most one document by identifier.
    pub async fn delete(&self, id: DocumentId) -> StoreResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.as_oid() }, None)
            .await?;
        if result.deleted_count == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
