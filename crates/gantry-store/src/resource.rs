use std::collections::HashMap;
use std::sync::RwLock;

use bson::Document;
use mongodb::{Collection, Database};

/// A runtime-resolved resource: the canonical name plus a live handle on
/// the correspondingly named collection.
#[derive(Clone)]
pub struct Resource {
    pub name: String,
    pub collection: Collection<Document>,
}

/// Maps canonical resource names to cached collection handles.
///
/// Any URL segment is routable; the registry canonicalizes it via
/// [`camel_case`] and hands out a handle for that collection name,
/// creating and caching the handle on first use for the lifetime of the
/// process. There is no allow-list: callers that need to hide bookkeeping
/// collections do so at the listing endpoint, not here.
pub struct ResourceRegistry {
    db: Database,
    handles: RwLock<HashMap<String, Collection<Document>>>,
}

impl ResourceRegistry {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            handles: RwLock::new(HashMap::new()),
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Resolve a URL path segment into a [`Resource`].
    pub fn resolve(&self, segment: &str) -> Resource {
        let name = camel_case(segment);
        if let Some(collection) = self
            .handles
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&name)
        {
            return Resource {
                name,
                collection: collection.clone(),
            };
        }
        let collection = self.db.collection::<Document>(&name);
        self.handles
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.clone(), collection.clone());
        Resource { name, collection }
    }
}

/// Camel-case a URL path segment: words split on `-`, `_`, spaces, and
/// lowercase-to-uppercase transitions; first word lowercased, subsequent
/// words capitalized.
///
/// Idempotent: an already-canonical segment maps to itself, so the name
/// reported by collection introspection routes back to the same
/// collection.
pub fn camel_case(segment: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in segment.chars() {
        if matches!(c, '-' | '_' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut out = String::with_capacity(segment.len());
    for (i, word) in words.iter().enumerate() {
        let mut chars = word.chars();
        let Some(first) = chars.next() else { continue };
        if i == 0 {
            out.extend(first.to_lowercase());
        } else {
            out.extend(first.to_uppercase());
        }
        out.push_str(&chars.as_str().to_lowercase());
    }
    out
}

/// The field linking child documents to a parent resource:
/// `camelCase(parent) + "Id"`.
pub fn parent_link_field(segment: &str) -> String {
    let mut field = camel_case(segment);
    field.push_str("Id");
    field
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_segment_is_lowercased() {
        assert_eq!(camel_case("widgets"), "widgets");
        assert_eq!(camel_case("Widgets"), "widgets");
    }

    #[test]
    fn separators_produce_camel_humps() {
        assert_eq!(camel_case("build-jobs"), "buildJobs");
        assert_eq!(camel_case("build_jobs"), "buildJobs");
        assert_eq!(camel_case("BUILD JOBS"), "buildJobs");
    }

    #[test]
    fn case_transitions_split_words() {
        assert_eq!(camel_case("buildJobs"), "buildJobs");
        assert_eq!(camel_case("BuildJobs"), "buildJobs");
    }

    // An already-canonical name must route back to the same collection
    // it was listed under.
    #[test]
    fn canonicalization_is_idempotent() {
        for segment in ["buildJobs", "build-jobs", "Widgets", "BUILD JOBS", "x"] {
            let once = camel_case(segment);
            assert_eq!(camel_case(&once), once, "segment {segment:?}");
        }
    }

    #[test]
    fn empty_and_separator_only_segments() {
        assert_eq!(camel_case(""), "");
        assert_eq!(camel_case("--"), "");
    }

    #[test]
    fn parent_link_field_appends_id() {
        assert_eq!(parent_link_field("repos"), "reposId");
        assert_eq!(parent_link_field("build-jobs"), "buildJobsId");
    }

    // Client construction is lazy in the driver, so no server is needed
    // to exercise the registry itself.
    #[tokio::test]
    async fn resolve_canonicalizes_segment() {
        let client = mongodb::Client::with_uri_str("mongodb://127.0.0.1:27017")
            .await
            .unwrap();
        let registry = ResourceRegistry::new(client.database("gantry"));
        let a = registry.resolve("build-jobs");
        assert_eq!(a.name, "buildJobs");
        assert_eq!(a.collection.name(), "buildJobs");
        let b = registry.resolve("build_jobs");
        assert_eq!(b.name, "buildJobs");
    }
}
