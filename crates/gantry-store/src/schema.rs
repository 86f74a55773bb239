//! Best-effort schema inference for schema-less collections.
//!
//! The inferred shape is the field-wise union of every document observed,
//! computed in one pass over a stream without materializing the
//! collection. Object-valued fields merge recursively per key; scalar
//! fields accumulate the set of value types seen, so a field whose type
//! varies across documents is reported as the union of those types rather
//! than whichever document happened to arrive last. The result is a
//! snapshot, not a consistent point-in-time view: a concurrent writer can
//! change the collection mid-merge.

use std::collections::{BTreeMap, BTreeSet};

use bson::{Bson, Document};
use futures::{Stream, TryStreamExt};
use serde_json::{json, Value};

/// Accumulator node for one field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    /// A nested object; merged per key.
    Object(BTreeMap<String, SchemaNode>),
    /// A leaf carrying every value type observed at this path.
    Leaf(BTreeSet<&'static str>),
}

impl SchemaNode {
    pub fn empty() -> Self {
        SchemaNode::Object(BTreeMap::new())
    }

    /// Fold one document into the accumulator.
    pub fn fold(&mut self, doc: &Document) {
        if let SchemaNode::Object(fields) = self {
            for (key, value) in doc {
                merge_field(fields, key, value);
            }
        }
    }

    /// Render the accumulated shape as a JSON object mapping field names
    /// to type strings. A leaf that observed one type renders as that
    /// type's name; a type-varying leaf renders the union, e.g.
    /// `"int | string"`.
    pub fn render(&self) -> Value {
        match self {
            SchemaNode::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, node)| (key.clone(), node.render()))
                    .collect(),
            ),
            SchemaNode::Leaf(types) => {
                let joined = types.iter().copied().collect::<Vec<_>>().join(" | ");
                json!(joined)
            }
        }
    }
}

fn merge_field(fields: &mut BTreeMap<String, SchemaNode>, key: &str, value: &Bson) {
    let merged = match (fields.remove(key), value) {
        (Some(SchemaNode::Object(mut nested)), Bson::Document(doc)) => {
            for (k, v) in doc {
                merge_field(&mut nested, k, v);
            }
            SchemaNode::Object(nested)
        }
        // Object/scalar collision: demote to a leaf recording both.
        (Some(SchemaNode::Object(_)), other) => {
            let mut types = BTreeSet::from(["object"]);
            types.insert(type_name(other));
            SchemaNode::Leaf(types)
        }
        (Some(SchemaNode::Leaf(mut types)), Bson::Document(_)) => {
            types.insert("object");
            SchemaNode::Leaf(types)
        }
        (Some(SchemaNode::Leaf(mut types)), other) => {
            types.insert(type_name(other));
            SchemaNode::Leaf(types)
        }
        (None, Bson::Document(doc)) => {
            let mut nested = BTreeMap::new();
            for (k, v) in doc {
                merge_field(&mut nested, k, v);
            }
            SchemaNode::Object(nested)
        }
        (None, other) => SchemaNode::Leaf(BTreeSet::from([type_name(other)])),
    };
    fields.insert(key.to_string(), merged);
}

/// Canonical type alias for a BSON value, matching the driver's `$type`
/// names.
fn type_name(value: &Bson) -> &'static str {
    match value {
        Bson::Double(_) => "double",
        Bson::String(_) => "string",
        Bson::Array(_) => "array",
        Bson::Document(_) => "object",
        Bson::Boolean(_) => "bool",
        Bson::Null => "null",
        Bson::Int32(_) => "int",
        Bson::Int64(_) => "long",
        Bson::Timestamp(_) => "timestamp",
        Bson::Binary(_) => "binData",
        Bson::ObjectId(_) => "objectId",
        Bson::DateTime(_) => "date",
        Bson::RegularExpression(_) => "regex",
        Bson::Decimal128(_) => "decimal",
        Bson::Symbol(_) => "symbol",
        Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_) => "javascript",
        Bson::MaxKey => "maxKey",
        Bson::MinKey => "minKey",
        Bson::Undefined => "undefined",
        Bson::DbPointer(_) => "dbPointer",
    }
}

/// Stream every document of a collection through the fold and render the
/// resulting shape, with `_id` removed from the top level.
pub async fn infer_schema<S, E>(documents: S) -> Result<Value, E>
where
    S: Stream<Item = Result<Document, E>>,
{
    futures::pin_mut!(documents);
    let mut acc = SchemaNode::empty();
    while let Some(doc) = documents.try_next().await? {
        acc.fold(&doc);
    }
    if let SchemaNode::Object(fields) = &mut acc {
        fields.remove("_id");
    }
    Ok(acc.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use futures::stream;
    use mongodb::error::Error as MongoError;

    fn infer(docs: Vec<Document>) -> Value {
        let source = stream::iter(docs.into_iter().map(Ok::<_, MongoError>));
        futures::executor::block_on(infer_schema(source)).unwrap()
    }

    #[test]
    fn union_of_fields_across_documents() {
        let schema = infer(vec![doc! { "a": 1 }, doc! { "a": "x", "b": 2 }]);
        assert_eq!(schema, json!({ "a": "int | string", "b": "int" }));
    }

    #[test]
    fn id_is_removed() {
        let oid = bson::oid::ObjectId::new();
        let schema = infer(vec![doc! { "_id": oid, "name": "foo" }]);
        assert_eq!(schema, json!({ "name": "string" }));
    }

    #[test]
    fn nested_objects_merge_per_key() {
        let schema = infer(vec![
            doc! { "meta": { "author": "a" } },
            doc! { "meta": { "stars": 3 } },
        ]);
        assert_eq!(
            schema,
            json!({ "meta": { "author": "string", "stars": "int" } })
        );
    }

    #[test]
    fn single_type_renders_bare() {
        let schema = infer(vec![doc! { "n": 1.5, "ok": true, "none": null }]);
        assert_eq!(
            schema,
            json!({ "n": "double", "ok": "bool", "none": "null" })
        );
    }

    #[test]
    fn object_scalar_collision_is_visible() {
        let schema = infer(vec![doc! { "v": { "x": 1 } }, doc! { "v": "flat" }]);
        assert_eq!(schema, json!({ "v": "object | string" }));

        let schema = infer(vec![doc! { "v": "flat" }, doc! { "v": { "x": 1 } }]);
        assert_eq!(schema, json!({ "v": "object | string" }));
    }

    #[test]
    fn empty_collection_renders_empty_object() {
        assert_eq!(infer(vec![]), json!({}));
    }

    #[test]
    fn arrays_are_opaque() {
        let schema = infer(vec![doc! { "tags": ["a", "b"] }]);
        assert_eq!(schema, json!({ "tags": "array" }));
    }
}
