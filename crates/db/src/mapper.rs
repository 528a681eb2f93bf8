//! Document mapper.
//!
//! Converts store-native values into a JSON-safe form: `ObjectId`s become
//! their 24-character hex string and datetimes become RFC 3339 UTC strings
//! with millisecond precision. Arrays and documents are mapped recursively,
//! keeping their key order. Everything else passes through unchanged, so
//! mapping an already-mapped value is a no-op.

use bson::{Bson, Document};
use chrono::SecondsFormat;
use serde::Serialize;

use atelier_core::types::Timestamp;

use crate::store::{StoreError, StoreResult};

/// Map a single value to its JSON-safe equivalent.
pub fn to_json_safe(value: Bson) -> Bson {
    match value {
        Bson::ObjectId(id) => Bson::String(id.to_hex()),
        Bson::DateTime(dt) => Bson::String(iso8601(dt)),
        Bson::Array(items) => Bson::Array(items.into_iter().map(to_json_safe).collect()),
        Bson::Document(doc) => Bson::Document(map_document(doc)),
        other => other,
    }
}

/// Map every field of `doc`, preserving key order.
pub fn map_document(doc: Document) -> Document {
    doc.into_iter()
        .map(|(key, value)| (key, to_json_safe(value)))
        .collect()
}

/// Map `value` and convert it to JSON.
pub fn to_json(value: Bson) -> serde_json::Value {
    to_json_safe(value).into_relaxed_extjson()
}

/// Serialize a model through BSON, keeping native ids and datetimes, and map
/// the result to JSON.
pub fn document_to_json<T: Serialize>(value: &T) -> StoreResult<serde_json::Value> {
    bson::to_bson(value)
        .map(to_json)
        .map_err(|e| StoreError::Mapping(e.to_string()))
}

fn iso8601(dt: bson::DateTime) -> String {
    let ts: Timestamp = dt.to_chrono();
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use bson::doc;
    use bson::oid::ObjectId;
    use serde_json::json;

    use super::*;

    fn sample() -> Document {
        let id = ObjectId::parse_str("65f1c0ffee00000000000001").unwrap();
        let created = bson::DateTime::from_millis(1_700_000_000_123);
        doc! {
            "_id": id,
            "name": "Atrium",
            "createdAt": created,
            "count": 3_i64,
            "tags": [id, "plain", { "at": created }],
            "nested": { "ref": id, "flag": true, "none": Bson::Null },
        }
    }

    #[test]
    fn converts_ids_and_datetimes_recursively() {
        let json = to_json(Bson::Document(sample()));
        assert_eq!(
            json,
            json!({
                "_id": "65f1c0ffee00000000000001",
                "name": "Atrium",
                "createdAt": "2023-11-14T22:13:20.123Z",
                "count": 3,
                "tags": ["65f1c0ffee00000000000001", "plain", { "at": "2023-11-14T22:13:20.123Z" }],
                "nested": { "ref": "65f1c0ffee00000000000001", "flag": true, "none": null },
            })
        );
    }

    #[test]
    fn mapping_is_idempotent() {
        let once = to_json_safe(Bson::Document(sample()));
        let twice = to_json_safe(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn key_order_is_preserved() {
        let mapped = map_document(sample());
        let keys: Vec<&str> = mapped.keys().map(String::as_str).collect();
        assert_eq!(keys, ["_id", "name", "createdAt", "count", "tags", "nested"]);

        let json = to_json(Bson::Document(sample()));
        let json_keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(json_keys, keys);
    }

    #[test]
    fn sequences_of_documents_are_mapped() {
        let list = Bson::Array(vec![Bson::Document(sample()), Bson::Document(sample())]);
        let json = to_json(list);
        assert_eq!(json.as_array().unwrap().len(), 2);
        assert_eq!(json[1]["_id"], "65f1c0ffee00000000000001");
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(to_json_safe(Bson::Int32(7)), Bson::Int32(7));
        assert_eq!(to_json_safe(Bson::String("x".into())), Bson::String("x".into()));
        assert_eq!(to_json(Bson::Boolean(false)), json!(false));
    }

    #[test]
    fn serializable_models_keep_native_types() {
        #[derive(Serialize)]
        struct Row {
            #[serde(rename = "_id")]
            id: ObjectId,
            #[serde(rename = "createdAt")]
            created_at: bson::DateTime,
        }

        let row = Row {
            id: ObjectId::parse_str("65f1c0ffee00000000000002").unwrap(),
            created_at: bson::DateTime::from_millis(0),
        };
        let json = document_to_json(&row).unwrap();
        assert_eq!(json["_id"], "65f1c0ffee00000000000002");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00.000Z");
    }
}
