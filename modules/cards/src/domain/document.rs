//! Conversions between JSON card records and stored BSON documents.

use mongodb::bson::{self, Bson, Document};
use serde_json::Value;

use crate::contract::model::CardFields;
use crate::domain::error::DomainError;

pub fn to_document(card: &CardFields) -> Result<Document, DomainError> {
    bson::to_document(card).map_err(|e| DomainError::store(e.to_string()))
}

/// Render a stored identifier as a plain string.
pub fn render_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert a stored document to JSON with its `_id` rendered as a string.
pub fn to_json(mut doc: Document) -> Value {
    if let Some(id) = doc.get("_id").map(render_id) {
        doc.insert("_id", id);
    }
    Bson::Document(doc).into_relaxed_extjson()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn object_id_renders_as_hex() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let out = to_json(doc! { "_id": oid, "rank": "A", "value": 14_i64 });
        assert_eq!(
            out,
            json!({"_id": "507f1f77bcf86cd799439011", "rank": "A", "value": 14})
        );
    }

    #[test]
    fn non_object_ids_render_as_text() {
        assert_eq!(render_id(&Bson::String("custom".into())), "custom");
        assert_eq!(render_id(&Bson::Int64(7)), "7");
    }

    #[test]
    fn json_numbers_become_integers() {
        let card = match json!({"rank": "2", "value": 2, "weight": 1.5}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let doc = to_document(&card).unwrap();
        assert_eq!(doc.get("value"), Some(&Bson::Int64(2)));
        assert_eq!(doc.get("weight"), Some(&Bson::Double(1.5)));
    }
}
