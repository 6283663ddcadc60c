//! Repository trait definitions for data persistence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use sow_types::{DocumentKind, Error};

/// Row of the document library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// Remote tables may use integer keys
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    /// Stored in the `type` column
    #[serde(rename = "type")]
    pub kind: DocumentKind,

    pub title: String,

    /// Full document JSON
    pub content: Value,

    pub created_at: DateTime<Utc>,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid document id: {}", other))),
    }
}

/// Row to insert; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewDocument {
    #[serde(rename = "type")]
    pub kind: DocumentKind,
    pub title: String,
    pub content: Value,
}

/// Library of saved documents. Every save inserts a new row.
pub trait DocumentRepository: Send + Sync {
    /// Insert a row and return it as stored
    fn save(&self, document: NewDocument) -> Result<StoredDocument, Error>;

    /// Find one row by id
    fn load(&self, id: &str) -> Result<Option<StoredDocument>, Error>;

    /// Rows of one kind, newest first
    fn list(&self, kind: DocumentKind) -> Result<Vec<StoredDocument>, Error>;

    /// Number of rows of one kind
    fn count(&self, kind: DocumentKind) -> Result<usize, Error>;
}

/// Key/value store for in-progress drafts and the order counter
pub trait DraftRepository: Send + Sync {
    /// Raw serialized value for `key`
    fn read(&self, key: &str) -> Result<Option<String>, Error>;

    /// Replace the value for `key`
    fn write(&self, key: &str, value: &str) -> Result<(), Error>;

    /// Drop `key`; missing keys are not an error
    fn remove(&self, key: &str) -> Result<(), Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_wire_shape() {
        let row: StoredDocument = serde_json::from_value(json!({
            "id": 17,
            "type": "techpack",
            "title": "Ficha SB-001",
            "content": {"reference": "SB-001"},
            "created_at": "2025-02-03T10:20:30.123456+00:00"
        }))
        .unwrap();
        assert_eq!(row.id, "17");
        assert_eq!(row.kind, DocumentKind::TechPack);
        assert_eq!(row.content["reference"], "SB-001");

        let new = NewDocument {
            kind: DocumentKind::Quote,
            title: "Orç. 001/2025 - Loja".into(),
            content: json!({}),
        };
        let value = serde_json::to_value(&new).unwrap();
        assert_eq!(value["type"], "quote");
    }
}
