//! Persisted records

use crate::schema::{FieldValue, Values};
use serde::{Deserialize, Serialize};

/// A stored record: identity, the variant's declared fields and timestamps.
///
/// Declared fields are flattened into the JSON object next to `id`,
/// `created_at` and `updated_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    #[serde(flatten)]
    pub values: Values,
    pub created_at: String,
    pub updated_at: String,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text value of a field, empty if absent or not textual
    pub fn text(&self, field: &str) -> &str {
        self.values.get(field).and_then(FieldValue::as_text).unwrap_or("")
    }

    pub fn flag(&self, field: &str) -> bool {
        self.values.get(field).and_then(FieldValue::as_flag).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattened_json() {
        let mut values = Values::new();
        values.insert("title".into(), "A".into());
        values.insert("public".into(), true.into());
        let record = Record {
            id: 7,
            values,
            created_at: "2024-01-01 10:00:00.000".into(),
            updated_at: "2024-01-01 10:00:00.000".into(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "A");
        assert_eq!(json["public"], true);

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back.text("title"), "A");
        assert!(back.flag("public"));
        assert_eq!(back.values.len(), 2);
    }
}
