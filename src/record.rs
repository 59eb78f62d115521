//! In-memory records consumed by the outbound transform

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The value held by a record for one of its relationships
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RelationshipValue {
    Many(Vec<Record>),
    One(Option<Box<Record>>),
    /// Not yet resolved; never read as data
    #[serde(skip_deserializing)]
    Pending,
}

/// A record with an optional identifier, attributes and relationship values
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub type_key: String,

    /// Absent for records that have not been persisted yet
    #[serde(default)]
    pub id: Option<String>,

    /// Attribute values keyed by camelCase attribute name
    #[serde(default)]
    pub attributes: Map<String, Value>,

    #[serde(default)]
    pub relationships: BTreeMap<String, RelationshipValue>,
}

impl Record {
    pub fn new(type_key: impl Into<String>) -> Self {
        Record {
            type_key: type_key.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_one(mut self, name: impl Into<String>, related: Record) -> Self {
        self.relationships
            .insert(name.into(), RelationshipValue::One(Some(Box::new(related))));
        self
    }

    pub fn with_many(mut self, name: impl Into<String>, related: Vec<Record>) -> Self {
        self.relationships
            .insert(name.into(), RelationshipValue::Many(related));
        self
    }

    pub fn with_pending(mut self, name: impl Into<String>) -> Self {
        self.relationships
            .insert(name.into(), RelationshipValue::Pending);
        self
    }

    /// The identifier, if present and non-empty
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// The identifier as a JSON value, `null` when absent
    pub fn id_value(&self) -> Value {
        self.id()
            .map(|id| Value::String(id.to_string()))
            .unwrap_or(Value::Null)
    }

    /// The related record of a to-one relationship. Pending and missing values
    /// read as absent.
    pub fn belongs_to(&self, name: &str) -> Option<&Record> {
        match self.relationships.get(name) {
            Some(RelationshipValue::One(Some(related))) => Some(related),
            _ => None,
        }
    }

    /// The related records of a to-many relationship. Pending and missing
    /// values read as empty.
    pub fn has_many(&self, name: &str) -> &[Record] {
        match self.relationships.get(name) {
            Some(RelationshipValue::Many(related)) => related,
            _ => &[],
        }
    }

    pub fn is_pending(&self, name: &str) -> bool {
        matches!(self.relationships.get(name), Some(RelationshipValue::Pending))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_reads_as_absent() {
        let record = Record::new("superVillain")
            .with_pending("secretLab")
            .with_pending("evilMinions");

        assert!(record.is_pending("secretLab"));
        assert!(record.belongs_to("secretLab").is_none());
        assert!(record.has_many("evilMinions").is_empty());
    }

    #[test]
    fn test_empty_id_reads_as_absent() {
        let record = Record::new("secretLab").with_id("");
        assert_eq!(record.id(), None);
        assert_eq!(record.id_value(), Value::Null);
    }

    #[test]
    fn test_deserialize_record_tree() {
        let record: Record = serde_json::from_value(json!({
            "type": "superVillain",
            "id": "1",
            "attributes": {"firstName": "Tom"},
            "relationships": {
                "secretLab": {"type": "secretLab", "id": "101"},
                "homePlanet": null,
                "evilMinions": [{"type": "evilMinion", "id": "2"}]
            }
        }))
        .unwrap();

        assert_eq!(record.id(), Some("1"));
        assert_eq!(record.belongs_to("secretLab").and_then(Record::id), Some("101"));
        assert!(record.belongs_to("homePlanet").is_none());
        assert_eq!(record.has_many("evilMinions").len(), 1);
    }
}
