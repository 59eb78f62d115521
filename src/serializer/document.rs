use crate::naming::{collection_name, type_for_root};
use crate::schema::{Catalog, TypeDescriptor};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Whether the primary data is a single record or a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Single,
    Many,
}

/// A fully normalized payload: the primary data plus every side-loaded record,
/// all with model-side keys
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    /// A record object, a list of records, or null when the payload had no primary root
    pub primary: Value,

    /// Side-loaded records keyed by collection name, e.g. "secretLabs"
    pub sideloaded: BTreeMap<String, Vec<Map<String, Value>>>,
}

impl Document {
    fn empty(shape: Shape) -> Self {
        Document {
            primary: match shape {
                Shape::Single => Value::Null,
                Shape::Many => Value::Array(Vec::new()),
            },
            sideloaded: BTreeMap::new(),
        }
    }

    /// Side-loaded records of one type
    pub fn sideloaded_of(&self, type_key: &str) -> &[Map<String, Value>] {
        self.sideloaded
            .get(&collection_name(type_key))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Add a side-loaded record. A record whose id is already present replaces
    /// the earlier one in place.
    pub fn push_sideloaded(&mut self, type_key: &str, record: Map<String, Value>) {
        let collection = self
            .sideloaded
            .entry(collection_name(type_key))
            .or_default();

        let existing = record
            .get("id")
            .filter(|id| !id.is_null())
            .and_then(|id| collection.iter().position(|other| other.get("id") == Some(id)));

        match existing {
            Some(idx) => collection[idx] = record,
            None => collection.push(record),
        }
    }
}

/// Build the [`Document`] for an already de-embedded payload.
///
/// Each top-level key names a type through [`type_for_root`]. The root of the
/// primary type becomes the primary data unless it starts with
/// `sideload_prefix`; every other root is side-loaded. Roots naming types the
/// catalog does not know are skipped.
pub fn assemble(
    catalog: &dyn Catalog,
    primary: &TypeDescriptor,
    payload: &Map<String, Value>,
    shape: Shape,
    sideload_prefix: &str,
) -> Document {
    let mut document = Document::empty(shape);

    for (root, value) in payload {
        let forced_secondary = !sideload_prefix.is_empty() && root.starts_with(sideload_prefix);
        let type_key = type_for_root(root);

        let Some(model) = catalog.model_for(&type_key) else {
            tracing::warn!(root = root.as_str(), type_key = type_key.as_str(), "no type declared for payload root, skipping");
            continue;
        };

        let serializer = catalog.serializer_for(&type_key).base();
        let is_primary = !forced_secondary && type_key == primary.type_key;

        match (shape, is_primary, value) {
            (Shape::Single, true, Value::Object(hash)) => {
                document.primary = Value::Object(serializer.normalize(model, hash));
            }
            (Shape::Many, true, Value::Array(hashes)) => {
                document.primary = Value::Array(
                    hashes
                        .iter()
                        .filter_map(Value::as_object)
                        .map(|hash| Value::Object(serializer.normalize(model, hash)))
                        .collect(),
                );
            }
            (_, _, Value::Array(hashes)) => {
                for hash in hashes.iter().filter_map(Value::as_object) {
                    document.push_sideloaded(&type_key, serializer.normalize(model, hash));
                }
            }
            (_, _, Value::Object(hash)) => {
                document.push_sideloaded(&type_key, serializer.normalize(model, hash));
            }
            _ => {
                tracing::warn!(root = root.as_str(), "payload root holds neither a record nor a list, skipping");
            }
        }
    }

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{fixture_schema, FixtureExt};
    use serde_json::json;

    #[test]
    fn test_push_sideloaded_replaces_same_id() {
        let mut document = Document::default();
        document.push_sideloaded("secretLab", json!({"id": "101", "vicinity": "old"}).as_object().unwrap().clone());
        document.push_sideloaded("secretLab", json!({"id": "102"}).as_object().unwrap().clone());
        document.push_sideloaded("secretLab", json!({"id": "101", "vicinity": "new"}).as_object().unwrap().clone());

        let labs = document.sideloaded_of("secretLab");
        assert_eq!(labs.len(), 2);
        assert_eq!(labs[0]["vicinity"], "new");
    }

    #[test]
    fn test_assemble_single() {
        let schema = fixture_schema();
        let payload = json!({
            "home_planet": {"id": "1", "name": "Umber", "super_villain_ids": [1]},
            "super_villains": [{"id": "1", "first_name": "Tom", "last_name": "Dale", "home_planet_id": "1"}],
            "space_stations": [{"id": "9"}]
        });

        let document = assemble(
            &schema,
            schema.model("homePlanet"),
            payload.as_object().unwrap(),
            Shape::Single,
            "_",
        );

        assert_eq!(document.primary, json!({"id": "1", "name": "Umber", "superVillains": [1]}));
        assert_eq!(
            Value::Object(document.sideloaded_of("superVillain")[0].clone()),
            json!({"id": "1", "firstName": "Tom", "lastName": "Dale", "homePlanet": "1"})
        );
        assert!(!document.sideloaded.contains_key("spaceStations"));
    }

    #[test]
    fn test_prefixed_root_is_never_primary() {
        let schema = fixture_schema();
        let payload = json!({
            "comment": {"id": "1", "child_ids": ["2"]},
            "_comments": [{"id": "2", "child_ids": []}]
        });

        let document = assemble(
            &schema,
            schema.model("comment"),
            payload.as_object().unwrap(),
            Shape::Single,
            "_",
        );

        assert_eq!(document.primary, json!({"id": "1", "children": ["2"]}));
        assert_eq!(
            Value::Object(document.sideloaded_of("comment")[0].clone()),
            json!({"id": "2", "children": []})
        );
    }

    #[test]
    fn test_missing_primary_root() {
        let schema = fixture_schema();
        let payload = json!({"super_villains": []});

        let single = assemble(&schema, schema.model("homePlanet"), payload.as_object().unwrap(), Shape::Single, "_");
        assert_eq!(single.primary, Value::Null);

        let many = assemble(&schema, schema.model("homePlanet"), payload.as_object().unwrap(), Shape::Many, "_");
        assert_eq!(many.primary, json!([]));
    }
}
