//! Default (non-embedding) serializer behaviour
//!
//! [`BaseSerializer`] is the fallback every embedding decision delegates to when
//! a relationship is not embedded. [`UnderscoredSerializer`] implements it for
//! APIs that speak underscored keys with `_id` / `_ids` reference suffixes.

use crate::config::TransformConfig;
use crate::embed::polymorphic;
use crate::naming::{camelize, key_for_attribute, key_for_relationship};
use crate::record::Record;
use crate::schema::{Catalog, Relationship, RelationshipKind, TypeDescriptor};
use crate::serializer::SerializeOptions;
use serde_json::{Map, Value};
use std::fmt;

/// Serialization and normalization of a single record, without embedding
pub trait BaseSerializer: fmt::Debug + Send + Sync {
    fn config(&self) -> &TransformConfig;

    fn primary_key(&self) -> &str {
        &self.config().primary_key
    }

    /// Write the identifier (when requested) and every attribute of `record`
    fn serialize_attributes(
        &self,
        record: &Record,
        json: &mut Map<String, Value>,
        options: SerializeOptions,
    );

    /// Write a to-one relationship as a bare reference
    fn serialize_belongs_to(
        &self,
        record: &Record,
        json: &mut Map<String, Value>,
        relationship: &Relationship,
    );

    /// Write a to-many relationship as a list of references, when this side owns it
    fn serialize_has_many(
        &self,
        catalog: &dyn Catalog,
        record: &Record,
        json: &mut Map<String, Value>,
        relationship: &Relationship,
    );

    /// Convert one side-loaded wire record into model-side keys
    fn normalize(&self, model: &TypeDescriptor, hash: &Map<String, Value>) -> Map<String, Value>;
}

/// Speaks `first_name`, `home_planet_id` and `evil_minion_ids` on the wire
#[derive(Debug, Clone, Default)]
pub struct UnderscoredSerializer {
    config: TransformConfig,
}

impl UnderscoredSerializer {
    pub fn new(config: TransformConfig) -> Self {
        UnderscoredSerializer { config }
    }

    /// A to-many relationship is written by this side only when nothing on the
    /// other side points back with a to-one (many-to-none or many-to-many).
    fn owns_has_many(catalog: &dyn Catalog, relationship: &Relationship) -> bool {
        let Some(inverse) = &relationship.inverse else {
            return true;
        };

        catalog
            .model_for(&relationship.target)
            .and_then(|model| model.relationship(inverse))
            .map_or(true, |inverse| inverse.kind == RelationshipKind::ToMany)
    }
}

impl BaseSerializer for UnderscoredSerializer {
    fn config(&self) -> &TransformConfig {
        &self.config
    }

    fn serialize_attributes(
        &self,
        record: &Record,
        json: &mut Map<String, Value>,
        options: SerializeOptions,
    ) {
        if options.include_id {
            if let Some(id) = record.id() {
                json.insert(self.primary_key().to_string(), Value::String(id.to_string()));
            }
        }

        for (name, value) in &record.attributes {
            json.insert(key_for_attribute(name), value.clone());
        }
    }

    fn serialize_belongs_to(
        &self,
        record: &Record,
        json: &mut Map<String, Value>,
        relationship: &Relationship,
    ) {
        let key = key_for_relationship(&relationship.name, RelationshipKind::ToOne);
        let related = record.belongs_to(&relationship.name);

        json.insert(key, related.map_or(Value::Null, Record::id_value));

        if relationship.polymorphic {
            if let Some(related) = related {
                polymorphic::stamp_type(json, relationship, related, self.config.polymorphic_tag);
            }
        }
    }

    fn serialize_has_many(
        &self,
        catalog: &dyn Catalog,
        record: &Record,
        json: &mut Map<String, Value>,
        relationship: &Relationship,
    ) {
        if !Self::owns_has_many(catalog, relationship) || record.is_pending(&relationship.name) {
            return;
        }

        let key = key_for_relationship(&relationship.name, RelationshipKind::ToMany);
        let ids = record
            .has_many(&relationship.name)
            .iter()
            .map(Record::id_value)
            .collect();
        json.insert(key, Value::Array(ids));
    }

    fn normalize(&self, model: &TypeDescriptor, hash: &Map<String, Value>) -> Map<String, Value> {
        let mut hash = hash.clone();

        if self.primary_key() != "id" {
            rename(&mut hash, &self.config.primary_key, "id");
        }

        normalize_links(&mut hash);

        for attribute in &model.attributes {
            rename(&mut hash, &key_for_attribute(attribute), attribute);
        }

        for relationship in &model.relationships {
            let payload_key = if relationship.polymorphic {
                let payload_key = key_for_attribute(&relationship.name);
                if let Some(reference) = hash.get_mut(&payload_key) {
                    polymorphic::rewrite_reference(reference, relationship.kind);
                    if self.primary_key() != "id" {
                        for reference in polymorphic::references_mut(reference, relationship.kind) {
                            rename(reference, &self.config.primary_key, "id");
                        }
                    }
                }
                payload_key
            } else {
                key_for_relationship(&relationship.name, relationship.kind)
            };
            rename(&mut hash, &payload_key, &relationship.name);
        }

        hash
    }
}

fn rename(hash: &mut Map<String, Value>, from: &str, to: &str) {
    if from == to {
        return;
    }
    if let Some(value) = hash.remove(from) {
        hash.insert(to.to_string(), value);
    }
}

/// `{"links": {"flagged_comments": ...}}` -> `{"links": {"flaggedComments": ...}}`
fn normalize_links(hash: &mut Map<String, Value>) {
    let Some(Value::Object(links)) = hash.get_mut("links") else {
        return;
    };

    let renamed: Vec<String> = links
        .keys()
        .filter(|link| camelize(link) != **link)
        .cloned()
        .collect();

    for link in renamed {
        if let Some(value) = links.remove(&link) {
            links.insert(camelize(&link), value);
        }
    }
}
