//! Inbound transform: pull embedded records out into side-load collections
//!
//! De-embedding walks the primary record fragment(s) of a payload. Every
//! relationship configured as embedded has its nested records removed from
//! the parent, de-embedded in turn with their own serializer, and appended to a
//! side-load collection; the parent keeps references in their place.
//!
//! The walk rewrites copies of the primary fragments and buffers side-loaded
//! records. Nothing is written back to the payload unless the whole walk
//! succeeds, so a failed extraction leaves the payload as it was. Collections
//! keep the order records were reached in: nested records precede the record
//! embedding them.

use crate::config::TransformConfig;
use crate::embed::polymorphic::{self, REFERENCE_TYPE_KEY};
use crate::embed::EmbeddedSerializer;
use crate::error::{Error, Result};
use crate::naming::{
    collection_key, key_for_attribute, key_for_relationship, plural_root_for_type, root_for_type,
    type_for_root,
};
use crate::schema::{Catalog, Relationship, RelationshipKind, TypeDescriptor};
use crate::serializer::document::{assemble, Document, Shape};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

impl EmbeddedSerializer {
    /// Extract a payload whose primary data is a single record of `primary_type`.
    ///
    /// The payload is rewritten in place into its side-loaded form before being
    /// assembled into a [`Document`].
    pub fn extract_single(
        &self,
        catalog: &dyn Catalog,
        primary_type: &str,
        payload: &mut Value,
    ) -> Result<Document> {
        let model = catalog
            .model_for(primary_type)
            .ok_or_else(|| Error::UnknownType(primary_type.to_string()))?;
        let hash = payload.as_object_mut().ok_or(Error::PayloadNotObject)?;
        let root = root_for_type(primary_type);

        let mut walk = Walk::new(catalog, self.config(), primary_type, hash);
        let extracted = match hash.get(&root) {
            Some(Value::Object(partial)) => {
                let mut partial = partial.clone();
                walk.de_embed(self, model, &mut partial, 0)?;
                Some(Value::Object(partial))
            }
            _ => None,
        };

        walk.sideloads.merge_into(hash)?;
        if let Some(partial) = extracted {
            hash.insert(root, partial);
        }

        Ok(assemble(catalog, model, hash, Shape::Single, &self.config().sideload_prefix))
    }

    /// Extract a payload whose primary data is a list of `primary_type` records
    pub fn extract_array(
        &self,
        catalog: &dyn Catalog,
        primary_type: &str,
        payload: &mut Value,
    ) -> Result<Document> {
        let model = catalog
            .model_for(primary_type)
            .ok_or_else(|| Error::UnknownType(primary_type.to_string()))?;
        let hash = payload.as_object_mut().ok_or(Error::PayloadNotObject)?;
        let root = plural_root_for_type(primary_type);

        let mut walk = Walk::new(catalog, self.config(), primary_type, hash);
        let extracted = match hash.get(&root) {
            Some(Value::Array(partials)) => {
                let mut partials = partials.clone();
                for partial in partials.iter_mut().filter_map(Value::as_object_mut) {
                    walk.de_embed(self, model, partial, 0)?;
                }
                Some(Value::Array(partials))
            }
            _ => None,
        };

        walk.sideloads.merge_into(hash)?;
        if let Some(partials) = extracted {
            hash.insert(root, partials);
        }

        Ok(assemble(catalog, model, hash, Shape::Many, &self.config().sideload_prefix))
    }
}

/// Side-load collections gathered during one extraction, keyed by payload root
#[derive(Debug, Default)]
struct Sideloads {
    collections: BTreeMap<String, Vec<Value>>,
}

impl Sideloads {
    fn ensure(&mut self, key: &str) {
        self.collections.entry(key.to_string()).or_default();
    }

    fn push(&mut self, key: &str, record: Value) {
        self.collections.entry(key.to_string()).or_default().push(record);
    }

    /// Append every collection to the payload, creating missing roots. The
    /// payload is only touched once every target root is known to be a list.
    fn merge_into(self, payload: &mut Map<String, Value>) -> Result<()> {
        if let Some(key) = self
            .collections
            .keys()
            .find(|key| !matches!(payload.get(*key), None | Some(Value::Array(_))))
        {
            return Err(Error::SideCollectionNotArray(key.clone()));
        }

        for (key, records) in self.collections {
            if let Value::Array(existing) = payload
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                existing.extend(records);
            }
        }
        Ok(())
    }
}

struct Walk<'a> {
    catalog: &'a dyn Catalog,
    prefix: &'a str,
    max_depth: usize,
    primary_type: &'a str,
    /// Ids already present in each payload root before this extraction,
    /// compared by their JSON text
    existing: HashMap<String, HashSet<String>>,
    sideloads: Sideloads,
}

impl<'a> Walk<'a> {
    fn new(
        catalog: &'a dyn Catalog,
        config: &'a TransformConfig,
        primary_type: &'a str,
        payload: &Map<String, Value>,
    ) -> Self {
        let existing = payload
            .iter()
            .filter_map(|(root, value)| {
                let Value::Array(records) = value else {
                    return None;
                };
                let primary_key = catalog.serializer_for(&type_for_root(root)).base().primary_key();
                let ids = records
                    .iter()
                    .filter_map(|record| record.get(primary_key))
                    .filter(|id| !id.is_null())
                    .map(Value::to_string)
                    .collect();
                Some((root.clone(), ids))
            })
            .collect();

        Walk {
            catalog,
            prefix: &config.sideload_prefix,
            max_depth: config.max_depth,
            primary_type,
            existing,
            sideloads: Sideloads::default(),
        }
    }

    fn de_embed(
        &mut self,
        serializer: &EmbeddedSerializer,
        model: &TypeDescriptor,
        partial: &mut Map<String, Value>,
        depth: usize,
    ) -> Result<()> {
        if serializer.attrs().is_empty() {
            return Ok(());
        }
        if depth > self.max_depth {
            return Err(Error::EmbeddingTooDeep {
                type_key: model.type_key.clone(),
                max_depth: self.max_depth,
            });
        }

        for relationship in &model.relationships {
            if !serializer.attrs().is_inline(&relationship.name) {
                continue;
            }
            match relationship.kind {
                RelationshipKind::ToMany => self.extract_has_many(relationship, partial, depth)?,
                RelationshipKind::ToOne => {
                    self.extract_belongs_to(serializer, model, relationship, partial, depth)?
                }
            }
        }

        Ok(())
    }

    fn extract_has_many(
        &mut self,
        relationship: &Relationship,
        partial: &mut Map<String, Value>,
        depth: usize,
    ) -> Result<()> {
        let attribute = key_for_attribute(&relationship.name);
        match partial.get(&attribute) {
            Some(Value::Array(_)) => {}
            None | Some(Value::Null) => return Ok(()),
            Some(_) => {
                tracing::warn!(
                    attribute = attribute.as_str(),
                    "embedded to-many relationship does not hold a list, leaving it untouched"
                );
                return Ok(());
            }
        }
        let Some(Value::Array(elements)) = partial.remove(&attribute) else {
            return Ok(());
        };

        if !relationship.polymorphic {
            let collection = self.side_collection(&relationship.target);
            self.sideloads.ensure(&collection);
        }

        let mut references = Vec::with_capacity(elements.len());
        for element in elements {
            let Value::Object(mut nested) = element else {
                tracing::warn!(
                    attribute = attribute.as_str(),
                    "embedded element is not a record, keeping it as a reference"
                );
                references.push(element);
                continue;
            };

            let type_key = self.nested_type(relationship, &mut nested);
            let collection = self.side_collection(&type_key);

            if relationship.polymorphic && self.is_reference(&type_key, &collection, &nested) {
                references.push(Value::Object(nested));
                continue;
            }

            let id = self.de_embed_nested(&type_key, &mut nested, depth)?;

            references.push(if relationship.polymorphic {
                let primary_key = self.primary_key_of(&type_key);
                polymorphic::reference_to(Value::String(type_key.clone()), primary_key, id)
            } else {
                id
            });

            self.sideloads.push(&collection, Value::Object(nested));
        }

        tracing::debug!(
            relationship = relationship.name.as_str(),
            count = references.len(),
            "side-loaded embedded records"
        );

        let key = if relationship.polymorphic {
            attribute
        } else {
            key_for_relationship(&relationship.name, RelationshipKind::ToMany)
        };
        partial.insert(key, Value::Array(references));
        Ok(())
    }

    fn extract_belongs_to(
        &mut self,
        serializer: &EmbeddedSerializer,
        model: &TypeDescriptor,
        relationship: &Relationship,
        partial: &mut Map<String, Value>,
        depth: usize,
    ) -> Result<()> {
        let attribute = key_for_attribute(&relationship.name);
        let key = [attribute.as_str(), relationship.name.as_str()]
            .into_iter()
            .find(|key| matches!(partial.get(*key), Some(Value::Object(_))))
            .map(str::to_string);
        let Some(key) = key else {
            return Ok(());
        };
        let Some(Value::Object(mut nested)) = partial.remove(&key) else {
            return Ok(());
        };

        let type_key = self.nested_type(relationship, &mut nested);
        let collection = self.belongs_to_collection(model, &type_key);

        if relationship.polymorphic && self.is_reference(&type_key, &collection, &nested) {
            partial.insert(attribute, Value::Object(nested));
            return Ok(());
        }

        let id = self.de_embed_nested(&type_key, &mut nested, depth)?;

        let parent_id = partial
            .get(serializer.base().primary_key())
            .filter(|id| !id.is_null())
            .cloned();
        if let Some(parent_id) = parent_id {
            nested.insert(key_for_relationship(&model.type_key, RelationshipKind::ToOne), parent_id);
        }

        if relationship.polymorphic {
            let primary_key = self.primary_key_of(&type_key);
            partial.insert(
                attribute,
                polymorphic::reference_to(Value::String(type_key.clone()), primary_key, id),
            );
        } else {
            partial.insert(key_for_relationship(&relationship.name, RelationshipKind::ToOne), id);
        }

        tracing::debug!(
            type_key = model.type_key.as_str(),
            relationship = relationship.name.as_str(),
            "side-loaded embedded record"
        );

        self.sideloads.push(&collection, Value::Object(nested));
        Ok(())
    }

    /// De-embed a nested record with its own type's serializer, returning its id
    fn de_embed_nested(
        &mut self,
        type_key: &str,
        nested: &mut Map<String, Value>,
        depth: usize,
    ) -> Result<Value> {
        let catalog = self.catalog;
        let model = catalog
            .model_for(type_key)
            .ok_or_else(|| Error::UnknownType(type_key.to_string()))?;
        let serializer = catalog.serializer_for(type_key);

        self.de_embed(serializer, model, nested, depth + 1)?;

        Ok(nested
            .get(serializer.base().primary_key())
            .cloned()
            .unwrap_or(Value::Null))
    }

    /// The type of a nested record: its own resolved tag for polymorphic
    /// relationships, the declared target otherwise. A resolved tag is written
    /// back into the record.
    fn nested_type(&self, relationship: &Relationship, nested: &mut Map<String, Value>) -> String {
        if !relationship.polymorphic {
            return relationship.target.clone();
        }

        let resolved = nested
            .get(REFERENCE_TYPE_KEY)
            .and_then(Value::as_str)
            .map(polymorphic::resolve_type);

        match resolved {
            Some(type_key) => {
                nested.insert(REFERENCE_TYPE_KEY.to_string(), Value::String(type_key.clone()));
                type_key
            }
            None => relationship.target.clone(),
        }
    }

    fn primary_key_of(&self, type_key: &str) -> &'a str {
        self.catalog.serializer_for(type_key).base().primary_key()
    }

    fn side_collection(&self, type_key: &str) -> String {
        format!("{}{}", self.prefix, collection_key(type_key))
    }

    /// To-one records go to the plain collection of their type, unless that
    /// type is the embedding record's own or the primary type, whose plain
    /// root may hold the primary data.
    fn belongs_to_collection(&self, parent: &TypeDescriptor, type_key: &str) -> String {
        if type_key == parent.type_key || type_key == self.primary_type {
            self.side_collection(type_key)
        } else {
            collection_key(type_key)
        }
    }

    /// A bare `{type, <primary key>}` object whose record already sits in
    /// `collection`: a reference left by an earlier extraction
    fn is_reference(&self, type_key: &str, collection: &str, nested: &Map<String, Value>) -> bool {
        let primary_key = self.primary_key_of(type_key);
        if nested.len() != 2 || !nested.contains_key(REFERENCE_TYPE_KEY) {
            return false;
        }

        nested
            .get(primary_key)
            .filter(|id| !id.is_null())
            .is_some_and(|id| {
                self.existing
                    .get(collection)
                    .is_some_and(|ids| ids.contains(&id.to_string()))
            })
    }
}
