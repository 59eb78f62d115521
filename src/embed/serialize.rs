//! Outbound transform: inline embedded relationships while serializing

use crate::embed::{EmbeddedSerializer, Embedding};
use crate::error::{Error, Result};
use crate::naming::{key_for_attribute, key_for_relationship, root_for_type};
use crate::record::Record;
use crate::schema::{Catalog, Relationship, RelationshipKind};
use crate::serializer::SerializeOptions;
use serde_json::{Map, Value};

impl EmbeddedSerializer {
    /// Serialize `record` to its wire attribute map
    pub fn serialize(
        &self,
        catalog: &dyn Catalog,
        record: &Record,
        options: SerializeOptions,
    ) -> Result<Map<String, Value>> {
        let model = catalog
            .model_for(&record.type_key)
            .ok_or_else(|| Error::UnknownType(record.type_key.clone()))?;

        let mut json = Map::new();
        self.base().serialize_attributes(record, &mut json, options);

        for relationship in &model.relationships {
            match relationship.kind {
                RelationshipKind::ToOne => {
                    self.serialize_belongs_to(catalog, record, &mut json, relationship)?
                }
                RelationshipKind::ToMany => {
                    self.serialize_has_many(catalog, record, &mut json, relationship)?
                }
            }
        }

        Ok(json)
    }

    /// Serialize `record` wrapped under its root key: `{"super_villain": {...}}`
    pub fn serialize_into_hash(
        &self,
        catalog: &dyn Catalog,
        record: &Record,
        options: SerializeOptions,
    ) -> Result<Map<String, Value>> {
        let mut data = Map::new();
        data.insert(
            root_for_type(&record.type_key),
            Value::Object(self.serialize(catalog, record, options)?),
        );
        Ok(data)
    }

    /// Serialize a to-one relationship, inlining the related record when embedded.
    ///
    /// An absent related record is written as an explicit `null`. The inlined
    /// record only carries an id when it has one, and loses its reference back
    /// to `record`.
    pub fn serialize_belongs_to(
        &self,
        catalog: &dyn Catalog,
        record: &Record,
        json: &mut Map<String, Value>,
        relationship: &Relationship,
    ) -> Result<()> {
        if !self.attrs().is_inline(&relationship.name) {
            self.base().serialize_belongs_to(record, json, relationship);
            return Ok(());
        }

        let key = key_for_attribute(&relationship.name);
        let Some(related) = record.belongs_to(&relationship.name) else {
            json.insert(key, Value::Null);
            return Ok(());
        };

        let mut embedded = self.serialize_related(catalog, related)?;

        let parent_key = key_for_attribute(&record.type_key);
        embedded.remove(&key_for_relationship(&record.type_key, RelationshipKind::ToOne));
        embedded.remove(&parent_key);

        tracing::debug!(
            type_key = record.type_key.as_str(),
            relationship = relationship.name.as_str(),
            "embedding related record"
        );
        json.insert(key, Value::Object(embedded));
        Ok(())
    }

    /// Serialize a to-many relationship as inlined records, as a list of ids,
    /// or through the base serializer.
    pub fn serialize_has_many(
        &self,
        catalog: &dyn Catalog,
        record: &Record,
        json: &mut Map<String, Value>,
        relationship: &Relationship,
    ) -> Result<()> {
        let related = record.has_many(&relationship.name);

        match self.attrs().classify(&relationship.name) {
            Embedding::None => {
                self.base().serialize_has_many(catalog, record, json, relationship);
            }
            Embedding::Ids => {
                let key = key_for_relationship(&relationship.name, RelationshipKind::ToMany);
                let ids = related.iter().map(Record::id_value).collect();
                json.insert(key, Value::Array(ids));
            }
            Embedding::Inline => {
                let key = key_for_attribute(&relationship.name);
                let embedded = related
                    .iter()
                    .map(|related| self.serialize_related(catalog, related).map(Value::Object))
                    .collect::<Result<Vec<_>>>()?;

                tracing::debug!(
                    type_key = record.type_key.as_str(),
                    relationship = relationship.name.as_str(),
                    count = embedded.len(),
                    "embedding related records"
                );
                json.insert(key, Value::Array(embedded));
            }
        }

        Ok(())
    }

    /// Serialize a related record with its own serializer, carrying its id
    /// only when it has one
    fn serialize_related(&self, catalog: &dyn Catalog, related: &Record) -> Result<Map<String, Value>> {
        let mut data = catalog
            .serializer_for(&related.type_key)
            .serialize(catalog, related, SerializeOptions::default())?;

        let primary_key = self.base().primary_key().to_string();
        match related.id() {
            Some(id) => {
                data.insert(primary_key, Value::String(id.to_string()));
            }
            None => {
                data.remove(&primary_key);
            }
        }

        Ok(data)
    }
}
