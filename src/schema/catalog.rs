//! Access to model types and their serializers
//!
//! The transforms never own model metadata. They ask a [`Catalog`] for a type's
//! descriptor and for the serializer responsible for it; [`Schema`] is the
//! in-memory catalog used by the library entry points and the CLI.

use crate::config::{SchemaDocument, TransformConfig};
use crate::embed::{EmbeddedSerializer, EmbeddingConfig};
use crate::error::{Error, Result};
use crate::record::Record;
use crate::schema::TypeDescriptor;
use crate::serializer::{Document, SerializeOptions, UnderscoredSerializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// What the transforms need from the model layer
pub trait Catalog {
    /// Descriptor for a type key
    fn model_for(&self, type_key: &str) -> Option<&TypeDescriptor>;

    /// Serializer responsible for a type key, falling back to a default
    fn serializer_for(&self, type_key: &str) -> &EmbeddedSerializer;
}

/// In-memory catalog of model types and per-type serializers
#[derive(Debug, Clone)]
pub struct Schema {
    config: TransformConfig,
    models: HashMap<String, TypeDescriptor>,
    serializers: HashMap<String, EmbeddedSerializer>,
    default_serializer: EmbeddedSerializer,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new(TransformConfig::default())
    }
}

impl Schema {
    pub fn new(config: TransformConfig) -> Self {
        let default_serializer = EmbeddedSerializer::new(Arc::new(UnderscoredSerializer::new(config.clone())));
        Schema {
            config,
            models: HashMap::new(),
            serializers: HashMap::new(),
            default_serializer,
        }
    }

    /// Build from a parsed [`SchemaDocument`], validating relationship targets
    pub fn from_document(document: SchemaDocument) -> Result<Self> {
        let mut schema = Schema::new(document.options);

        for (type_key, definition) in document.types {
            let mut model = TypeDescriptor::new(type_key).with_attributes(definition.attributes);
            model.relationships = definition.relationships;
            schema = schema.with_model(model);
        }

        for (type_key, definition) in document.serializers {
            schema = schema.with_serializer(&type_key, definition.attrs);
        }

        schema.validate()?;
        Ok(schema)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let document: SchemaDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    pub fn with_model(mut self, model: TypeDescriptor) -> Self {
        self.models.insert(model.type_key.clone(), model);
        self
    }

    /// Register a serializer for `type_key` using the default base behaviour
    pub fn with_serializer(self, type_key: &str, attrs: EmbeddingConfig) -> Self {
        let serializer = self.default_serializer.clone().with_attrs(attrs);
        self.with_custom_serializer(type_key, serializer)
    }

    pub fn with_custom_serializer(mut self, type_key: &str, serializer: EmbeddedSerializer) -> Self {
        self.serializers.insert(type_key.to_string(), serializer);
        self
    }

    /// Every relationship must point at a declared type
    pub fn validate(&self) -> Result<()> {
        for model in self.models.values() {
            for relationship in &model.relationships {
                if !self.models.contains_key(&relationship.target) {
                    return Err(Error::UnknownType(relationship.target.clone()));
                }
            }
        }

        for type_key in self.serializers.keys() {
            if !self.models.contains_key(type_key) {
                tracing::warn!(type_key = type_key.as_str(), "serializer registered for an undeclared type");
            }
        }

        Ok(())
    }

    /// Serialize `record` with the serializer registered for its type
    pub fn serialize(&self, record: &Record, options: SerializeOptions) -> Result<Map<String, Value>> {
        self.serializer_for(&record.type_key)
            .serialize(self, record, options)
    }

    /// Serialize `record` wrapped under its root key
    pub fn serialize_into_hash(&self, record: &Record, options: SerializeOptions) -> Result<Map<String, Value>> {
        self.serializer_for(&record.type_key)
            .serialize_into_hash(self, record, options)
    }

    /// Extract a payload holding a single primary record of `type_key`
    pub fn extract_single(&self, type_key: &str, payload: &mut Value) -> Result<Document> {
        self.serializer_for(type_key)
            .extract_single(self, type_key, payload)
    }

    /// Extract a payload holding a list of primary records of `type_key`
    pub fn extract_array(&self, type_key: &str, payload: &mut Value) -> Result<Document> {
        self.serializer_for(type_key)
            .extract_array(self, type_key, payload)
    }
}

impl Catalog for Schema {
    fn model_for(&self, type_key: &str) -> Option<&TypeDescriptor> {
        self.models.get(type_key)
    }

    fn serializer_for(&self, type_key: &str) -> &EmbeddedSerializer {
        self.serializers
            .get(type_key)
            .unwrap_or(&self.default_serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::Embedding;
    use crate::schema::Relationship;

    #[test]
    fn test_unregistered_type_gets_default_serializer() {
        let schema = Schema::default()
            .with_model(TypeDescriptor::new("post"))
            .with_serializer("post", EmbeddingConfig::new().with("comments", Embedding::Inline));

        assert!(schema.serializer_for("post").attrs().is_inline("comments"));
        assert!(schema.serializer_for("comment").attrs().is_empty());
    }

    #[test]
    fn test_validate_rejects_unknown_target() {
        let schema = Schema::default().with_model(
            TypeDescriptor::new("post").with_relationship(Relationship::has_many("comments", "comment")),
        );

        assert!(matches!(schema.validate(), Err(Error::UnknownType(t)) if t == "comment"));
    }

    #[test]
    fn test_from_json() {
        let schema = Schema::from_json(
            r#"{
                "types": {
                    "post": {"relationships": [{"name": "comments", "kind": "hasMany", "type": "comment"}]},
                    "comment": {"attributes": ["body"]}
                },
                "serializers": {"post": {"attrs": {"comments": {"embedded": "always"}}}},
                "options": {"sideloadPrefix": "__"}
            }"#,
        )
        .unwrap();

        assert_eq!(schema.config().sideload_prefix, "__");
        assert_eq!(schema.model_for("comment").unwrap().attributes, vec!["body"]);
        assert!(schema.serializer_for("post").attrs().is_inline("comments"));
    }
}
