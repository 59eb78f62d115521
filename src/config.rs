use crate::embed::{EmbeddingConfig, PolymorphicTag};
use crate::schema::Relationship;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration shared by the outbound and inbound transforms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformConfig {
    /// Payload key holding record identifiers
    pub primary_key: String,

    /// Where polymorphic type tags are written on the way out
    pub polymorphic_tag: PolymorphicTag,

    /// Marker prefix for to-many side-load collections. Roots carrying it are
    /// never treated as the primary data, which keeps self-referential
    /// embedding (comment trees) apart from the primary records.
    pub sideload_prefix: String,

    /// Maximum nesting depth of embedded records on the way in
    pub max_depth: usize,
}

impl Default for TransformConfig {
    fn default() -> Self {
        TransformConfig {
            primary_key: String::from("id"),
            polymorphic_tag: PolymorphicTag::Suffixed,
            sideload_prefix: String::from("_"),
            max_depth: 32,
        }
    }
}

/// Declaration of one model type inside a [`SchemaDocument`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeDefinition {
    pub attributes: Vec<String>,
    pub relationships: Vec<Relationship>,
}

/// Declaration of one per-type serializer inside a [`SchemaDocument`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SerializerDefinition {
    pub attrs: EmbeddingConfig,
}

/// Serde form of a complete schema: model types, serializers and options
///
/// ```json
/// {
///   "types": {
///     "superVillain": {
///       "attributes": ["firstName"],
///       "relationships": [{"name": "secretLab", "kind": "belongsTo", "type": "secretLab"}]
///     },
///     "secretLab": {"attributes": ["minionCapacity"]}
///   },
///   "serializers": {
///     "superVillain": {"attrs": {"secretLab": {"embedded": "always"}}}
///   },
///   "options": {"polymorphicTag": "bare"}
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaDocument {
    pub types: BTreeMap<String, TypeDefinition>,
    pub serializers: BTreeMap<String, SerializerDefinition>,
    pub options: TransformConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::Embedding;
    use crate::schema::RelationshipKind;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = TransformConfig::default();
        assert_eq!(config.primary_key, "id");
        assert_eq!(config.sideload_prefix, "_");
        assert_eq!(config.polymorphic_tag, PolymorphicTag::Suffixed);
    }

    #[test]
    fn test_partial_options_keep_defaults() {
        let config: TransformConfig =
            serde_json::from_value(json!({"polymorphicTag": "bare", "maxDepth": 4})).unwrap();
        assert_eq!(config.polymorphic_tag, PolymorphicTag::Bare);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.primary_key, "id");
    }

    #[test]
    fn test_schema_document() {
        let document: SchemaDocument = serde_json::from_value(json!({
            "types": {
                "comment": {
                    "attributes": ["body"],
                    "relationships": [{"name": "children", "kind": "hasMany", "type": "comment"}]
                }
            },
            "serializers": {
                "comment": {"attrs": {"children": {"embedded": "always"}}}
            }
        }))
        .unwrap();

        let comment = &document.types["comment"];
        assert_eq!(comment.relationships[0].kind, RelationshipKind::ToMany);
        assert!(!comment.relationships[0].polymorphic);
        assert_eq!(
            document.serializers["comment"].attrs.classify("children"),
            Embedding::Inline
        );
    }
}
