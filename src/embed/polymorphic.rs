//! Type tags for polymorphic relationships
//!
//! Outbound, a polymorphic to-one reference is stamped with the capitalized
//! type key of the related record (`YellowMinion`). Inbound, reference objects
//! carry a `type` tag in any case convention (`yellow_minion`, `YellowMinion`)
//! which resolves back to the type key (`yellowMinion`). [`encode_type`] and
//! [`resolve_type`] are inverses for every type key.

use crate::naming::{capitalize, key_for_attribute, type_for_root};
use crate::record::Record;
use crate::schema::{Relationship, RelationshipKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key of the type tag inside an inbound reference object
pub const REFERENCE_TYPE_KEY: &str = "type";

/// Where the outbound type tag is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolymorphicTag {
    /// `<attribute>_type`, e.g. `evil_minion_type`
    #[default]
    Suffixed,
    /// A bare `_type` key
    Bare,
}

impl PolymorphicTag {
    pub fn tag_key(&self, relationship_name: &str) -> String {
        match self {
            PolymorphicTag::Suffixed => format!("{}_type", key_for_attribute(relationship_name)),
            PolymorphicTag::Bare => String::from("_type"),
        }
    }
}

/// Wire tag for a type key: `yellowMinion` -> `YellowMinion`
pub fn encode_type(type_key: &str) -> String {
    capitalize(type_key)
}

/// Type key for a wire tag: `yellow_minion` / `YellowMinion` -> `yellowMinion`
pub fn resolve_type(tag: &str) -> String {
    type_for_root(tag)
}

/// Write the type tag of `related` next to the reference key in `json`
pub fn stamp_type(
    json: &mut Map<String, Value>,
    relationship: &Relationship,
    related: &Record,
    style: PolymorphicTag,
) {
    json.insert(
        style.tag_key(&relationship.name),
        Value::String(encode_type(&related.type_key)),
    );
}

/// The resolved type of an inbound reference object, if it carries a tag
pub fn reference_type(reference: &Value) -> Option<String> {
    reference
        .get(REFERENCE_TYPE_KEY)
        .and_then(Value::as_str)
        .map(resolve_type)
}

/// The reference object(s) held by a polymorphic relationship value
pub fn references_mut(value: &mut Value, kind: RelationshipKind) -> Vec<&mut Map<String, Value>> {
    match (kind, value) {
        (RelationshipKind::ToOne, Value::Object(reference)) => vec![reference],
        (RelationshipKind::ToMany, Value::Array(references)) => {
            references.iter_mut().filter_map(Value::as_object_mut).collect()
        }
        _ => Vec::new(),
    }
}

/// Rewrite the type tag(s) of an inbound polymorphic reference in place.
/// References without a tag are left untouched.
pub fn rewrite_reference(value: &mut Value, kind: RelationshipKind) {
    for reference in references_mut(value, kind) {
        rewrite_tag(reference);
    }
}

fn rewrite_tag(reference: &mut Map<String, Value>) {
    if let Some(Value::String(tag)) = reference.get_mut(REFERENCE_TYPE_KEY) {
        *tag = resolve_type(tag);
    }
}

/// Build the `{type, <primary key>}` reference a de-embedded polymorphic
/// record leaves behind
pub fn reference_to(tag: Value, primary_key: &str, id: Value) -> Value {
    let mut reference = Map::new();
    reference.insert(REFERENCE_TYPE_KEY.to_string(), tag);
    reference.insert(primary_key.to_string(), id);
    Value::Object(reference)
}
