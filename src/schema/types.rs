use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinality of a relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    #[serde(rename = "belongsTo", alias = "toOne", alias = "to-one")]
    ToOne,
    #[serde(rename = "hasMany", alias = "toMany", alias = "to-many")]
    ToMany,
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipKind::ToOne => f.write_str("belongsTo"),
            RelationshipKind::ToMany => f.write_str("hasMany"),
        }
    }
}

/// A named link from one type to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Attribute name on the owning type, e.g. "secretLab"
    pub name: String,

    pub kind: RelationshipKind,

    /// Type key of the related type, e.g. "secretLab"
    #[serde(rename = "type")]
    pub target: String,

    /// Concrete related type varies per record and travels as a type tag
    #[serde(default)]
    pub polymorphic: bool,

    /// Name of the relationship on the target type pointing back here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<String>,
}

impl Relationship {
    pub fn new(name: impl Into<String>, kind: RelationshipKind, target: impl Into<String>) -> Self {
        Relationship {
            name: name.into(),
            kind,
            target: target.into(),
            polymorphic: false,
            inverse: None,
        }
    }

    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::ToOne, target)
    }

    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, RelationshipKind::ToMany, target)
    }

    pub fn polymorphic(mut self) -> Self {
        self.polymorphic = true;
        self
    }

    pub fn with_inverse(mut self, inverse: impl Into<String>) -> Self {
        self.inverse = Some(inverse.into());
        self
    }
}

/// Describes a model type: its attributes and its ordered relationships
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeDescriptor {
    /// Type key, e.g. "superVillain"
    pub type_key: String,

    /// Declared attribute names (camelCase)
    pub attributes: Vec<String>,

    /// Relationships in declaration order
    pub relationships: Vec<Relationship>,
}

impl TypeDescriptor {
    pub fn new(type_key: impl Into<String>) -> Self {
        TypeDescriptor {
            type_key: type_key.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes.extend(attributes.into_iter().map(Into::into));
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }
}
