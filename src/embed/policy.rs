//! Per-relationship embedding directives
//!
//! A serializer declares which of its relationships travel embedded, using the
//! wire form `{"comments": {"embedded": "always"}}`. Directives are parsed once
//! when the configuration is built; lookups afterwards are pure.

use crate::naming::camelize;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// How a relationship is represented inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Embedding {
    /// Plain reference keys, handled by the default serializer
    #[default]
    None,
    /// Full related records inlined (`always`, or `load` on the way in)
    Inline,
    /// Related ids inlined as a list (to-many only)
    Ids,
}

impl Embedding {
    /// Parse a directive. Anything unrecognized means "not embedded".
    pub fn from_directive(directive: &str) -> Self {
        match directive {
            "always" | "load" => Embedding::Inline,
            "ids" => Embedding::Ids,
            _ => Embedding::None,
        }
    }
}

/// Raw per-attribute options as written in a serializer definition
#[derive(Debug, Clone, Default, Deserialize)]
struct AttributeOptions {
    #[serde(default)]
    embedded: Option<String>,
}

/// Mapping from relationship name to its embedding directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbeddingConfig {
    directives: HashMap<String, Embedding>,
}

impl EmbeddingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare how `attribute` is embedded. Names are stored camelized so
    /// `secret_lab` and `secretLab` configure the same relationship.
    pub fn with(mut self, attribute: &str, embedding: Embedding) -> Self {
        self.set(attribute, embedding);
        self
    }

    pub fn set(&mut self, attribute: &str, embedding: Embedding) {
        self.directives.insert(camelize(attribute), embedding);
    }

    /// Build from `(attribute, directive)` pairs
    pub fn from_directives<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::new();
        for (attribute, directive) in pairs {
            let attribute = attribute.as_ref();
            let directive = directive.as_ref();
            let embedding = Embedding::from_directive(directive);
            if embedding == Embedding::None && !directive.is_empty() {
                tracing::warn!(attribute, directive, "unrecognized embedding directive, treating as not embedded");
            }
            config.set(attribute, embedding);
        }
        config
    }

    /// Classify a relationship by attribute name
    pub fn classify(&self, attribute: &str) -> Embedding {
        if let Some(embedding) = self.directives.get(attribute) {
            return *embedding;
        }
        self.directives
            .get(&camelize(attribute))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_inline(&self, attribute: &str) -> bool {
        self.classify(attribute) == Embedding::Inline
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

impl<'de> Deserialize<'de> for EmbeddingConfig {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: HashMap<String, AttributeOptions> = HashMap::deserialize(deserializer)?;
        let pairs = raw
            .into_iter()
            .map(|(attribute, options)| (attribute, options.embedded.unwrap_or_default()));
        Ok(Self::from_directives(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_directives() {
        assert_eq!(Embedding::from_directive("always"), Embedding::Inline);
        assert_eq!(Embedding::from_directive("load"), Embedding::Inline);
        assert_eq!(Embedding::from_directive("ids"), Embedding::Ids);
        assert_eq!(Embedding::from_directive("lazy"), Embedding::None);
    }

    #[test]
    fn test_absent_attribute_is_not_embedded() {
        let config = EmbeddingConfig::new().with("comments", Embedding::Inline);
        assert_eq!(config.classify("author"), Embedding::None);
        assert_eq!(config.classify("comments"), Embedding::Inline);
    }

    #[test]
    fn test_lookup_ignores_case_convention() {
        let config = EmbeddingConfig::new().with("secret_lab", Embedding::Inline);
        assert!(config.is_inline("secretLab"));
        assert!(config.is_inline("secret_lab"));
    }

    #[test]
    fn test_deserialize_wire_form() {
        let config: EmbeddingConfig = serde_json::from_value(json!({
            "secretLab": {"embedded": "always"},
            "evilMinions": {"embedded": "ids"},
            "homePlanet": {"embedded": "sometimes"},
            "comments": {}
        }))
        .unwrap();

        assert_eq!(config.classify("secretLab"), Embedding::Inline);
        assert_eq!(config.classify("evilMinions"), Embedding::Ids);
        assert_eq!(config.classify("homePlanet"), Embedding::None);
        assert_eq!(config.classify("comments"), Embedding::None);
    }
}
