//! # Sideload - embedded and side-loaded JSON payloads
//!
//! Converts relational JSON payloads between two wire shapes:
//!
//! - **embedded**: related records inlined inside their parent
//! - **side-loaded**: every record type flattened into its own top-level
//!   collection, cross-referenced by id
//!
//! Which relationships are embedded, and how, is configured per type on an
//! [`EmbeddedSerializer`]; model types come from a [`Catalog`].
//!
//! ## Modules
//!
//! - **naming**: camelCase / underscored key conventions and inflection
//! - **schema**: type descriptors and the in-memory [`Schema`] catalog
//! - **embed**: the embedding policy and both transforms
//! - **serializer**: default (non-embedded) behaviour and the extracted [`Document`]
//! - **adapter**: URL paths and error responses of an underscored REST API
//!
//! ## Quick Start
//!
//! ```rust
//! use sideload::{Embedding, EmbeddingConfig, Relationship, Schema, TypeDescriptor};
//! use serde_json::json;
//!
//! # fn main() -> sideload::Result<()> {
//! let schema = Schema::default()
//!     .with_model(
//!         TypeDescriptor::new("superVillain")
//!             .with_relationship(Relationship::belongs_to("secretLab", "secretLab")),
//!     )
//!     .with_model(
//!         TypeDescriptor::new("secretLab")
//!             .with_attributes(["minionCapacity"])
//!             .with_relationship(Relationship::belongs_to("superVillain", "superVillain")),
//!     )
//!     .with_serializer("superVillain", EmbeddingConfig::new().with("secretLab", Embedding::Inline));
//!
//! let mut payload = json!({
//!     "super_villain": {"id": "1", "secret_lab": {"id": "101", "minion_capacity": 5000}}
//! });
//! let document = schema.extract_single("superVillain", &mut payload)?;
//!
//! assert_eq!(document.primary, json!({"id": "1", "secretLab": "101"}));
//! assert_eq!(document.sideloaded_of("secretLab")[0]["superVillain"], "1");
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result as AnyResult};
use serde_json::Value;
use std::io::Read;

pub mod adapter;
pub mod config;
pub mod embed;
pub mod error;
pub mod naming;
pub mod record;
pub mod schema;
pub mod serializer;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use adapter::{AdapterError, RestAdapter, TransportError, ValidationErrors};
pub use config::{SchemaDocument, TransformConfig};
pub use embed::{EmbeddedSerializer, Embedding, EmbeddingConfig, PolymorphicTag};
pub use error::{Error, Result};
pub use record::{Record, RelationshipValue};
pub use schema::{Catalog, Relationship, RelationshipKind, Schema, TypeDescriptor};
pub use serializer::document::Shape;
pub use serializer::{BaseSerializer, Document, SerializeOptions, UnderscoredSerializer};

/// Main entry point: read a wire payload and extract it into a [`Document`]
pub fn extract_reader<R: Read>(
    mut reader: R,
    schema: &Schema,
    type_key: &str,
    shape: Shape,
) -> AnyResult<Document> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .context("Failed to read payload")?;

    let mut payload = parse_payload(&content)?;

    let document = match shape {
        Shape::Single => schema.extract_single(type_key, &mut payload),
        Shape::Many => schema.extract_array(type_key, &mut payload),
    }
    .with_context(|| format!("Failed to extract `{type_key}` payload"))?;

    Ok(document)
}

/// Parse payload bytes, falling back to serde_json when SIMD parsing fails
pub fn parse_payload(content: &[u8]) -> AnyResult<Value> {
    // simd-json parses in place, so keep the original bytes for the fallback
    let mut buffer = content.to_vec();
    match simd_json::serde::from_slice::<Value>(&mut buffer) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_slice(content).context("Failed to parse JSON"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_schema;
    use serde_json::json;

    #[test]
    fn test_extract_reader() {
        let schema = fixture_schema();
        let input = r#"{"super_villains": [{"id": "1", "secret_lab": {"id": "101"}}]}"#;

        let document = extract_reader(input.as_bytes(), &schema, "superVillain", Shape::Many).unwrap();

        assert_eq!(document.primary, json!([{"id": "1", "secretLab": "101"}]));
        assert_eq!(document.sideloaded_of("secretLab").len(), 1);
    }

    #[test]
    fn test_parse_payload() {
        let value = parse_payload(br#"{"secret_lab": {"id": "101", "minion_capacity": 5000, "vicinity": null}}"#).unwrap();
        assert_eq!(
            value,
            json!({"secret_lab": {"id": "101", "minion_capacity": 5000, "vicinity": null}})
        );
    }

    #[test]
    fn test_extract_reader_rejects_bad_json() {
        let schema = fixture_schema();
        let result = extract_reader("{not json".as_bytes(), &schema, "superVillain", Shape::Single);
        assert!(result.is_err());
    }
}
