//! Model metadata: types, relationships and the catalog that serves them

pub mod catalog;
pub mod types;

pub use catalog::{Catalog, Schema};
pub use types::{Relationship, RelationshipKind, TypeDescriptor};
