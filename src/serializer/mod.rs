//! Default serializer behaviour and the normalized extraction result

pub mod base;
pub mod document;

pub use base::{BaseSerializer, UnderscoredSerializer};
pub use document::Document;

/// Options for serializing a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerializeOptions {
    /// Write the record's own identifier into the output
    pub include_id: bool,
}

impl SerializeOptions {
    pub fn with_id() -> Self {
        SerializeOptions { include_id: true }
    }
}
