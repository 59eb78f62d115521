//! Embedded record support
//!
//! [`EmbeddedSerializer`] wraps a [`BaseSerializer`] and, per relationship,
//! either delegates to it or handles the relationship as embedded:
//!
//! - **serialize**: related records are inlined into the parent
//!   (`"secret_lab": {"id": "101", ...}`) or listed by id
//! - **extract**: inlined records are pulled out of their parent into
//!   side-load collections and replaced by references
//!
//! ```json
//! {"super_villain": {"id": "1", "secret_lab": {"id": "101", "minion_capacity": 5000}}}
//! ```
//!
//! extracts to
//!
//! ```json
//! {"super_villain": {"id": "1", "secret_lab_id": "101"},
//!  "secret_labs": [{"id": "101", "minion_capacity": 5000, "super_villain_id": "1"}]}
//! ```
//!
//! before being normalized into a [`Document`](crate::serializer::Document).

pub mod extract;
pub mod policy;
pub mod polymorphic;
pub mod serialize;

pub use policy::{Embedding, EmbeddingConfig};
pub use polymorphic::PolymorphicTag;

use crate::config::TransformConfig;
use crate::serializer::BaseSerializer;
use std::sync::Arc;

/// Embedding-aware serializer for one type
#[derive(Debug, Clone)]
pub struct EmbeddedSerializer {
    base: Arc<dyn BaseSerializer>,
    attrs: EmbeddingConfig,
}

impl EmbeddedSerializer {
    pub fn new(base: Arc<dyn BaseSerializer>) -> Self {
        EmbeddedSerializer {
            base,
            attrs: EmbeddingConfig::default(),
        }
    }

    pub fn with_attrs(mut self, attrs: EmbeddingConfig) -> Self {
        self.attrs = attrs;
        self
    }

    /// The default behaviour non-embedded relationships fall back to
    pub fn base(&self) -> &dyn BaseSerializer {
        self.base.as_ref()
    }

    pub fn attrs(&self) -> &EmbeddingConfig {
        &self.attrs
    }

    pub fn config(&self) -> &TransformConfig {
        self.base.config()
    }
}
