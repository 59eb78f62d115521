//! Naming conventions shared by every transform
//!
//! Converts between the camelCase names models use and the underscored,
//! pluralized names found on the wire.

pub mod inflector;
pub mod keys;

pub use inflector::{camelize, capitalize, decamelize, pluralize, singularize};
pub use keys::{
    attribute_for_key, collection_key, collection_name, key_for_attribute, key_for_relationship,
    plural_root_for_type, root_for_type, type_for_root,
};
