//! Key derivation between the camelCase model side and the underscored wire side
//!
//! Every function here is pure. Embedded and plain relationships go through the
//! same rules, so a payload written by one serializer reads back through another.

use crate::naming::inflector::{camelize, decamelize, pluralize, singularize};
use crate::schema::RelationshipKind;

/// Wire key for a model attribute: `firstName` -> `first_name`
pub fn key_for_attribute(attribute: &str) -> String {
    decamelize(attribute)
}

/// Model attribute for a wire key: `first_name` -> `firstName`
pub fn attribute_for_key(key: &str) -> String {
    camelize(key)
}

/// Wire key holding a relationship reference.
///
/// `homePlanet` (to-one) -> `home_planet_id`, `evilMinions` (to-many) -> `evil_minion_ids`
pub fn key_for_relationship(name: &str, kind: RelationshipKind) -> String {
    let key = decamelize(name);
    match kind {
        RelationshipKind::ToOne => format!("{}_id", key),
        RelationshipKind::ToMany => format!("{}_ids", singularize(&key)),
    }
}

/// Root key a single record is wrapped under when serialized: `superVillain` -> `super_villain`
pub fn root_for_type(type_key: &str) -> String {
    decamelize(type_key)
}

/// Root key a list of records is wrapped under: `superVillain` -> `super_villains`
pub fn plural_root_for_type(type_key: &str) -> String {
    pluralize(&root_for_type(type_key))
}

/// Type key for a payload root, in either number or convention:
/// `super_villains` -> `superVillain`, `_comments` -> `comment`
pub fn type_for_root(root: &str) -> String {
    singularize(&camelize(root))
}

/// Wire name of the collection records of a type are side-loaded into:
/// `secretLab` -> `secret_labs`
pub fn collection_key(type_key: &str) -> String {
    decamelize(&pluralize(type_key))
}

/// Model-side name of a side-loaded collection: `secretLab` -> `secretLabs`
pub fn collection_name(type_key: &str) -> String {
    pluralize(type_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_keys() {
        assert_eq!(key_for_relationship("homePlanet", RelationshipKind::ToOne), "home_planet_id");
        assert_eq!(key_for_relationship("evilMinions", RelationshipKind::ToMany), "evil_minion_ids");
        assert_eq!(key_for_relationship("children", RelationshipKind::ToMany), "child_ids");
    }

    #[test]
    fn test_root_keys_round_trip() {
        assert_eq!(root_for_type("superVillain"), "super_villain");
        assert_eq!(plural_root_for_type("superVillain"), "super_villains");
        assert_eq!(type_for_root("super_villain"), "superVillain");
        assert_eq!(type_for_root("super_villains"), "superVillain");
        assert_eq!(type_for_root(&plural_root_for_type("famousPerson")), "famousPerson");
    }

    #[test]
    fn test_collection_keys() {
        assert_eq!(collection_key("secretLab"), "secret_labs");
        assert_eq!(collection_key("comment"), "comments");
        assert_eq!(collection_name("secretLab"), "secretLabs");
        assert_eq!(type_for_root(&format!("_{}", collection_key("evilMinion"))), "evilMinion");
    }

    #[test]
    fn test_attribute_keys() {
        assert_eq!(key_for_attribute("minionCapacity"), "minion_capacity");
        assert_eq!(attribute_for_key("minion_capacity"), "minionCapacity");
    }
}
