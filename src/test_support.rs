//! Fixture schema shared by the unit tests

use crate::config::TransformConfig;
use crate::embed::{Embedding, EmbeddingConfig};
use crate::schema::{Catalog, Relationship, Schema, TypeDescriptor};

pub fn fixture_schema() -> Schema {
    fixture_schema_with(TransformConfig::default())
}

pub fn fixture_schema_with(config: TransformConfig) -> Schema {
    Schema::new(config)
        .with_model(
            TypeDescriptor::new("superVillain")
                .with_attributes(["firstName", "lastName"])
                .with_relationship(Relationship::belongs_to("homePlanet", "homePlanet"))
                .with_relationship(Relationship::belongs_to("secretLab", "secretLab"))
                .with_relationship(
                    Relationship::has_many("evilMinions", "evilMinion").with_inverse("superVillain"),
                ),
        )
        .with_model(
            TypeDescriptor::new("homePlanet")
                .with_attributes(["name"])
                .with_relationship(
                    Relationship::has_many("superVillains", "superVillain").with_inverse("homePlanet"),
                ),
        )
        .with_model(
            TypeDescriptor::new("secretLab")
                .with_attributes(["minionCapacity", "vicinity"])
                .with_relationship(Relationship::belongs_to("superVillain", "superVillain")),
        )
        .with_model(
            TypeDescriptor::new("evilMinion")
                .with_attributes(["name"])
                .with_relationship(Relationship::belongs_to("superVillain", "superVillain")),
        )
        .with_model(
            TypeDescriptor::new("yellowMinion")
                .with_attributes(["name"])
                .with_relationship(Relationship::belongs_to("superVillain", "superVillain")),
        )
        .with_model(
            TypeDescriptor::new("doomsdayDevice")
                .with_attributes(["name"])
                .with_relationship(Relationship::belongs_to("evilMinion", "evilMinion").polymorphic()),
        )
        .with_model(
            TypeDescriptor::new("mediocreVillain")
                .with_attributes(["name"])
                .with_relationship(Relationship::has_many("evilMinions", "evilMinion").polymorphic()),
        )
        .with_model(
            TypeDescriptor::new("post")
                .with_attributes(["title"])
                .with_relationship(Relationship::has_many("comments", "comment")),
        )
        .with_model(
            TypeDescriptor::new("comment")
                .with_attributes(["body", "root"])
                .with_relationship(Relationship::has_many("children", "comment")),
        )
        .with_serializer(
            "superVillain",
            EmbeddingConfig::new()
                .with("secretLab", Embedding::Inline)
                .with("evilMinions", Embedding::Ids),
        )
        .with_serializer("post", EmbeddingConfig::new().with("comments", Embedding::Inline))
        .with_serializer("comment", EmbeddingConfig::new().with("children", Embedding::Inline))
        .with_serializer(
            "mediocreVillain",
            EmbeddingConfig::new().with("evilMinions", Embedding::Inline),
        )
}

pub trait FixtureExt {
    fn model(&self, type_key: &str) -> &TypeDescriptor;
}

impl FixtureExt for Schema {
    fn model(&self, type_key: &str) -> &TypeDescriptor {
        self.model_for(type_key)
            .unwrap_or_else(|| panic!("fixture declares no `{type_key}` type"))
    }
}
