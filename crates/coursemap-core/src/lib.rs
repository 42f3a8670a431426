//! coursemap core - schema mapping descriptor and validator.
//!
//! Entities, fields, and relations are declared through [`SchemaBuilder`],
//! checked against the mapping rules, and resolved into an immutable
//! [`SchemaDescriptor`] that a persistence engine consumes to generate its
//! own schema.
//!
//! ```
//! use coursemap_core::{FieldDef, RelationDef, SchemaBuilder};
//!
//! let mut builder = SchemaBuilder::new();
//! builder.declare_entity("Course", [FieldDef::text("Title").required().with_max_length(255)])?;
//! builder.declare_entity("Tag", [FieldDef::text("Name")])?;
//! builder.declare_relationship(
//!     RelationDef::many_to_many("course_tags", "Course", "Tag").with_join_table("CourseTags"),
//! )?;
//!
//! let schema = builder.validate()?;
//! assert_eq!(schema.tables(), vec!["Course", "Tag", "CourseTags"]);
//! # Ok::<(), coursemap_core::Error>(())
//! ```

pub mod builder;
pub mod catalog;
pub mod convention;
pub mod course_catalog;
pub mod document;
pub mod error;
pub mod validator;

pub use builder::SchemaBuilder;
pub use catalog::{
    Cardinality, ColumnMapping, DefaultValue, DeleteBehavior, EntityDef, EntityMapping, FieldDef,
    ForeignKeyMapping, GeneratedOption, JoinTableMapping, JoinTableOverrides, LengthLimit,
    Principal, RelationDef, RelationMapping, ScalarType, SchemaDescriptor, TableName,
};
pub use course_catalog::{course_catalog, course_catalog_builder};
pub use document::SchemaDocument;
pub use error::{Error, Violation, Violations};
