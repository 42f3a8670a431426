//! Mapping catalog.
//!
//! The catalog holds metadata about entities, fields, relations, and the
//! table layout they resolve to.

mod entity;
mod field;
mod mapping;
mod relation;
mod schema;
mod types;

pub use entity::{EntityDef, TableName};
pub use field::{DefaultValue, FieldDef};
pub use mapping::{
    ColumnMapping, EntityMapping, ForeignKeyMapping, JoinTableMapping, RelationMapping,
};
pub use relation::{Cardinality, DeleteBehavior, JoinTableOverrides, Principal, RelationDef};
pub use schema::SchemaDescriptor;
pub use types::{GeneratedOption, LengthLimit, ScalarType};
