//! Conventions applied when a mapping does not override a name or type.

use crate::catalog::{FieldDef, LengthLimit, ScalarType};

/// Conventional primary key field name.
pub const DEFAULT_KEY: &str = "Id";

/// Key column referencing an entity, e.g. `Course` becomes `CourseId`.
pub fn key_column(entity: &str) -> String {
    format!("{entity}{DEFAULT_KEY}")
}

/// Foreign key column on the dependent side of a relationship.
pub fn foreign_key(principal: &str) -> String {
    key_column(principal)
}

/// Join table for a many-to-many relationship, e.g. `CourseTags`.
pub fn join_table(source: &str, target: &str) -> String {
    format!("{source}{target}s")
}

/// Store column type for a field, honoring type and length overrides.
pub fn column_type(field: &FieldDef) -> String {
    let length = match field.max_length {
        Some(LengthLimit::Bounded(n)) => n.to_string(),
        Some(LengthLimit::Unbounded) | None => "max".to_string(),
    };

    if let Some(explicit) = &field.column_type {
        return if field.field_type.is_string_like() && !explicit.contains('(') {
            format!("{explicit}({length})")
        } else {
            explicit.clone()
        };
    }

    match &field.field_type {
        ScalarType::Bool => "bit".to_string(),
        ScalarType::Int32 => "int".to_string(),
        ScalarType::Int64 => "bigint".to_string(),
        ScalarType::Decimal { precision, scale } => format!("decimal({precision},{scale})"),
        ScalarType::String => format!("nvarchar({length})"),
        ScalarType::Bytes => format!("varbinary({length})"),
        ScalarType::Timestamp => "datetime2".to_string(),
        ScalarType::Uuid => "uniqueidentifier".to_string(),
    }
}
