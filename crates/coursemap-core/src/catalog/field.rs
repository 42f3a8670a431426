//! Field definitions for entities.

use super::types::{GeneratedOption, LengthLimit, ScalarType};
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// A field definition within an entity.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Field data type.
    pub field_type: ScalarType,
    /// Whether the field is required (non-nullable column).
    #[serde(default)]
    pub required: bool,
    /// Maximum length for text and binary columns.
    #[serde(default)]
    pub max_length: Option<LengthLimit>,
    /// Column name override.
    #[serde(default)]
    pub column_name: Option<String>,
    /// Store-specific column type override, e.g. `varchar`.
    #[serde(default)]
    pub column_type: Option<String>,
    /// Position of the column within its table.
    #[serde(default)]
    pub column_order: Option<u32>,
    /// Value generation strategy.
    #[serde(default)]
    pub generated: GeneratedOption,
    /// Default value if not provided.
    #[serde(default)]
    pub default: Option<DefaultValue>,
}

/// Default value for a field.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// String value.
    String(String),
    /// Current timestamp (evaluated at insert time).
    CurrentTimestamp,
    /// Auto-generated UUID.
    AutoUuid,
}

impl FieldDef {
    /// Create a new optional field.
    pub fn new(name: impl Into<String>, field_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            max_length: None,
            column_name: None,
            column_type: None,
            column_order: None,
            generated: GeneratedOption::None,
            default: None,
        }
    }

    /// Create an optional string field.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::String)
    }

    /// Create a required integer key field generated by the engine.
    pub fn identity(name: impl Into<String>) -> Self {
        Self::new(name, ScalarType::Int32)
            .required()
            .with_generated(GeneratedOption::Identity)
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Limit the length of the column.
    pub fn with_max_length(mut self, length: i64) -> Self {
        self.max_length = Some(LengthLimit::Bounded(length));
        self
    }

    /// Use the largest length the engine supports.
    pub fn with_unbounded_length(mut self) -> Self {
        self.max_length = Some(LengthLimit::Unbounded);
        self
    }

    /// Override the column name.
    pub fn with_column_name(mut self, column: impl Into<String>) -> Self {
        self.column_name = Some(column.into());
        self
    }

    /// Override the column type.
    pub fn with_column_type(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = Some(column_type.into());
        self
    }

    /// Set the column position.
    pub fn with_column_order(mut self, order: u32) -> Self {
        self.column_order = Some(order);
        self
    }

    /// Set the value generation strategy.
    pub fn with_generated(mut self, generated: GeneratedOption) -> Self {
        self.generated = generated;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Name of the column this field maps to.
    pub fn column(&self) -> &str {
        self.column_name.as_deref().unwrap_or(&self.name)
    }

    /// Check if the default would store an absent or empty value.
    pub fn defaults_to_empty(&self) -> bool {
        match &self.default {
            Some(DefaultValue::Null) => true,
            Some(DefaultValue::String(s)) => s.is_empty(),
            _ => false,
        }
    }
}
