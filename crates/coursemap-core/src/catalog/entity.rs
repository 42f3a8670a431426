//! Entity definitions.

use super::field::FieldDef;
use crate::convention;
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// An entity definition (table schema).
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct EntityDef {
    /// Entity name (unique within schema).
    pub name: String,
    /// Table override.
    #[serde(default)]
    pub table: Option<TableName>,
    /// Explicit primary key fields. Empty means the key follows convention.
    #[serde(default)]
    pub key: Vec<String>,
    /// Field definitions, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Table an entity is stored in.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct TableName {
    /// Table name.
    pub name: String,
    /// Database schema the table lives in.
    #[serde(default)]
    pub schema: Option<String>,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            key: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Add multiple fields.
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = FieldDef>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Store the entity in a differently named table.
    pub fn to_table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(TableName {
            name: name.into(),
            schema: None,
        });
        self
    }

    /// Store the entity in a table inside a database schema.
    pub fn to_table_in(mut self, name: impl Into<String>, schema: impl Into<String>) -> Self {
        self.table = Some(TableName {
            name: name.into(),
            schema: Some(schema.into()),
        });
        self
    }

    /// Set a single-field primary key.
    pub fn with_key(mut self, field: impl Into<String>) -> Self {
        self.key = vec![field.into()];
        self
    }

    /// Set a composite primary key.
    pub fn with_composite_key(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.key = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check if a field with this name is declared.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// Name of the table this entity maps to.
    pub fn table_name(&self) -> &str {
        self.table.as_ref().map_or(&self.name, |t| &t.name)
    }

    /// Fully qualified table name (`schema.table` when a schema is set).
    pub fn qualified_table_name(&self) -> String {
        match &self.table {
            Some(TableName {
                name,
                schema: Some(schema),
            }) => format!("{schema}.{name}"),
            _ => self.table_name().to_string(),
        }
    }

    /// Primary key fields, explicit or by convention.
    pub fn key_fields(&self) -> Vec<String> {
        if !self.key.is_empty() {
            return self.key.clone();
        }
        if self.has_field(convention::DEFAULT_KEY) {
            return vec![convention::DEFAULT_KEY.to_string()];
        }
        let typed = convention::key_column(&self.name);
        if self.has_field(&typed) {
            return vec![typed];
        }
        vec![convention::DEFAULT_KEY.to_string()]
    }
}
