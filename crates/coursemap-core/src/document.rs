//! JSON schema documents.
//!
//! A document lists entities and relationships in the same shape as
//! [`EntityDef`] and [`RelationDef`]:
//!
//! ```json
//! {
//!   "entities": [
//!     { "name": "Course", "fields": [
//!       { "name": "Title", "field_type": "string", "required": true,
//!         "max_length": { "bounded": 255 } }
//!     ] }
//!   ],
//!   "relationships": []
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::SchemaBuilder;
use crate::catalog::{EntityDef, RelationDef, SchemaDescriptor};
use crate::error::Error;

/// Declarations loaded from, or written to, a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Entities, declared in order.
    #[serde(default)]
    pub entities: Vec<EntityDef>,
    /// Relationships, declared after every entity.
    #[serde(default)]
    pub relationships: Vec<RelationDef>,
}

impl SchemaDocument {
    /// Parse a document.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Recover the declarations behind a validated descriptor.
    pub fn from_descriptor(schema: &SchemaDescriptor) -> Self {
        Self {
            entities: schema.entities.values().cloned().collect(),
            relationships: schema.relations.values().cloned().collect(),
        }
    }

    /// Replay every declaration into a new builder.
    ///
    /// Declaration errors are not fatal here: they are kept by the builder
    /// and reported together by [`SchemaBuilder::validate`].
    pub fn into_builder(self) -> SchemaBuilder {
        let mut builder = SchemaBuilder::new();
        for entity in self.entities {
            if let Err(violation) = builder.declare(entity) {
                debug!(%violation, "document entity is invalid");
            }
        }
        for relation in self.relationships {
            if let Err(violation) = builder.declare_relationship(relation) {
                debug!(%violation, "document relationship is invalid");
            }
        }
        builder
    }
}
