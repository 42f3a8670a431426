//! Schema descriptor - validated snapshot of the entire mapping.

use super::{EntityDef, EntityMapping, RelationDef, RelationMapping};
use crate::error::Error;
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use std::collections::BTreeMap;

/// A validated, immutable description of every entity and relation.
///
/// Produced by [`SchemaBuilder::validate`](crate::SchemaBuilder::validate);
/// this is what a persistence engine consumes to generate its schema.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct SchemaDescriptor {
    /// Entity definitions keyed by name.
    pub entities: BTreeMap<String, EntityDef>,
    /// Relation definitions keyed by name.
    pub relations: BTreeMap<String, RelationDef>,
    /// Resolved table layout per entity.
    pub entity_mappings: BTreeMap<String, EntityMapping>,
    /// Resolved storage per relation.
    pub relation_mappings: BTreeMap<String, RelationMapping>,
}

impl SchemaDescriptor {
    /// Resolve mappings for declarations that already passed validation.
    pub(crate) fn resolve(
        entities: BTreeMap<String, EntityDef>,
        relations: BTreeMap<String, RelationDef>,
    ) -> Self {
        let entity_mappings = entities
            .iter()
            .map(|(name, entity)| (name.clone(), EntityMapping::resolve(entity)))
            .collect();
        let relation_mappings = relations
            .iter()
            .filter_map(|(name, relation)| {
                RelationMapping::resolve(relation, &entities).map(|m| (name.clone(), m))
            })
            .collect();

        Self {
            entities,
            relations,
            entity_mappings,
            relation_mappings,
        }
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Get a relation by name.
    pub fn get_relation(&self, name: &str) -> Option<&RelationDef> {
        self.relations.get(name)
    }

    /// Get the table layout of an entity.
    pub fn entity_mapping(&self, name: &str) -> Option<&EntityMapping> {
        self.entity_mappings.get(name)
    }

    /// Get the storage of a relation.
    pub fn relation_mapping(&self, name: &str) -> Option<&RelationMapping> {
        self.relation_mappings.get(name)
    }

    /// Get all relations for an entity (as source).
    pub fn relations_from(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|r| r.from_entity == entity)
            .collect()
    }

    /// Get all relations to an entity (as target).
    pub fn relations_to(&self, entity: &str) -> Vec<&RelationDef> {
        self.relations
            .values()
            .filter(|r| r.to_entity == entity)
            .collect()
    }

    /// List all entity names.
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(|s| s.as_str()).collect()
    }

    /// List every table the engine has to create, entity tables first.
    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = self
            .entity_mappings
            .values()
            .map(|m| m.table.clone())
            .collect();
        tables.extend(self.relation_mappings.values().filter_map(|m| match m {
            RelationMapping::JoinTable(join) => Some(join.table.clone()),
            RelationMapping::ForeignKey(_) => None,
        }));
        tables
    }

    /// Serialize the descriptor to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a descriptor from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }

    /// Serialize the descriptor to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
