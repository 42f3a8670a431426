//! Schema builder.
//!
//! Declarations fail fast: each `declare_*` call returns the first problem
//! with the declaration right away. [`SchemaBuilder::validate`] is exhaustive
//! and reports every problem in the schema at once, including declarations
//! that were refused earlier, checked against the final set of entities.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::catalog::{EntityDef, FieldDef, RelationDef, SchemaDescriptor};
use crate::error::{Violation, Violations};
use crate::validator;

/// Collects entity and relation declarations and validates them.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    entities: BTreeMap<String, EntityDef>,
    relations: BTreeMap<String, RelationDef>,
    /// Entities refused because the name was already declared.
    duplicate_entities: Vec<EntityDef>,
    /// Relations refused because the name was already declared.
    duplicate_relations: Vec<RelationDef>,
}

impl SchemaBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity with the given fields.
    pub fn declare_entity(
        &mut self,
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDef>,
    ) -> Result<(), Violation> {
        self.declare(EntityDef::new(name).with_fields(fields))
    }

    /// Declare a fully configured entity.
    ///
    /// A duplicate name is refused and the entity is not registered. Any
    /// other problem is returned immediately, but the entity stays
    /// registered so relations can still reference it.
    pub fn declare(&mut self, entity: EntityDef) -> Result<(), Violation> {
        if self.entities.contains_key(&entity.name) {
            let violation = Violation::DuplicateEntity {
                entity: entity.name.clone(),
            };
            warn!(%violation, "entity declaration rejected");
            self.duplicate_entities.push(entity);
            return Err(violation);
        }

        let first = validator::entity_violations(&entity).into_iter().next();
        let name = entity.name.clone();
        let fields = entity.fields.len();
        self.entities.insert(name.clone(), entity);

        match first {
            Some(violation) => {
                warn!(%violation, "entity declaration is invalid");
                Err(violation)
            }
            None => {
                debug!(entity = %name, fields, "declared entity");
                Ok(())
            }
        }
    }

    /// Declare a relation between two entities.
    ///
    /// A duplicate name is refused and the relation is not registered. Any
    /// other problem, such as an undeclared end or a one-to-one relation
    /// without a principal, is returned immediately but the relation stays
    /// registered. An undeclared end may still be declared afterwards.
    pub fn declare_relationship(&mut self, relation: RelationDef) -> Result<(), Violation> {
        if self.relations.contains_key(&relation.name) {
            let violation = Violation::DuplicateRelation {
                relation: relation.name.clone(),
            };
            warn!(%violation, "relation declaration rejected");
            self.duplicate_relations.push(relation);
            return Err(violation);
        }

        let first = validator::relation_violations(&relation, &self.entities)
            .into_iter()
            .next();
        match &first {
            Some(violation) => warn!(%violation, "relation declaration is invalid"),
            None => debug!(
                relation = %relation.name,
                from = %relation.from_entity,
                to = %relation.to_entity,
                cardinality = ?relation.cardinality,
                "declared relation"
            ),
        }
        self.relations.insert(relation.name.clone(), relation);

        first.map_or(Ok(()), Err)
    }

    /// Check whether an entity is declared.
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of registered relations.
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Every violation in the schema, in canonical order.
    pub fn violations(&self) -> Violations {
        validator::validate(
            &self.entities,
            &self.relations,
            &self.duplicate_entities,
            &self.duplicate_relations,
        )
    }

    /// Validate all declarations and resolve the final mapping.
    ///
    /// Calling this repeatedly on an unchanged builder yields identical
    /// results.
    pub fn validate(&self) -> Result<SchemaDescriptor, Violations> {
        let violations = self.violations();
        if !violations.is_empty() {
            warn!(violations = violations.len(), "schema validation failed");
            return Err(violations);
        }

        let schema = SchemaDescriptor::resolve(self.entities.clone(), self.relations.clone());
        info!(
            entities = schema.entities.len(),
            relations = schema.relations.len(),
            "schema validated"
        );
        Ok(schema)
    }
}
