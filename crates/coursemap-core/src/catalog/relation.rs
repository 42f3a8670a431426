//! Relation definitions between entities.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Cardinality of a relation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    /// One-to-one relation (dependent shares the principal's key).
    OneToOne,
    /// One-to-many relation (foreign key on the source, which is the many side).
    OneToMany,
    /// Many-to-many relation (requires a join table).
    ManyToMany,
}

/// Which end of a one-to-one relation owns the other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    /// The source entity is the principal; the target is dependent.
    Source,
    /// The target entity is the principal; the source is dependent.
    Target,
}

/// Behavior when a principal entity is deleted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DeleteBehavior {
    /// Delete dependent entities.
    Cascade,
    /// Prevent deletion while dependents exist.
    Restrict,
}

/// Join table overrides for a many-to-many relation.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
pub struct JoinTableOverrides {
    /// Join table name.
    #[serde(default)]
    pub table: Option<String>,
    /// Column referencing the source entity.
    #[serde(default)]
    pub left_key: Option<String>,
    /// Column referencing the target entity.
    #[serde(default)]
    pub right_key: Option<String>,
}

/// A relation definition between two entities.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct RelationDef {
    /// Relation name (unique within schema).
    pub name: String,
    /// Source entity name.
    pub from_entity: String,
    /// Target entity name.
    pub to_entity: String,
    /// Relation cardinality.
    pub cardinality: Cardinality,
    /// Foreign key field override on the dependent side.
    #[serde(default)]
    pub foreign_key: Option<String>,
    /// Principal designation for one-to-one relations.
    #[serde(default)]
    pub principal: Option<Principal>,
    /// Delete behavior.
    #[serde(default = "default_on_delete")]
    pub on_delete: DeleteBehavior,
    /// Join table overrides for many-to-many relations.
    #[serde(default)]
    pub join_table: JoinTableOverrides,
}

fn default_on_delete() -> DeleteBehavior {
    DeleteBehavior::Cascade
}

impl RelationDef {
    fn new(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            name: name.into(),
            from_entity: from_entity.into(),
            to_entity: to_entity.into(),
            cardinality,
            foreign_key: None,
            principal: None,
            on_delete: default_on_delete(),
            join_table: JoinTableOverrides::default(),
        }
    }

    /// Create a one-to-one relation. A principal must be designated before
    /// it is declared.
    pub fn one_to_one(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self::new(name, from_entity, to_entity, Cardinality::OneToOne)
    }

    /// Create a one-to-many relation where `from_entity` is the many side.
    pub fn one_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self::new(name, from_entity, to_entity, Cardinality::OneToMany)
    }

    /// Create a many-to-many relation.
    pub fn many_to_many(
        name: impl Into<String>,
        from_entity: impl Into<String>,
        to_entity: impl Into<String>,
    ) -> Self {
        Self::new(name, from_entity, to_entity, Cardinality::ManyToMany)
    }

    /// Rename the foreign key.
    pub fn with_foreign_key(mut self, field: impl Into<String>) -> Self {
        self.foreign_key = Some(field.into());
        self
    }

    /// Make the source the principal of a one-to-one relation.
    pub fn with_source_principal(mut self) -> Self {
        self.principal = Some(Principal::Source);
        self
    }

    /// Make the target the principal of a one-to-one relation.
    pub fn with_target_principal(mut self) -> Self {
        self.principal = Some(Principal::Target);
        self
    }

    /// Enable or disable cascading deletes.
    pub fn with_cascade_delete(mut self, cascade: bool) -> Self {
        self.on_delete = if cascade {
            DeleteBehavior::Cascade
        } else {
            DeleteBehavior::Restrict
        };
        self
    }

    /// Rename the join table.
    pub fn with_join_table(mut self, table: impl Into<String>) -> Self {
        self.join_table.table = Some(table.into());
        self
    }

    /// Rename the join column referencing the source entity.
    pub fn with_left_key(mut self, column: impl Into<String>) -> Self {
        self.join_table.left_key = Some(column.into());
        self
    }

    /// Rename the join column referencing the target entity.
    pub fn with_right_key(mut self, column: impl Into<String>) -> Self {
        self.join_table.right_key = Some(column.into());
        self
    }

    /// Check if this is a many-to-many relation.
    pub fn is_many_to_many(&self) -> bool {
        self.cardinality == Cardinality::ManyToMany
    }

    /// Check if deleting the principal removes dependents.
    pub fn cascades_on_delete(&self) -> bool {
        self.on_delete == DeleteBehavior::Cascade
    }

    /// Check if any join table override is present.
    pub fn has_join_overrides(&self) -> bool {
        self.join_table != JoinTableOverrides::default()
    }

    /// Entity names on both ends, source first.
    pub fn entities(&self) -> [&str; 2] {
        [self.from_entity.as_str(), self.to_entity.as_str()]
    }

    /// Principal and dependent entity names, if the relation has them.
    ///
    /// Many-to-many relations have neither; an undesignated one-to-one
    /// relation is ambiguous and returns `None`.
    pub fn principal_and_dependent(&self) -> Option<(&str, &str)> {
        match (self.cardinality, self.principal) {
            (Cardinality::OneToMany, _) => {
                Some((self.to_entity.as_str(), self.from_entity.as_str()))
            }
            (Cardinality::OneToOne, Some(Principal::Source)) => {
                Some((self.from_entity.as_str(), self.to_entity.as_str()))
            }
            (Cardinality::OneToOne, Some(Principal::Target)) => {
                Some((self.to_entity.as_str(), self.from_entity.as_str()))
            }
            _ => None,
        }
    }
}
