//! Core error types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while building or exporting a schema.
#[derive(Debug, Error)]
pub enum Error {
    /// A declaration was rejected when it was made.
    #[error("declaration rejected: {0}")]
    Rejected(#[from] Violation),

    /// Validation found one or more violations.
    #[error("{0}")]
    ValidationFailed(#[from] Violations),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Schema document could not be parsed.
    #[error("invalid schema document: {0}")]
    Document(#[from] serde_json::Error),
}

/// A broken mapping rule.
///
/// Every violation names the entity, field, or relation it concerns so a
/// report can point at the offending declaration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// An entity with this name was already declared.
    #[error("entity '{entity}' is already declared")]
    DuplicateEntity {
        /// Entity name.
        entity: String,
    },

    /// Two fields of one entity share a name.
    #[error("field '{field}' is declared twice on entity '{entity}'")]
    DuplicateField {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// A maximum length is zero or negative.
    #[error("field '{entity}.{field}' has non-positive maximum length {length}")]
    InvalidLength {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
        /// Declared length.
        length: i64,
    },

    /// A length limit was set on a field that is neither text nor binary.
    #[error("field '{entity}.{field}' cannot have a length limit")]
    LengthOnNonText {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// A required field defaults to an absent or empty value.
    #[error("required field '{entity}.{field}' defaults to an empty value")]
    RequiredWithoutValue {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// A primary key names a field the entity does not declare.
    #[error("key field '{field}' is not declared on entity '{entity}'")]
    UnknownKeyField {
        /// Entity name.
        entity: String,
        /// Field name.
        field: String,
    },

    /// Two tables resolve to the same name.
    #[error("table '{table}' is mapped more than once")]
    DuplicateTable {
        /// Qualified table name.
        table: String,
    },

    /// A relation with this name was already declared.
    #[error("relation '{relation}' is already declared")]
    DuplicateRelation {
        /// Relation name.
        relation: String,
    },

    /// A relation references an entity that was not declared.
    #[error("relation '{relation}' references undeclared entity '{entity}'")]
    UnknownEntity {
        /// Relation name.
        relation: String,
        /// Missing entity name.
        entity: String,
    },

    /// A one-to-one relation does not say which side is the principal.
    #[error("one-to-one relation '{relation}' does not designate a principal")]
    AmbiguousPrincipal {
        /// Relation name.
        relation: String,
    },

    /// A principal was designated on a relation that is not one-to-one.
    #[error("relation '{relation}' is not one-to-one and cannot designate a principal")]
    PrincipalNotApplicable {
        /// Relation name.
        relation: String,
    },

    /// A foreign key override names a field the dependent does not declare.
    #[error("foreign key '{field}' of relation '{relation}' is not declared on entity '{entity}'")]
    UnrepresentableForeignKey {
        /// Relation name.
        relation: String,
        /// Dependent entity name.
        entity: String,
        /// Foreign key field name.
        field: String,
    },

    /// A foreign key override was set on a many-to-many relation.
    #[error("many-to-many relation '{relation}' cannot rename a foreign key; rename the join keys instead")]
    ForeignKeyOnJoinTable {
        /// Relation name.
        relation: String,
    },

    /// Join table overrides were set on a relation without a join table.
    #[error("relation '{relation}' has no join table to configure")]
    JoinTableNotApplicable {
        /// Relation name.
        relation: String,
    },

    /// Both join key columns resolve to the same name.
    #[error("join table of relation '{relation}' uses column '{column}' for both keys")]
    DuplicateJoinColumn {
        /// Relation name.
        relation: String,
        /// Column name.
        column: String,
    },
}

impl Violation {
    /// Entity this violation concerns, if any.
    pub fn entity(&self) -> Option<&str> {
        match self {
            Violation::DuplicateEntity { entity }
            | Violation::DuplicateField { entity, .. }
            | Violation::InvalidLength { entity, .. }
            | Violation::LengthOnNonText { entity, .. }
            | Violation::RequiredWithoutValue { entity, .. }
            | Violation::UnknownKeyField { entity, .. }
            | Violation::UnknownEntity { entity, .. }
            | Violation::UnrepresentableForeignKey { entity, .. } => Some(entity),
            _ => None,
        }
    }

    /// Relation this violation concerns, if any.
    pub fn relation(&self) -> Option<&str> {
        match self {
            Violation::DuplicateRelation { relation }
            | Violation::UnknownEntity { relation, .. }
            | Violation::AmbiguousPrincipal { relation }
            | Violation::PrincipalNotApplicable { relation }
            | Violation::UnrepresentableForeignKey { relation, .. }
            | Violation::ForeignKeyOnJoinTable { relation }
            | Violation::JoinTableNotApplicable { relation }
            | Violation::DuplicateJoinColumn { relation, .. } => Some(relation),
            _ => None,
        }
    }
}

/// Every violation found by one validation pass, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Sort violations and drop repeats.
    pub fn new(mut violations: Vec<Violation>) -> Self {
        violations.sort();
        violations.dedup();
        Self(violations)
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no violations were found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Borrow the violations as a slice.
    pub fn as_slice(&self) -> &[Violation] {
        &self.0
    }

    /// Take ownership of the violations.
    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "schema validation failed with {} violation(s)", self.0.len())?;
        for violation in &self.0 {
            write!(f, "\n  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
