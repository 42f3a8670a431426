//! Resolved table and column mappings handed to the persistence engine.
//!
//! Mappings are computed once a schema validates. Every name here is final:
//! overrides are applied and conventions fill in whatever was left unset.

use super::{Cardinality, EntityDef, RelationDef};
use crate::convention;
use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};
use std::collections::BTreeMap;

/// Where an entity's fields are stored.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct EntityMapping {
    /// Qualified table name.
    pub table: String,
    /// Primary key columns.
    pub key_columns: Vec<String>,
    /// Columns in table order.
    pub columns: Vec<ColumnMapping>,
}

/// A single column of an entity table.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct ColumnMapping {
    /// Field the column stores.
    pub field: String,
    /// Column name.
    pub column: String,
    /// Store column type.
    pub column_type: String,
    /// Whether the column accepts nulls.
    pub nullable: bool,
}

/// How a relation is stored.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelationMapping {
    /// A foreign key column on the dependent table.
    ForeignKey(ForeignKeyMapping),
    /// A join table with one column per side.
    JoinTable(JoinTableMapping),
}

/// Foreign key stored on the dependent entity.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct ForeignKeyMapping {
    /// Principal entity.
    pub principal: String,
    /// Dependent entity holding the column.
    pub dependent: String,
    /// Foreign key column on the dependent table.
    pub column: String,
    /// Whether the column is also the dependent's primary key.
    pub shared_key: bool,
    /// Whether deleting the principal deletes dependents.
    pub cascade_delete: bool,
}

/// Join table between two entities.
#[derive(
    Debug, Clone, PartialEq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
pub struct JoinTableMapping {
    /// Join table name.
    pub table: String,
    /// Source entity.
    pub left_entity: String,
    /// Column referencing the source entity.
    pub left_key: String,
    /// Target entity.
    pub right_entity: String,
    /// Column referencing the target entity.
    pub right_key: String,
}

impl EntityMapping {
    /// Resolve the table layout of an entity.
    pub fn resolve(entity: &EntityDef) -> Self {
        let mut fields: Vec<_> = entity.fields.iter().enumerate().collect();
        // Explicitly ordered columns first, the rest keep declaration order.
        fields.sort_by_key(|(position, field)| {
            (field.column_order.unwrap_or(u32::MAX), *position)
        });

        let columns = fields
            .into_iter()
            .map(|(_, field)| ColumnMapping {
                field: field.name.clone(),
                column: field.column().to_string(),
                column_type: convention::column_type(field),
                nullable: !field.required,
            })
            .collect();

        let key_columns = entity
            .key_fields()
            .into_iter()
            .map(|key| match entity.get_field(&key) {
                Some(field) => field.column().to_string(),
                None => key,
            })
            .collect();

        Self {
            table: entity.qualified_table_name(),
            key_columns,
            columns,
        }
    }

    /// Get a column by the field it stores.
    pub fn column_for(&self, field: &str) -> Option<&ColumnMapping> {
        self.columns.iter().find(|c| c.field == field)
    }
}

impl RelationMapping {
    /// Resolve the storage of a relation.
    ///
    /// Returns `None` when an end is undeclared or a one-to-one relation has
    /// no principal; validation rejects such relations.
    pub fn resolve(relation: &RelationDef, entities: &BTreeMap<String, EntityDef>) -> Option<Self> {
        if relation.cardinality == Cardinality::ManyToMany {
            let left = entities.get(&relation.from_entity)?;
            let right = entities.get(&relation.to_entity)?;
            return Some(RelationMapping::JoinTable(JoinTableMapping::resolve(
                relation, left, right,
            )));
        }

        let (principal, dependent) = relation.principal_and_dependent()?;
        let principal = entities.get(principal)?;
        let dependent = entities.get(dependent)?;

        let (column, shared_key) = match &relation.foreign_key {
            Some(field) => {
                let column = dependent
                    .get_field(field)
                    .map_or_else(|| field.clone(), |f| f.column().to_string());
                let shared = dependent.key_fields().iter().any(|k| k == field);
                (column, shared)
            }
            None if relation.cardinality == Cardinality::OneToOne => {
                let key = EntityMapping::resolve(dependent).key_columns;
                (key.into_iter().next()?, true)
            }
            None => (convention::foreign_key(&principal.name), false),
        };

        Some(RelationMapping::ForeignKey(ForeignKeyMapping {
            principal: principal.name.clone(),
            dependent: dependent.name.clone(),
            column,
            shared_key,
            cascade_delete: relation.cascades_on_delete(),
        }))
    }
}

impl JoinTableMapping {
    /// Resolve join table names. Each key is renamed independently; an
    /// unrenamed key falls back to `<Entity>Id`.
    pub fn resolve(relation: &RelationDef, left: &EntityDef, right: &EntityDef) -> Self {
        let overrides = &relation.join_table;
        Self {
            table: overrides
                .table
                .clone()
                .unwrap_or_else(|| convention::join_table(&left.name, &right.name)),
            left_entity: left.name.clone(),
            left_key: overrides
                .left_key
                .clone()
                .unwrap_or_else(|| convention::key_column(&left.name)),
            right_entity: right.name.clone(),
            right_key: overrides
                .right_key
                .clone()
                .unwrap_or_else(|| convention::key_column(&right.name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FieldDef, ScalarType};

    fn entities() -> BTreeMap<String, EntityDef> {
        let course = EntityDef::new("Course")
            .with_field(FieldDef::identity("Id"))
            .with_field(FieldDef::text("Title").required().with_max_length(255))
            .with_field(
                FieldDef::new("AuthorId", ScalarType::Int32)
                    .required()
                    .with_column_name("author_ref"),
            );
        let author = EntityDef::new("Author").with_field(FieldDef::identity("Id"));
        let tag = EntityDef::new("Tag").with_field(FieldDef::identity("Id"));
        let cover = EntityDef::new("Cover").with_field(FieldDef::identity("Id"));

        [course, author, tag, cover]
            .into_iter()
            .map(|e| (e.name.clone(), e))
            .collect()
    }

    #[test]
    fn test_entity_mapping() {
        let entities = entities();
        let mapping = EntityMapping::resolve(&entities["Course"]);

        assert_eq!(mapping.table, "Course");
        assert_eq!(mapping.key_columns, vec!["Id"]);
        let title = mapping.column_for("Title").unwrap();
        assert_eq!(title.column_type, "nvarchar(255)");
        assert!(!title.nullable);
    }

    #[test]
    fn test_column_order() {
        let entity = EntityDef::new("Course")
            .with_field(FieldDef::identity("Id"))
            .with_field(FieldDef::text("Name").with_column_order(0));

        let mapping = EntityMapping::resolve(&entity);
        let names: Vec<_> = mapping.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["Name", "Id"]);
    }

    #[test]
    fn test_foreign_key_override_uses_column_name() {
        let entities = entities();
        let rel = RelationDef::one_to_many("course_author", "Course", "Author")
            .with_foreign_key("AuthorId")
            .with_cascade_delete(false);

        let Some(RelationMapping::ForeignKey(fk)) = RelationMapping::resolve(&rel, &entities)
        else {
            panic!("Expected foreign key mapping");
        };
        assert_eq!(fk.principal, "Author");
        assert_eq!(fk.dependent, "Course");
        assert_eq!(fk.column, "author_ref");
        assert!(!fk.shared_key);
        assert!(!fk.cascade_delete);
    }

    #[test]
    fn test_default_foreign_key() {
        let entities = entities();
        let rel = RelationDef::one_to_many("course_author", "Course", "Author");

        let Some(RelationMapping::ForeignKey(fk)) = RelationMapping::resolve(&rel, &entities)
        else {
            panic!("Expected foreign key mapping");
        };
        assert_eq!(fk.column, "AuthorId");
        assert!(fk.cascade_delete);
    }

    #[test]
    fn test_one_to_one_shares_dependent_key() {
        let entities = entities();
        let rel = RelationDef::one_to_one("course_cover", "Course", "Cover").with_source_principal();

        let Some(RelationMapping::ForeignKey(fk)) = RelationMapping::resolve(&rel, &entities)
        else {
            panic!("Expected foreign key mapping");
        };
        assert_eq!(fk.principal, "Course");
        assert_eq!(fk.dependent, "Cover");
        assert_eq!(fk.column, "Id");
        assert!(fk.shared_key);
    }

    #[test]
    fn test_ambiguous_one_to_one_does_not_resolve() {
        let entities = entities();
        let rel = RelationDef::one_to_one("course_cover", "Course", "Cover");

        assert!(RelationMapping::resolve(&rel, &entities).is_none());
    }

    #[test]
    fn test_join_table_keys_renamed_independently() {
        let entities = entities();
        let rel = RelationDef::many_to_many("course_tags", "Course", "Tag")
            .with_join_table("CourseTags")
            .with_left_key("CourseRef");

        let Some(RelationMapping::JoinTable(join)) = RelationMapping::resolve(&rel, &entities)
        else {
            panic!("Expected join table mapping");
        };
        assert_eq!(join.table, "CourseTags");
        assert_eq!(join.left_key, "CourseRef");
        assert_eq!(join.right_key, "TagId");
    }

    #[test]
    fn test_join_table_defaults() {
        let entities = entities();
        let rel = RelationDef::many_to_many("course_tags", "Course", "Tag");

        let Some(RelationMapping::JoinTable(join)) = RelationMapping::resolve(&rel, &entities)
        else {
            panic!("Expected join table mapping");
        };
        assert_eq!(join.table, "CourseTags");
        assert_eq!(join.left_key, "CourseId");
        assert_eq!(join.right_key, "TagId");
    }
}
