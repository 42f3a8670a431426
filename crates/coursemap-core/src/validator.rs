//! Mapping rules.
//!
//! Each rule looks at one declaration (or, for table names, the whole
//! schema) and reports every violation it finds. Rules never depend on the
//! order entities and relations were declared in.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::catalog::{Cardinality, EntityDef, JoinTableMapping, LengthLimit, RelationDef};
use crate::error::{Violation, Violations};

/// Check the fields and key of a single entity.
pub fn entity_violations(entity: &EntityDef) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for field in &entity.fields {
        if !seen.insert(field.name.as_str()) {
            violations.push(Violation::DuplicateField {
                entity: entity.name.clone(),
                field: field.name.clone(),
            });
        }

        if let Some(limit) = field.max_length {
            match limit {
                LengthLimit::Bounded(length) if !limit.is_valid() => {
                    violations.push(Violation::InvalidLength {
                        entity: entity.name.clone(),
                        field: field.name.clone(),
                        length,
                    });
                }
                _ => {}
            }
            if !field.field_type.is_string_like() {
                violations.push(Violation::LengthOnNonText {
                    entity: entity.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        if field.required && field.defaults_to_empty() {
            violations.push(Violation::RequiredWithoutValue {
                entity: entity.name.clone(),
                field: field.name.clone(),
            });
        }
    }

    for key in &entity.key {
        if !entity.has_field(key) {
            violations.push(Violation::UnknownKeyField {
                entity: entity.name.clone(),
                field: key.clone(),
            });
        }
    }

    violations
}

/// Check that both ends of a relation are declared.
pub fn unknown_entities(
    relation: &RelationDef,
    entities: &BTreeMap<String, EntityDef>,
) -> Vec<Violation> {
    missing_ends(relation, |name| entities.contains_key(name))
}

fn missing_ends(relation: &RelationDef, is_declared: impl Fn(&str) -> bool) -> Vec<Violation> {
    let mut missing: Vec<&str> = relation
        .entities()
        .into_iter()
        .filter(|name| !is_declared(*name))
        .collect();
    missing.dedup();

    missing
        .into_iter()
        .map(|entity| Violation::UnknownEntity {
            relation: relation.name.clone(),
            entity: entity.to_string(),
        })
        .collect()
}

/// Check a single relation against the declared entities.
pub fn relation_violations(
    relation: &RelationDef,
    entities: &BTreeMap<String, EntityDef>,
) -> Vec<Violation> {
    match (
        entities.get(&relation.from_entity),
        entities.get(&relation.to_entity),
    ) {
        (Some(from), Some(to)) => check_relation(relation, from, to),
        _ => unknown_entities(relation, entities),
    }
}

/// Check a relation whose ends are both declared.
fn check_relation(relation: &RelationDef, from: &EntityDef, to: &EntityDef) -> Vec<Violation> {
    let mut violations = Vec::new();
    let name = || relation.name.clone();

    match (relation.cardinality, relation.principal) {
        (Cardinality::OneToOne, None) => {
            violations.push(Violation::AmbiguousPrincipal { relation: name() });
        }
        (Cardinality::OneToMany | Cardinality::ManyToMany, Some(_)) => {
            violations.push(Violation::PrincipalNotApplicable { relation: name() });
        }
        _ => {}
    }

    if relation.is_many_to_many() {
        if relation.foreign_key.is_some() {
            violations.push(Violation::ForeignKeyOnJoinTable { relation: name() });
        }
        let join = JoinTableMapping::resolve(relation, from, to);
        if join.left_key == join.right_key {
            violations.push(Violation::DuplicateJoinColumn {
                relation: name(),
                column: join.left_key,
            });
        }
        return violations;
    }

    if relation.has_join_overrides() {
        violations.push(Violation::JoinTableNotApplicable { relation: name() });
    }

    if let (Some(field), Some((_, dependent))) =
        (&relation.foreign_key, relation.principal_and_dependent())
    {
        let dependent = if dependent == from.name { from } else { to };
        if !dependent.has_field(field) {
            violations.push(Violation::UnrepresentableForeignKey {
                relation: name(),
                entity: dependent.name.clone(),
                field: field.clone(),
            });
        }
    }

    violations
}

/// Every declaration of each entity name, duplicates included.
type EntityCopies<'a> = BTreeMap<&'a str, Vec<&'a EntityDef>>;

/// Declarations of the two ends of a relation, one pair per combination.
///
/// A self relation pairs each declaration with itself.
fn end_pairs<'a>(
    relation: &RelationDef,
    entities: &EntityCopies<'a>,
) -> Vec<(&'a EntityDef, &'a EntityDef)> {
    let (Some(from), Some(to)) = (
        entities.get(relation.from_entity.as_str()),
        entities.get(relation.to_entity.as_str()),
    ) else {
        return Vec::new();
    };

    if relation.from_entity == relation.to_entity {
        return from.iter().map(|e| (*e, *e)).collect();
    }
    from.iter()
        .flat_map(|f| to.iter().map(move |t| (*f, *t)))
        .collect()
}

/// Check that no two entities or join tables share a table name.
fn table_violations(entities: &EntityCopies<'_>, relations: &[&RelationDef]) -> Vec<Violation> {
    // Owners are (is_join_table, name) so an entity and a relation with the
    // same name stay distinct.
    let mut owners: BTreeMap<String, BTreeSet<(bool, &str)>> = BTreeMap::new();

    for (name, copies) in entities {
        for entity in copies {
            owners
                .entry(entity.qualified_table_name())
                .or_default()
                .insert((false, *name));
        }
    }
    for relation in relations.iter().filter(|r| r.is_many_to_many()) {
        for (from, to) in end_pairs(relation, entities) {
            owners
                .entry(JoinTableMapping::resolve(relation, from, to).table)
                .or_default()
                .insert((true, relation.name.as_str()));
        }
    }

    owners
        .into_iter()
        .filter(|(_, owners)| owners.len() > 1)
        .map(|(table, _)| Violation::DuplicateTable { table })
        .collect()
}

/// Run every rule over a set of declarations.
///
/// `duplicate_entities` and `duplicate_relations` hold declarations refused
/// because their name was already taken. They are checked like any other
/// declaration so that the outcome does not depend on which copy came first.
pub fn validate(
    entities: &BTreeMap<String, EntityDef>,
    relations: &BTreeMap<String, RelationDef>,
    duplicate_entities: &[EntityDef],
    duplicate_relations: &[RelationDef],
) -> Violations {
    let mut violations = Vec::new();

    let mut entity_copies: EntityCopies<'_> = BTreeMap::new();
    for entity in entities.values().chain(duplicate_entities) {
        entity_copies.entry(entity.name.as_str()).or_default().push(entity);
    }
    for (name, copies) in &entity_copies {
        if copies.len() > 1 {
            violations.push(Violation::DuplicateEntity {
                entity: name.to_string(),
            });
        }
        for entity in copies {
            violations.extend(entity_violations(entity));
        }
    }

    let all_relations: Vec<&RelationDef> =
        relations.values().chain(duplicate_relations).collect();
    for relation in duplicate_relations {
        violations.push(Violation::DuplicateRelation {
            relation: relation.name.clone(),
        });
    }
    for relation in &all_relations {
        let missing = missing_ends(relation, |name| entity_copies.contains_key(name));
        if !missing.is_empty() {
            violations.extend(missing);
            continue;
        }
        for (from, to) in end_pairs(relation, &entity_copies) {
            violations.extend(check_relation(relation, from, to));
        }
    }

    violations.extend(table_violations(&entity_copies, &all_relations));

    Violations::new(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DefaultValue, FieldDef, ScalarType};

    fn entities(defs: impl IntoIterator<Item = EntityDef>) -> BTreeMap<String, EntityDef> {
        defs.into_iter().map(|e| (e.name.clone(), e)).collect()
    }

    fn course() -> EntityDef {
        EntityDef::new("Course")
            .with_field(FieldDef::identity("Id"))
            .with_field(FieldDef::text("Title").required().with_max_length(255))
            .with_field(FieldDef::text("Description").required().with_max_length(2000))
            .with_field(FieldDef::new("AuthorId", ScalarType::Int32).required())
    }

    fn catalog() -> BTreeMap<String, EntityDef> {
        entities([
            course(),
            EntityDef::new("Author").with_field(FieldDef::identity("Id")),
            EntityDef::new("Tag").with_field(FieldDef::identity("Id")),
            EntityDef::new("Cover").with_field(FieldDef::identity("Id")),
        ])
    }

    #[test]
    fn test_valid_entity() {
        assert!(entity_violations(&course()).is_empty());
    }

    #[test]
    fn test_non_positive_lengths() {
        let entity = EntityDef::new("Course")
            .with_field(FieldDef::text("Title").with_max_length(0))
            .with_field(FieldDef::text("Description").with_max_length(-5));

        let violations = entity_violations(&entity);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| matches!(v, Violation::InvalidLength { .. })));
    }

    #[test]
    fn test_length_on_non_text() {
        let entity = EntityDef::new("Course")
            .with_field(FieldDef::new("Level", ScalarType::Int32).with_max_length(3));

        assert_eq!(
            entity_violations(&entity),
            vec![Violation::LengthOnNonText {
                entity: "Course".into(),
                field: "Level".into(),
            }]
        );
    }

    #[test]
    fn test_required_field_with_empty_default() {
        let entity = EntityDef::new("Course")
            .with_field(
                FieldDef::text("Title")
                    .required()
                    .with_default(DefaultValue::String(String::new())),
            )
            .with_field(FieldDef::text("Summary").with_default(DefaultValue::Null));

        assert_eq!(
            entity_violations(&entity),
            vec![Violation::RequiredWithoutValue {
                entity: "Course".into(),
                field: "Title".into(),
            }]
        );
    }

    #[test]
    fn test_duplicate_field_and_unknown_key() {
        let entity = EntityDef::new("Course")
            .with_field(FieldDef::text("Title"))
            .with_field(FieldDef::text("Title"))
            .with_key("CourseKey");

        let violations = entity_violations(&entity);
        assert!(violations.contains(&Violation::DuplicateField {
            entity: "Course".into(),
            field: "Title".into(),
        }));
        assert!(violations.contains(&Violation::UnknownKeyField {
            entity: "Course".into(),
            field: "CourseKey".into(),
        }));
    }

    #[test]
    fn test_unknown_entities_reported_once() {
        let rel = RelationDef::many_to_many("tag_links", "Label", "Label");

        assert_eq!(
            relation_violations(&rel, &catalog()),
            vec![Violation::UnknownEntity {
                relation: "tag_links".into(),
                entity: "Label".into(),
            }]
        );
    }

    #[test]
    fn test_ambiguous_principal() {
        let rel = RelationDef::one_to_one("course_cover", "Course", "Cover");

        assert_eq!(
            relation_violations(&rel, &catalog()),
            vec![Violation::AmbiguousPrincipal {
                relation: "course_cover".into(),
            }]
        );
    }

    #[test]
    fn test_principal_on_one_to_many() {
        let rel = RelationDef::one_to_many("course_author", "Course", "Author").with_source_principal();

        assert_eq!(
            relation_violations(&rel, &catalog()),
            vec![Violation::PrincipalNotApplicable {
                relation: "course_author".into(),
            }]
        );
    }

    #[test]
    fn test_foreign_key_must_be_declared_on_dependent() {
        let declared = RelationDef::one_to_many("course_author", "Course", "Author")
            .with_foreign_key("AuthorId");
        assert!(relation_violations(&declared, &catalog()).is_empty());

        let missing = RelationDef::one_to_many("course_author", "Course", "Author")
            .with_foreign_key("WriterId");
        assert_eq!(
            relation_violations(&missing, &catalog()),
            vec![Violation::UnrepresentableForeignKey {
                relation: "course_author".into(),
                entity: "Course".into(),
                field: "WriterId".into(),
            }]
        );
    }

    #[test]
    fn test_foreign_key_on_many_to_many() {
        let rel = RelationDef::many_to_many("course_tags", "Course", "Tag").with_foreign_key("TagId");

        assert_eq!(
            relation_violations(&rel, &catalog()),
            vec![Violation::ForeignKeyOnJoinTable {
                relation: "course_tags".into(),
            }]
        );
    }

    #[test]
    fn test_join_table_on_one_to_many() {
        let rel = RelationDef::one_to_many("course_author", "Course", "Author")
            .with_join_table("CourseAuthors");

        assert_eq!(
            relation_violations(&rel, &catalog()),
            vec![Violation::JoinTableNotApplicable {
                relation: "course_author".into(),
            }]
        );
    }

    #[test]
    fn test_self_referencing_join_needs_distinct_keys() {
        let rel = RelationDef::many_to_many("related_tags", "Tag", "Tag");
        assert_eq!(
            relation_violations(&rel, &catalog()),
            vec![Violation::DuplicateJoinColumn {
                relation: "related_tags".into(),
                column: "TagId".into(),
            }]
        );

        let renamed = rel.with_left_key("TagId").with_right_key("RelatedTagId");
        assert!(relation_violations(&renamed, &catalog()).is_empty());
    }

    fn relations(defs: impl IntoIterator<Item = RelationDef>) -> BTreeMap<String, RelationDef> {
        defs.into_iter().map(|r| (r.name.clone(), r)).collect()
    }

    #[test]
    fn test_duplicate_tables() {
        let entities = entities([
            EntityDef::new("Course").to_table("Catalog"),
            EntityDef::new("Tag"),
            EntityDef::new("Author").to_table("CourseTags"),
        ]);
        let relations = relations([RelationDef::many_to_many("course_tags", "Course", "Tag")]);

        assert_eq!(
            validate(&entities, &relations, &[], &[]).into_vec(),
            vec![Violation::DuplicateTable {
                table: "CourseTags".into(),
            }]
        );
    }

    #[test]
    fn test_duplicate_entity_copies_are_all_checked() {
        let entities = entities([EntityDef::new("Tag").with_field(FieldDef::text("Name"))]);
        let duplicates =
            [EntityDef::new("Tag").with_field(FieldDef::text("Name").with_max_length(0))];

        assert_eq!(
            validate(&entities, &BTreeMap::new(), &duplicates, &[]).into_vec(),
            vec![
                Violation::DuplicateEntity {
                    entity: "Tag".into(),
                },
                Violation::InvalidLength {
                    entity: "Tag".into(),
                    field: "Name".into(),
                    length: 0,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_entity_sharing_its_table_is_not_a_table_clash() {
        let entities = entities([EntityDef::new("Tag")]);
        let duplicates = [EntityDef::new("Tag").with_field(FieldDef::text("Name"))];

        let violations = validate(&entities, &BTreeMap::new(), &duplicates, &[]);
        assert_eq!(
            violations.into_vec(),
            vec![Violation::DuplicateEntity {
                entity: "Tag".into(),
            }]
        );
    }

    #[test]
    fn test_relations_are_checked_against_every_entity_copy() {
        let entities = catalog();
        let duplicates = [EntityDef::new("Course").with_field(FieldDef::identity("Id"))];
        let relations = relations([
            RelationDef::one_to_many("course_author", "Course", "Author").with_foreign_key("AuthorId")
        ]);

        let violations = validate(&entities, &relations, &duplicates, &[]);
        assert!(violations.as_slice().contains(&Violation::UnrepresentableForeignKey {
            relation: "course_author".into(),
            entity: "Course".into(),
            field: "AuthorId".into(),
        }));
    }

    #[test]
    fn test_duplicate_relation_copies_are_all_checked() {
        let relations = relations([RelationDef::one_to_many("course_author", "Course", "Author")]);
        let duplicates = [RelationDef::one_to_one("course_author", "Course", "Author")];

        assert_eq!(
            validate(&catalog(), &relations, &[], &duplicates).into_vec(),
            vec![
                Violation::DuplicateRelation {
                    relation: "course_author".into(),
                },
                Violation::AmbiguousPrincipal {
                    relation: "course_author".into(),
                },
            ]
        );
    }

    #[test]
    fn test_validate_collects_everything() {
        let mut entities = catalog();
        entities.insert(
            "Broken".into(),
            EntityDef::new("Broken").with_field(FieldDef::text("Name").with_max_length(0)),
        );
        let relations = relations([
            RelationDef::one_to_one("course_cover", "Course", "Cover"),
            RelationDef::many_to_many("course_tags", "Course", "Tag").with_foreign_key("X"),
        ]);
        let duplicates = [course()];

        let violations = validate(&entities, &relations, &duplicates, &[]);
        assert_eq!(violations.len(), 4);
        assert!(matches!(
            violations.as_slice()[0],
            Violation::DuplicateEntity { .. }
        ));
    }
}
