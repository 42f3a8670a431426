//! Mapping of the course catalog model.
//!
//! Entities:
//! - `Course`: title and description are required and length limited.
//! - `Author`: writes many courses.
//! - `Tag`: labels many courses.
//! - `Cover`: exactly one per course.
//!
//! Overrides, in the order a reader would look for them: property
//! constraints first, then relationships sorted by name.

use crate::builder::SchemaBuilder;
use crate::catalog::{FieldDef, RelationDef, ScalarType, SchemaDescriptor};
use crate::error::{Error, Violation};

/// Maximum length of a course title.
pub const TITLE_MAX_LENGTH: i64 = 255;

/// Maximum length of a course description.
pub const DESCRIPTION_MAX_LENGTH: i64 = 2000;

/// Relation between a course and its author.
pub const COURSE_AUTHOR: &str = "course_author";

/// Relation between a course and its cover.
pub const COURSE_COVER: &str = "course_cover";

/// Relation between courses and tags.
pub const COURSE_TAGS: &str = "course_tags";

/// Declare the course catalog entities and relationships.
pub fn course_catalog_builder() -> Result<SchemaBuilder, Violation> {
    let mut builder = SchemaBuilder::new();

    builder.declare_entity(
        "Course",
        [
            FieldDef::identity("Id"),
            FieldDef::text("Description")
                .required()
                .with_max_length(DESCRIPTION_MAX_LENGTH),
            FieldDef::text("Title")
                .required()
                .with_max_length(TITLE_MAX_LENGTH),
            // Mapped as the renamed foreign key of `course_author`.
            FieldDef::new("AuthorId", ScalarType::Int32).required(),
        ],
    )?;
    builder.declare_entity(
        "Author",
        [FieldDef::identity("Id"), FieldDef::text("Name").required()],
    )?;
    builder.declare_entity(
        "Tag",
        [FieldDef::identity("Id"), FieldDef::text("Name").required()],
    )?;
    builder.declare_entity(
        "Cover",
        [FieldDef::identity("Id"), FieldDef::new("Image", ScalarType::Bytes)],
    )?;

    // Authors who still have courses cannot be deleted.
    builder.declare_relationship(
        RelationDef::one_to_many(COURSE_AUTHOR, "Course", "Author")
            .with_foreign_key("AuthorId")
            .with_cascade_delete(false),
    )?;

    // A cover cannot exist without its course.
    builder.declare_relationship(
        RelationDef::one_to_one(COURSE_COVER, "Course", "Cover").with_source_principal(),
    )?;

    builder.declare_relationship(
        RelationDef::many_to_many(COURSE_TAGS, "Course", "Tag")
            .with_join_table("CourseTags")
            .with_left_key("CourseId")
            .with_right_key("TagId"),
    )?;

    Ok(builder)
}

/// Build and validate the course catalog mapping.
pub fn course_catalog() -> Result<SchemaDescriptor, Error> {
    Ok(course_catalog_builder()?.validate()?)
}
