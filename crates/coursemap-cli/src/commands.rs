//! Subcommand handling.

use std::fs;
use std::path::Path;

use coursemap_core::{course_catalog, SchemaDescriptor, SchemaDocument};
use tracing::{debug, info};

use crate::config::Command;
use crate::error::CliError;
use crate::formatter::Formatter;

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The schema is valid; output to display.
    Output(String),
    /// The schema is invalid; violation report to display.
    Invalid(String),
}

impl CommandResult {
    /// Whether the command succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, CommandResult::Output(_))
    }

    /// Text to display.
    pub fn text(&self) -> &str {
        match self {
            CommandResult::Output(text) | CommandResult::Invalid(text) => text,
        }
    }
}

/// Execute a subcommand.
pub fn execute(command: &Command, formatter: &dyn Formatter) -> Result<CommandResult, CliError> {
    match command {
        Command::Validate { file } => match load_document(file)? {
            Ok(schema) => Ok(CommandResult::Output(formatter.format_schema(&schema))),
            Err(report) => Ok(CommandResult::Invalid(formatter.format_violations(&report))),
        },
        Command::Show => {
            let schema = course_catalog()?;
            Ok(CommandResult::Output(formatter.format_schema(&schema)))
        }
        Command::Export { file, out } => {
            let schema = match file {
                Some(file) => match load_document(file)? {
                    Ok(schema) => schema,
                    Err(report) => {
                        return Ok(CommandResult::Invalid(formatter.format_violations(&report)))
                    }
                },
                None => course_catalog()?,
            };
            let written = export(&schema, out)?;
            Ok(CommandResult::Output(formatter.format_message(&format!(
                "Wrote {} bytes ({} tables) to {}",
                written,
                schema.tables().len(),
                out.display()
            ))))
        }
    }
}

/// Load and validate a schema document.
///
/// The outer error covers unreadable or malformed files; the inner one
/// carries the violations of a well-formed but invalid schema.
fn load_document(
    path: &Path,
) -> Result<Result<SchemaDescriptor, coursemap_core::Violations>, CliError> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    let document = SchemaDocument::from_json(&text)?;
    debug!(
        path = %path.display(),
        entities = document.entities.len(),
        relationships = document.relationships.len(),
        "loaded schema document"
    );
    Ok(document.into_builder().validate())
}

/// Archive a schema to `out`, returning the number of bytes written.
fn export(schema: &SchemaDescriptor, out: &Path) -> Result<usize, CliError> {
    let bytes = schema.to_bytes()?;
    fs::write(out, &bytes).map_err(|e| CliError::io(out, e))?;
    info!(path = %out.display(), bytes = bytes.len(), "exported schema");
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::{JsonFormatter, TableFormatter};
    use std::path::PathBuf;

    const VALID: &str = r#"{
        "entities": [
            { "name": "Course", "fields": [
                { "name": "Title", "field_type": "string", "required": true,
                  "max_length": { "bounded": 255 } }
            ] },
            { "name": "Tag", "fields": [ { "name": "Name", "field_type": "string" } ] }
        ],
        "relationships": [
            { "name": "course_tags", "from_entity": "Course", "to_entity": "Tag",
              "cardinality": "many_to_many" }
        ]
    }"#;

    const INVALID: &str = r#"{
        "entities": [
            { "name": "Course", "fields": [] },
            { "name": "Cover", "fields": [] }
        ],
        "relationships": [
            { "name": "course_cover", "from_entity": "Course", "to_entity": "Cover",
              "cardinality": "one_to_one" }
        ]
    }"#;

    fn write_document(dir: &tempfile::TempDir, text: &str) -> PathBuf {
        let path = dir.path().join("schema.json");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_validate_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_document(&dir, VALID);

        let result = execute(&Command::Validate { file }, &TableFormatter).unwrap();

        assert!(result.is_success());
        assert!(result.text().contains("CourseTags"));
    }

    #[test]
    fn test_validate_invalid_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_document(&dir, INVALID);

        let result = execute(&Command::Validate { file }, &JsonFormatter).unwrap();

        assert!(!result.is_success());
        let value: serde_json::Value = serde_json::from_str(result.text()).unwrap();
        assert_eq!(value["violations"].as_array().unwrap().len(), 1);
        assert_eq!(value["violations"][0]["relation"], "course_cover");
    }

    #[test]
    fn test_validate_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("missing.json");

        let err = execute(&Command::Validate { file }, &TableFormatter).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_validate_malformed_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_document(&dir, "{ not json");

        let err = execute(&Command::Validate { file }, &TableFormatter).unwrap_err();
        assert!(matches!(err, CliError::Schema(_)));
    }

    #[test]
    fn test_show_course_catalog() {
        let result = execute(&Command::Show, &TableFormatter).unwrap();

        assert!(result.is_success());
        assert!(result.text().contains("Course"));
        assert!(result.text().contains("CourseTags"));
    }

    #[test]
    fn test_export_course_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("catalog.bin");

        let result = execute(
            &Command::Export {
                file: None,
                out: out.clone(),
            },
            &TableFormatter,
        )
        .unwrap();
        assert!(result.is_success());

        let bytes = fs::read(&out).unwrap();
        let schema = SchemaDescriptor::from_bytes(&bytes).unwrap();
        assert_eq!(schema, course_catalog().unwrap());
    }

    #[test]
    fn test_export_invalid_document_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let file = write_document(&dir, INVALID);
        let out = dir.path().join("schema.bin");

        let result = execute(
            &Command::Export {
                file: Some(file),
                out: out.clone(),
            },
            &TableFormatter,
        )
        .unwrap();

        assert!(!result.is_success());
        assert!(!out.exists());
    }
}
