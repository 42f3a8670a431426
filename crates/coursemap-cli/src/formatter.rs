//! Output formatters for schema reports.

use clap::ValueEnum;
use comfy_table::Table;
use coursemap_core::{RelationMapping, SchemaDescriptor, Violations};

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a validated schema.
    fn format_schema(&self, schema: &SchemaDescriptor) -> String;

    /// Format the violations of a schema that failed validation.
    fn format_violations(&self, violations: &Violations) -> String;

    /// Format a simple message.
    fn format_message(&self, message: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_schema(&self, schema: &SchemaDescriptor) -> String {
        let mut tables = Table::new();
        tables.set_header(vec!["Entity", "Table", "Key", "Column", "Type", "Nullable"]);
        for (name, mapping) in &schema.entity_mappings {
            let key = mapping.key_columns.join(", ");
            for column in &mapping.columns {
                tables.add_row(vec![
                    name.clone(),
                    mapping.table.clone(),
                    key.clone(),
                    column.column.clone(),
                    column.column_type.clone(),
                    column.nullable.to_string(),
                ]);
            }
            if mapping.columns.is_empty() {
                tables.add_row(vec![
                    name.clone(),
                    mapping.table.clone(),
                    key,
                    String::new(),
                    String::new(),
                    String::new(),
                ]);
            }
        }

        let mut relations = Table::new();
        relations.set_header(vec!["Relation", "Kind", "Mapping", "On delete"]);
        for (name, relation) in &schema.relations {
            let (mapping, on_delete) = match schema.relation_mapping(name) {
                Some(RelationMapping::ForeignKey(fk)) => (
                    format!("{}.{} -> {}", fk.dependent, fk.column, fk.principal),
                    if fk.cascade_delete { "cascade" } else { "restrict" },
                ),
                Some(RelationMapping::JoinTable(join)) => (
                    format!(
                        "{}({} -> {}, {} -> {})",
                        join.table,
                        join.left_key,
                        join.left_entity,
                        join.right_key,
                        join.right_entity
                    ),
                    if relation.cascades_on_delete() {
                        "cascade"
                    } else {
                        "restrict"
                    },
                ),
                None => (String::new(), ""),
            };
            relations.add_row(vec![
                name.clone(),
                format!("{:?}", relation.cardinality),
                mapping,
                on_delete.to_string(),
            ]);
        }

        format!("{tables}\n\n{relations}")
    }

    fn format_violations(&self, violations: &Violations) -> String {
        let mut table = Table::new();
        table.set_header(vec!["#", "Subject", "Violation"]);

        for (index, violation) in violations.iter().enumerate() {
            let subject = match (violation.relation(), violation.entity()) {
                (Some(relation), Some(entity)) => format!("{relation} ({entity})"),
                (Some(name), None) | (None, Some(name)) => name.to_string(),
                (None, None) => String::new(),
            };
            table.add_row(vec![
                (index + 1).to_string(),
                subject,
                violation.to_string(),
            ]);
        }

        format!(
            "Schema is invalid: {} violation(s)\n{}",
            violations.len(),
            table
        )
    }

    fn format_message(&self, message: &str) -> String {
        message.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_schema(&self, schema: &SchemaDescriptor) -> String {
        serde_json::to_string_pretty(schema).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_violations(&self, violations: &Violations) -> String {
        serde_json::to_string_pretty(&serde_json::json!({
            "valid": false,
            "violations": violations,
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }

    fn format_message(&self, message: &str) -> String {
        serde_json::json!({
            "message": message
        })
        .to_string()
    }
}
