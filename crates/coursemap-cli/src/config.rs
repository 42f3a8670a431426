//! Command-line configuration.

use crate::formatter::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default log directive when `RUST_LOG` does not mention this crate.
pub const DEFAULT_LOG_DIRECTIVE: &str = "coursemap=info";

/// coursemap command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "coursemap")]
#[command(version, about = "Validate and export object-relational schema mappings")]
pub struct Args {
    /// Output format
    #[arg(long, global = true, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Log directive added to RUST_LOG (e.g. "coursemap_core=debug")
    #[arg(long, global = true, default_value = DEFAULT_LOG_DIRECTIVE)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Validate a JSON schema document and print its resolved mapping
    Validate {
        /// Path to the schema document
        file: PathBuf,
    },
    /// Print the resolved mapping of the built-in course catalog
    Show,
    /// Write a validated schema as archived bytes for a persistence engine
    Export {
        /// Schema document to export (defaults to the built-in course catalog)
        file: Option<PathBuf>,
        /// Destination path
        #[arg(short, long)]
        out: PathBuf,
    },
}

/// Resolved command-line configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Output format.
    pub format: OutputFormat,
    /// Log filter directive.
    pub log_directive: String,
}

impl CliConfig {
    /// Create a configuration with the given output format.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            log_directive: DEFAULT_LOG_DIRECTIVE.to_string(),
        }
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the log filter directive.
    pub fn with_log_directive(mut self, directive: impl Into<String>) -> Self {
        self.log_directive = directive.into();
        self
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

impl From<&Args> for CliConfig {
    fn from(args: &Args) -> Self {
        CliConfig::default()
            .with_format(args.format)
            .with_log_directive(args.log.clone())
    }
}
