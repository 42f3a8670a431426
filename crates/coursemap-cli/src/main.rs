//! coursemap Command-Line Client
//!
//! Validates schema documents against the mapping rules and exports
//! resolved schemas for a persistence engine.

mod commands;
mod config;
mod error;
mod formatter;

use clap::Parser;
use config::{Args, CliConfig};
use error::CliError;

fn main() {
    let args = Args::parse();
    let config = CliConfig::from(&args);

    if let Err(e) = init_tracing(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    match run(&args, &config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn init_tracing(config: &CliConfig) -> Result<(), CliError> {
    let directive: tracing_subscriber::filter::Directive = config
        .log_directive
        .parse()
        .map_err(|_| CliError::LogDirective(config.log_directive.clone()))?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive),
        )
        .init();
    Ok(())
}

/// Run the selected command, returning whether the schema was valid.
fn run(args: &Args, config: &CliConfig) -> Result<bool, CliError> {
    let formatter = formatter::create_formatter(config.format);
    let result = commands::execute(&args.command, formatter.as_ref())?;

    println!("{}", result.text());
    Ok(result.is_success())
}
