//! Defines the command-line arguments and subcommands for the suitexml CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "suitexml",
    version,
    about = "Parse and inspect test-suite XML documents."
)]
pub struct SuiteXmlArgs {
    /// Log filter used when RUST_LOG is unset (e.g. `debug`).
    #[arg(long, global = true, default_value = "warn")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a suite document and print the resulting model.
    Parse(ParseArgs),
}

#[derive(Debug, clap::Args)]
pub struct ParseArgs {
    /// The suite XML file to parse.
    #[arg(required = true)]
    pub file: PathBuf,

    /// How to print the parsed suites.
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Permit schema references over plain http.
    #[arg(long)]
    pub allow_insecure_dtd: bool,

    /// Define a property for `${NAME}` placeholders.
    #[arg(short = 'D', value_name = "NAME=VALUE", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,

    /// YAML options file; command-line flags take precedence.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also load every referenced suite file.
    #[arg(long)]
    pub recursive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Summary,
}

fn parse_property(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_requires_name() {
        assert_eq!(
            parse_property("env=qa=1"),
            Ok(("env".to_string(), "qa=1".to_string()))
        );
        assert!(parse_property("=x").is_err());
        assert!(parse_property("novalue").is_err());
    }

    #[test]
    fn test_parse_command_line() {
        let args = SuiteXmlArgs::parse_from([
            "suitexml", "parse", "suite.xml", "--format", "json", "-D", "a=1", "-D", "b=2",
            "--recursive",
        ]);
        let Command::Parse(parse) = args.command;
        assert_eq!(parse.format, OutputFormat::Json);
        assert_eq!(parse.properties.len(), 2);
        assert!(parse.recursive);
        assert!(!parse.allow_insecure_dtd);
    }
}
