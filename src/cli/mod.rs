//! The suitexml Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use std::io::Write;
use std::process;

use clap::Parser;
use miette::IntoDiagnostic;
use termcolor::{ColorChoice, StandardStream};
use tracing_subscriber::EnvFilter;

use crate::cli::args::{Command, OutputFormat, ParseArgs, SuiteXmlArgs};
use crate::config::ParseOptions;
use crate::loader::SuiteLoader;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = SuiteXmlArgs::parse();
    init_tracing(&args.log);

    let result = match &args.command {
        Command::Parse(parse) => handle_parse(parse),
    };

    if let Err(report) = result {
        eprintln!("{report:?}");
        process::exit(1);
    }
}

/// Logs go to stderr so dumps on stdout stay machine-readable.
fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    // A second install (tests calling run twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Handles the `parse` subcommand.
fn handle_parse(args: &ParseArgs) -> miette::Result<()> {
    let options = build_options(args)?;
    let loader = SuiteLoader::new(options);
    let suites = if args.recursive {
        loader.load_recursive(&args.file)?
    } else {
        loader.load(&args.file)?
    };

    match args.format {
        OutputFormat::Json => println!("{}", output::render_json(&suites)?),
        OutputFormat::Yaml => print!("{}", output::render_yaml(&suites)?),
        OutputFormat::Summary => {
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            output::write_summary(&mut stdout, &suites).into_diagnostic()?;
            stdout.flush().into_diagnostic()?;
        }
    }
    Ok(())
}

/// Environment first, then the options file, then command-line flags.
fn build_options(args: &ParseArgs) -> miette::Result<ParseOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let loaded = ParseOptions::load(path).into_diagnostic()?;
            let allow = loaded.allow_insecure_dtd || ParseOptions::from_env().allow_insecure_dtd;
            loaded.allow_insecure_dtd(allow)
        }
        None => ParseOptions::from_env(),
    };
    if args.allow_insecure_dtd {
        options = options.allow_insecure_dtd(true);
    }
    for (name, value) in &args.properties {
        options = options.property(name.clone(), value.clone());
    }
    Ok(options)
}
