pub use crate::config::ParseOptions;
pub use crate::errors::{ErrorCategory, ErrorKind, SuiteError};
pub use crate::parser::{parse_file, parse_reader, parse_str, ParseWarning, ParsedDocument, SuiteParser};

pub mod cli;
pub mod config;
pub mod entity;
pub mod errors;
pub mod interpolate;
pub mod loader;
pub mod model;
pub mod parser;
