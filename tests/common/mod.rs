// Shared helpers for the integration tests.
#![allow(dead_code)]

use suitexml::{parse_str, ParseOptions, ParsedDocument, SuiteError};

pub const DOCTYPE: &str =
    r#"<!DOCTYPE suite SYSTEM "https://testng.org/testng-1.0.dtd">"#;

/// Options that never consult the process environment, so tests stay hermetic.
pub fn options() -> ParseOptions {
    ParseOptions::new().use_environment(false)
}

/// Prefix `body` with the standard suite DOCTYPE.
pub fn with_doctype(body: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n{}", DOCTYPE, body)
}

pub fn try_parse(body: &str) -> Result<ParsedDocument, SuiteError> {
    parse_str(&with_doctype(body), &options())
}

pub fn parse(body: &str) -> ParsedDocument {
    try_parse(body).unwrap_or_else(|e| panic!("parse failed: {e}"))
}
