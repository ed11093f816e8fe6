//! Suite document parser.
//!
//! Converts a suite XML document into [`Suite`] values. Fatal conditions are
//! returned as [`SuiteError`]; recoverable ones are logged and collected as
//! [`ParseWarning`]s on the [`ParsedDocument`].
//!
//! ```no_run
//! use suitexml::{parse_str, ParseOptions};
//!
//! let doc = parse_str(
//!     r#"<suite name="S"><test name="T"><classes><class name="C"/></classes></test></suite>"#,
//!     &ParseOptions::default(),
//! )?;
//! assert_eq!(doc.suite().map(|s| s.name.as_str()), Some("S"));
//! # Ok::<(), suitexml::SuiteError>(())
//! ```

use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::ParseOptions;
use crate::entity::{BundledResolver, EntityResolver, HTTPS_DTD_URL};
use crate::errors::{ErrorKind, SourceContext, SuiteError};
use crate::model::Suite;

pub mod attributes;
pub mod scope;
mod session;
pub mod tags;

pub use scope::{Scope, ScopeStack};
pub use tags::Tag;

use session::ParseSession;

// ============================================================================
// PARSE RESULT
// ============================================================================

/// Everything one parse produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub suites: Vec<Suite>,
    pub warnings: Vec<ParseWarning>,
    /// Whether the document declared the suite schema in its DOCTYPE.
    pub schema_declared: bool,
}

impl ParsedDocument {
    /// The first suite of the document.
    pub fn suite(&self) -> Option<&Suite> {
        self.suites.first()
    }

    pub fn into_suite(self) -> Result<Suite, SuiteError> {
        self.suites
            .into_iter()
            .next()
            .ok_or_else(|| SuiteError::unsourced(ErrorKind::NoSuite))
    }
}

/// A recoverable problem; the parse continued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseWarning {
    /// The document has no DOCTYPE naming the suite schema.
    MissingSchemaDeclaration,
    /// An enumeration attribute had a value outside its domain.
    UnknownValue {
        attribute: String,
        value: String,
        owner: String,
    },
    /// An optional-but-expected attribute was missing; the element was skipped.
    MissingAttribute { tag: String, attribute: String },
    /// An element was ignored because of where it appeared.
    Dropped { tag: String, reason: String },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::MissingSchemaDeclaration => write!(
                f,
                "It is strongly recommended to add \"<!DOCTYPE suite SYSTEM \"{}\" >\" \
                 at the top of your file, otherwise the suite may not be read as expected.",
                HTTPS_DTD_URL
            ),
            ParseWarning::UnknownValue {
                attribute,
                value,
                owner,
            } => write!(
                f,
                "Unknown value of attribute '{}' for {}: '{}'",
                attribute, owner, value
            ),
            ParseWarning::MissingAttribute { tag, attribute } => {
                write!(f, "<{}> without a '{}' attribute was skipped", tag, attribute)
            }
            ParseWarning::Dropped { tag, reason } => write!(f, "ignored <{}>: {}", tag, reason),
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// A configured parser. Each call runs an independent session, so one
/// parser can be reused for any number of documents.
pub struct SuiteParser<R: EntityResolver = BundledResolver> {
    options: ParseOptions,
    resolver: R,
}

impl SuiteParser<BundledResolver> {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            resolver: BundledResolver,
        }
    }
}

impl<R: EntityResolver> SuiteParser<R> {
    /// Use a custom resolver for external schema references.
    pub fn with_resolver(options: ParseOptions, resolver: R) -> Self {
        Self { options, resolver }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse document text. `origin` names the document in diagnostics and is
    /// recorded as the suites' file name unless the options override it.
    pub fn parse_str(&self, text: &str, origin: Option<&str>) -> Result<ParsedDocument, SuiteError> {
        let name = origin.unwrap_or("<string>");
        tracing::debug!(document = name, "parsing suite document");
        let session = ParseSession::new(
            SourceContext::from_file(name, text),
            origin.map(String::from),
            &self.options,
            &self.resolver,
        );
        session.run(text)
    }

    /// Read the whole stream, then parse it.
    pub fn parse_reader<T: Read>(&self, mut reader: T, origin: &str) -> Result<ParsedDocument, SuiteError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|e| SuiteError::io(origin, &e))?;
        drop(reader);
        self.parse_str(&text, Some(origin))
    }

    /// Parse a file. The file handle is closed before parsing starts.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<ParsedDocument, SuiteError> {
        let origin = path.as_ref().to_string_lossy().to_string();
        let text = std::fs::read_to_string(&path).map_err(|e| SuiteError::io(&origin, &e))?;
        self.parse_str(&text, Some(&origin))
    }
}

/// Parse document text with the bundled resolver.
pub fn parse_str(text: &str, options: &ParseOptions) -> Result<ParsedDocument, SuiteError> {
    let origin = options.file_name.clone();
    SuiteParser::new(options.clone()).parse_str(text, origin.as_deref())
}

/// Parse a file with the bundled resolver.
pub fn parse_file<P: AsRef<Path>>(path: P, options: &ParseOptions) -> Result<ParsedDocument, SuiteError> {
    SuiteParser::new(options.clone()).parse_file(path)
}

/// Parse a stream with the bundled resolver.
pub fn parse_reader<T: Read>(
    reader: T,
    origin: &str,
    options: &ParseOptions,
) -> Result<ParsedDocument, SuiteError> {
    SuiteParser::new(options.clone()).parse_reader(reader, origin)
}
