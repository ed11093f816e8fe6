//! Suite Parser Error Handling
//!
//! One error type for every fatal condition the parser can raise. Recoverable
//! conditions never become a `SuiteError`; they are recorded as
//! [`ParseWarning`](crate::parser::ParseWarning) values instead.

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// The document text an error points into.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real document content
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when the document text is unavailable (I/O failures)
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("<!-- {} -->", context),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

/// The single fatal error type
#[derive(Debug)]
pub struct SuiteError {
    /// What went wrong
    pub kind: ErrorKind,
    /// Where it happened
    pub source_info: SourceInfo,
    /// How to help
    pub diagnostic_info: DiagnosticInfo,
}

/// All fatal error kinds
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    // Structural errors - required data missing or a tag in the wrong place
    MissingAttribute {
        tag: String,
        attribute: String,
    },
    UnexpectedScope {
        tag: String,
        scope: String,
    },

    // Security policy errors - external entity resolution
    DisallowedEntity {
        reference: String,
        opt_in: String,
    },

    // Value format errors - typed attributes that do not parse
    InvalidNumber {
        attribute: String,
        value: String,
    },
    InvalidBoolean {
        attribute: String,
        value: String,
    },

    // Event source errors
    MalformedDocument {
        message: String,
    },
    Io {
        path: String,
        reason: String,
    },
    NoSuite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Structural,
    Security,
    ValueFormat,
    Syntax,
    Io,
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingAttribute { .. } | Self::UnexpectedScope { .. } | Self::NoSuite => {
                ErrorCategory::Structural
            }
            Self::DisallowedEntity { .. } => ErrorCategory::Security,
            Self::InvalidNumber { .. } | Self::InvalidBoolean { .. } => ErrorCategory::ValueFormat,
            Self::MalformedDocument { .. } => ErrorCategory::Syntax,
            Self::Io { .. } => ErrorCategory::Io,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::MissingAttribute { .. } => "missing_attribute",
            Self::UnexpectedScope { .. } => "unexpected_scope",
            Self::DisallowedEntity { .. } => "disallowed_entity",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::InvalidBoolean { .. } => "invalid_boolean",
            Self::MalformedDocument { .. } => "malformed_document",
            Self::Io { .. } => "io",
            Self::NoSuite => "no_suite",
        }
    }

    fn default_help(&self) -> Option<String> {
        match self {
            Self::MissingAttribute { tag, attribute } => Some(format!(
                "add a non-blank `{}` attribute to the <{}> tag",
                attribute, tag
            )),
            Self::DisallowedEntity { opt_in, .. } => Some(format!(
                "use an https:// URL, or set {}=true to allow insecure schema URLs",
                opt_in
            )),
            Self::InvalidBoolean { .. } => Some("expected `true` or `false`".into()),
            Self::InvalidNumber { .. } => Some("expected an integer".into()),
            _ => None,
        }
    }
}

/// Context-specific source information
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement data
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

/// Context-aware error creation
pub trait ErrorReporting {
    /// Create an error pointing at `span` of the context's document
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> SuiteError;

    fn missing_attribute(&self, tag: &str, attribute: &str, span: SourceSpan) -> SuiteError {
        self.report(
            ErrorKind::MissingAttribute {
                tag: tag.into(),
                attribute: attribute.into(),
            },
            span,
        )
    }

    fn unexpected_scope(&self, tag: &str, scope: &str, span: SourceSpan) -> SuiteError {
        self.report(
            ErrorKind::UnexpectedScope {
                tag: tag.into(),
                scope: scope.into(),
            },
            span,
        )
    }

    fn malformed(&self, message: impl fmt::Display, span: SourceSpan) -> SuiteError
    where
        Self: Sized,
    {
        self.report(
            ErrorKind::MalformedDocument {
                message: message.to_string(),
            },
            span,
        )
    }
}

impl SuiteError {
    /// Create an error that has no document to point into.
    pub fn unsourced(kind: ErrorKind) -> Self {
        let error_code = format!("suitexml::{}", kind.code_suffix());
        let help = kind.default_help();
        Self {
            kind,
            source_info: SourceInfo {
                source: SourceContext::default().to_named_source(),
                primary_span: unspanned(),
            },
            diagnostic_info: DiagnosticInfo { help, error_code },
        }
    }

    /// Convenience for I/O failures while obtaining document bytes.
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        Self::unsourced(ErrorKind::Io {
            path: path.into(),
            reason: err.to_string(),
        })
    }

    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::MissingAttribute { .. } => "required attribute missing here".into(),
            ErrorKind::UnexpectedScope { .. } => "not allowed in this scope".into(),
            ErrorKind::DisallowedEntity { .. } => "disallowed schema reference".into(),
            ErrorKind::InvalidNumber { .. } => "not a number".into(),
            ErrorKind::InvalidBoolean { .. } => "not a boolean".into(),
            ErrorKind::MalformedDocument { .. } => "malformed here".into(),
            ErrorKind::Io { .. } => "while reading".into(),
            ErrorKind::NoSuite => "document has no <suite>".into(),
        }
    }
}

impl std::error::Error for SuiteError {}

impl fmt::Display for SuiteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::MissingAttribute { tag, attribute } => {
                write!(f, "The <{}> tag must define the {} attribute", tag, attribute)
            }
            ErrorKind::UnexpectedScope { tag, scope } => {
                write!(f, "Structural error: <{}> is not allowed inside {}", tag, scope)
            }
            ErrorKind::DisallowedEntity { reference, opt_in } => write!(
                f,
                "Loading the schema from the insecure URL '{}' is disabled. \
                 If you need to load it over http, set [{}=true]",
                reference, opt_in
            ),
            ErrorKind::InvalidNumber { attribute, value } => {
                write!(f, "Invalid number for attribute '{}': '{}'", attribute, value)
            }
            ErrorKind::InvalidBoolean { attribute, value } => {
                write!(f, "Invalid boolean for attribute '{}': '{}'", attribute, value)
            }
            ErrorKind::MalformedDocument { message } => {
                write!(f, "Malformed document: {}", message)
            }
            ErrorKind::Io { path, reason } => write!(f, "Failed to read '{}': {}", path, reason),
            ErrorKind::NoSuite => write!(f, "Document does not contain a <suite>"),
        }
    }
}

impl Diagnostic for SuiteError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

/// Error creation context for one document
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub source: SourceContext,
}

impl DocumentContext {
    pub fn new(source: SourceContext) -> Self {
        Self { source }
    }
}

impl ErrorReporting for DocumentContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> SuiteError {
        let error_code = format!("suitexml::{}", kind.code_suffix());
        let help = kind.default_help();

        SuiteError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
            },
            diagnostic_info: DiagnosticInfo { help, error_code },
        }
    }
}

/// Creates a placeholder span for errors not tied to a document location.
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_carries_code_and_help() {
        let ctx = DocumentContext::new(SourceContext::from_file("suite.xml", "<suite/>"));
        let err = ctx.missing_attribute("suite", "name", (0..8).into());
        assert_eq!(err.category(), ErrorCategory::Structural);
        assert_eq!(err.diagnostic_info.error_code, "suitexml::missing_attribute");
        assert_eq!(
            err.to_string(),
            "The <suite> tag must define the name attribute"
        );
        assert!(err.diagnostic_info.help.is_some());
    }

    #[test]
    fn test_report_renders_with_miette() {
        let ctx = DocumentContext::new(SourceContext::from_file("suite.xml", "<suite/>"));
        let err = ctx.report(
            ErrorKind::DisallowedEntity {
                reference: "http://example.com/x.dtd".into(),
                opt_in: "TESTNG_DTD_HTTP".into(),
            },
            (0..8).into(),
        );
        let output = format!("{:?}", miette::Report::new(err));
        assert!(output.contains("http://example.com/x.dtd"));
        assert!(output.contains("TESTNG_DTD_HTTP"));
    }

    #[test]
    fn test_unsourced_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SuiteError::io("missing.xml", &io);
        assert_eq!(err.category(), ErrorCategory::Io);
        assert!(err.to_string().contains("missing.xml"));
    }
}
