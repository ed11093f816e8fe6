//! External schema resolution policy.
//!
//! The document may declare its schema with a DOCTYPE. The well-known suite
//! schema is served from a bundled copy; any other reference is only handed
//! to the resolver's default behaviour when it uses https or the caller opted
//! in to insecure URLs.

use std::borrow::Cow;

use miette::SourceSpan;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::INSECURE_DTD_ENV;
use crate::errors::{ErrorKind, ErrorReporting, SuiteError};

/// Canonical location of the suite schema.
pub const HTTPS_DTD_URL: &str = "https://testng.org/testng-1.0.dtd";
pub const HTTP_DTD_URL: &str = "http://testng.org/testng-1.0.dtd";
pub const LEGACY_DTD_URL: &str = "http://beust.com/testng/testng-1.0.dtd";
pub const DTD_PUBLIC_ID: &str = "-//testng.org//DTD TestNG 1.0//EN";

const BUNDLED_DTD: &str = include_str!("../resources/testng-1.0.dtd");

static DOCTYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)^\s*([^\s\[]+)(?:\s+(?:PUBLIC\s+["']([^"']*)["'](?:\s+["']([^"']*)["'])?|SYSTEM\s+["']([^"']*)["']))?"#,
    )
    .expect("doctype pattern is valid")
});

/// The parts of a `<!DOCTYPE ...>` declaration the guard cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Doctype {
    pub root: String,
    pub public_id: Option<String>,
    pub system_id: Option<String>,
}

impl Doctype {
    /// Parse the content between `<!DOCTYPE` and `>`.
    pub fn parse(content: &str) -> Option<Self> {
        let caps = DOCTYPE_RE.captures(content)?;
        let text = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        Some(Self {
            root: text(1)?,
            public_id: text(2),
            system_id: text(3).or_else(|| text(4)),
        })
    }

    /// The reference that has to be resolved, if any.
    pub fn external_reference(&self) -> Option<&str> {
        self.system_id.as_deref().or(self.public_id.as_deref())
    }

    /// The system id decides when present; a bare public id otherwise.
    fn is_known(&self) -> bool {
        match self.system_id.as_deref() {
            Some(system_id) => is_known_reference(system_id),
            None => self.public_id.as_deref() == Some(DTD_PUBLIC_ID),
        }
    }
}

/// Whether `reference` names the suite schema itself.
pub fn is_known_reference(reference: &str) -> bool {
    let reference = reference.trim();
    [HTTPS_DTD_URL, HTTP_DTD_URL, LEGACY_DTD_URL, DTD_PUBLIC_ID].contains(&reference)
}

fn is_secure(reference: &str) -> bool {
    reference.trim().to_ascii_lowercase().starts_with("https")
}

/// Supplies schema content to the guard.
pub trait EntityResolver {
    /// The locally bundled copy of the suite schema, if this resolver has one.
    fn bundled_schema(&self) -> Option<Cow<'static, str>>;

    /// Permissive resolution of an arbitrary reference. `Ok(None)` means the
    /// reference was accepted but no content was loaded.
    fn resolve_default(
        &self,
        public_id: Option<&str>,
        system_id: &str,
    ) -> Result<Option<String>, SuiteError>;
}

impl<R: EntityResolver + ?Sized> EntityResolver for &R {
    fn bundled_schema(&self) -> Option<Cow<'static, str>> {
        (**self).bundled_schema()
    }

    fn resolve_default(
        &self,
        public_id: Option<&str>,
        system_id: &str,
    ) -> Result<Option<String>, SuiteError> {
        (**self).resolve_default(public_id, system_id)
    }
}

/// Resolver backed by the schema compiled into this crate. It never touches
/// the network; the tokenizer is non-validating so the content is advisory.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledResolver;

impl EntityResolver for BundledResolver {
    fn bundled_schema(&self) -> Option<Cow<'static, str>> {
        Some(Cow::Borrowed(BUNDLED_DTD))
    }

    fn resolve_default(
        &self,
        public_id: Option<&str>,
        system_id: &str,
    ) -> Result<Option<String>, SuiteError> {
        tracing::debug!(?public_id, system_id, "external schema accepted, not loaded");
        Ok(None)
    }
}

/// How a reference ended up being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Served from the bundled schema.
    Bundled,
    /// Bundled copy missing; fetched from the trusted URL instead.
    Trusted { content: Option<String> },
    /// Handed to the resolver's default behaviour.
    Delegated { content: Option<String> },
}

impl Resolution {
    /// Whether the document now counts as declaring the suite schema.
    pub fn declares_schema(&self) -> bool {
        matches!(self, Self::Bundled | Self::Trusted { .. })
    }
}

/// Applies the resolution policy to one external reference.
pub struct EntityGuard<'a> {
    resolver: &'a dyn EntityResolver,
    allow_insecure: bool,
}

impl<'a> EntityGuard<'a> {
    pub fn new(resolver: &'a dyn EntityResolver, allow_insecure: bool) -> Self {
        Self {
            resolver,
            allow_insecure,
        }
    }

    pub fn resolve(
        &self,
        doctype: &Doctype,
        ctx: &dyn ErrorReporting,
        span: SourceSpan,
    ) -> Result<Resolution, SuiteError> {
        let Some(reference) = doctype.external_reference() else {
            return Ok(Resolution::Delegated { content: None });
        };

        if !doctype.is_known() {
            if is_secure(reference) || self.allow_insecure {
                let content = self
                    .resolver
                    .resolve_default(doctype.public_id.as_deref(), reference)?;
                return Ok(Resolution::Delegated { content });
            }
            return Err(ctx.report(
                ErrorKind::DisallowedEntity {
                    reference: reference.to_string(),
                    opt_in: INSECURE_DTD_ENV.to_string(),
                },
                span,
            ));
        }

        if self.resolver.bundled_schema().is_some() {
            return Ok(Resolution::Bundled);
        }
        tracing::warn!(
            "couldn't find a bundled copy of {}, fetching it from {}",
            reference,
            HTTPS_DTD_URL
        );
        let content = self
            .resolver
            .resolve_default(doctype.public_id.as_deref(), HTTPS_DTD_URL)?;
        Ok(Resolution::Trusted { content })
    }
}
