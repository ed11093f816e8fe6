// tests/security_tests.rs
//
// Schema references in the DOCTYPE and the insecure-transport opt-in.

mod common;

use std::borrow::Cow;
use std::cell::RefCell;

use common::options;
use suitexml::entity::{EntityResolver, LEGACY_DTD_URL};
use suitexml::{parse_str, ErrorCategory, ErrorKind, ParseOptions, SuiteError, SuiteParser};

const BODY: &str = r#"<suite name="S"><test name="T"/></suite>"#;

fn document(doctype: &str) -> String {
    format!("{}\n{}", doctype, BODY)
}

/// Records which references were handed to default resolution.
#[derive(Default)]
struct Recording {
    bundled: bool,
    delegated: RefCell<Vec<String>>,
}

impl EntityResolver for Recording {
    fn bundled_schema(&self) -> Option<Cow<'static, str>> {
        self.bundled.then_some(Cow::Borrowed("<!ELEMENT suite ANY>"))
    }

    fn resolve_default(
        &self,
        _public_id: Option<&str>,
        system_id: &str,
    ) -> Result<Option<String>, SuiteError> {
        self.delegated.borrow_mut().push(system_id.to_string());
        Ok(None)
    }
}

#[test]
fn test_unknown_http_reference_is_rejected() {
    let text = document(r#"<!DOCTYPE suite PUBLIC "-//evil//DTD X//EN" "http://evil.example.com/x.dtd">"#);
    let err = parse_str(&text, &options()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Security);
    match &err.kind {
        ErrorKind::DisallowedEntity { reference, opt_in } => {
            assert_eq!(reference, "http://evil.example.com/x.dtd");
            assert_eq!(opt_in, "TESTNG_DTD_HTTP");
        }
        other => panic!("unexpected error kind: {other:?}"),
    }
}

#[test]
fn test_opt_in_delegates_to_default_resolution() {
    let text = document(r#"<!DOCTYPE suite SYSTEM "http://evil.example.com/x.dtd">"#);
    let resolver = Recording::default();
    let parser = SuiteParser::with_resolver(options().allow_insecure_dtd(true), resolver);
    let doc = parser.parse_str(&text, None).unwrap();
    assert_eq!(doc.suites[0].name, "S");
    assert!(!doc.schema_declared);
}

#[test]
fn test_opt_in_records_delegation() {
    let text = document(r#"<!DOCTYPE suite SYSTEM "http://evil.example.com/x.dtd">"#);
    let resolver = Recording::default();
    let parser = SuiteParser::with_resolver(options().allow_insecure_dtd(true), &resolver);
    parser.parse_str(&text, None).unwrap();
    assert_eq!(*resolver.delegated.borrow(), vec!["http://evil.example.com/x.dtd".to_string()]);
}

#[test]
fn test_unknown_https_reference_is_delegated() {
    let text = document(r#"<!DOCTYPE suite SYSTEM "https://schemas.example.com/suite.dtd">"#);
    let doc = parse_str(&text, &options()).unwrap();
    assert_eq!(doc.suites.len(), 1);
}

#[test]
fn test_known_references_use_bundled_schema() {
    for doctype in [
        r#"<!DOCTYPE suite SYSTEM "https://testng.org/testng-1.0.dtd">"#,
        r#"<!DOCTYPE suite SYSTEM "http://testng.org/testng-1.0.dtd">"#,
        r#"<!DOCTYPE suite SYSTEM "http://beust.com/testng/testng-1.0.dtd">"#,
        r#"<!DOCTYPE suite PUBLIC "-//testng.org//DTD TestNG 1.0//EN" "https://testng.org/testng-1.0.dtd">"#,
    ] {
        let resolver = Recording {
            bundled: true,
            ..Recording::default()
        };
        let parser = SuiteParser::with_resolver(options(), &resolver);
        let doc = parser.parse_str(&document(doctype), None).unwrap();
        assert!(doc.schema_declared, "{doctype}");
        assert!(resolver.delegated.borrow().is_empty(), "{doctype}");
    }
}

#[test]
fn test_known_public_id_with_unknown_http_system_id_is_rejected() {
    let text = document(
        r#"<!DOCTYPE suite PUBLIC "-//testng.org//DTD TestNG 1.0//EN" "http://evil.example.com/x.dtd">"#,
    );
    let err = parse_str(&text, &options()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Security);
}

#[test]
fn test_missing_bundle_falls_back_to_trusted_url() {
    let resolver = Recording::default();
    let parser = SuiteParser::with_resolver(options(), &resolver);
    let text = document(&format!(r#"<!DOCTYPE suite SYSTEM "{}">"#, LEGACY_DTD_URL));
    let doc = parser.parse_str(&text, None).unwrap();
    assert!(doc.schema_declared);
    assert_eq!(
        *resolver.delegated.borrow(),
        vec!["https://testng.org/testng-1.0.dtd".to_string()]
    );
}

#[test]
fn test_yaml_options_enable_opt_in() {
    let opts = ParseOptions::from_yaml_str("allow_insecure_dtd: true\nuse_environment: false\n", "inline")
        .unwrap();
    let text = document(r#"<!DOCTYPE suite SYSTEM "http://evil.example.com/x.dtd">"#);
    assert!(parse_str(&text, &opts).is_ok());
}
