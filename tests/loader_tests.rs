// tests/loader_tests.rs
//
// Multi-file suites read through the loader, using fixtures in a temp dir.

mod common;

use std::fs;
use std::path::Path;

use common::{options, with_doctype};
use suitexml::loader::SuiteLoader;
use suitexml::{parse_file, parse_reader, ErrorCategory};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, with_doctype(body)).unwrap();
}

#[test]
fn test_parse_file_records_origin() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "root.xml", r#"<suite name="Root"/>"#);
    let path = dir.path().join("root.xml");

    let doc = parse_file(&path, &options()).unwrap();
    let recorded = doc.suites[0].file_name.clone().unwrap();
    assert!(recorded.ends_with("root.xml"));
}

#[test]
fn test_parse_reader() {
    let text = with_doctype(r#"<suite name="FromReader"/>"#);
    let doc = parse_reader(text.as_bytes(), "stdin", &options()).unwrap();
    assert_eq!(doc.suites[0].name, "FromReader");
    assert_eq!(doc.suites[0].file_name.as_deref(), Some("stdin"));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = parse_file(dir.path().join("nope.xml"), &options()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Io);
}

#[test]
fn test_load_without_recursion_reads_only_root() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "root.xml",
        r#"<suite name="Root"><suite-files><suite-file path="child.xml"/></suite-files></suite>"#,
    );
    write(dir.path(), "child.xml", r#"<suite name="Child"/>"#);

    let loaded = SuiteLoader::new(options()).load(&dir.path().join("root.xml")).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].suite.suite_files, vec!["child.xml".to_string()]);
}

#[test]
fn test_recursive_load_resolves_relative_paths() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "root.xml",
        r#"<suite name="Root"><suite-files><suite-file path="nested/child.xml"/></suite-files></suite>"#,
    );
    write(
        dir.path(),
        "nested/child.xml",
        r#"<suite name="Child"><suite-files><suite-file path="leaf.xml"/></suite-files></suite>"#,
    );
    write(dir.path(), "nested/leaf.xml", r#"<suite name="Leaf"/>"#);

    let loaded = SuiteLoader::new(options())
        .load_recursive(&dir.path().join("root.xml"))
        .unwrap();
    let names: Vec<&str> = loaded.iter().map(|l| l.suite.name.as_str()).collect();
    assert_eq!(names, vec!["Root", "Child", "Leaf"]);
    assert_eq!(loaded[0].parent, None);
    assert_eq!(loaded[1].parent.as_deref(), Some("Root"));
    assert_eq!(loaded[2].parent.as_deref(), Some("Child"));
}

#[test]
fn test_recursive_load_stops_at_cycles() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "a.xml",
        r#"<suite name="A"><suite-files><suite-file path="b.xml"/></suite-files></suite>"#,
    );
    write(
        dir.path(),
        "b.xml",
        r#"<suite name="B"><suite-files><suite-file path="a.xml"/></suite-files></suite>"#,
    );

    let loaded = SuiteLoader::new(options())
        .load_recursive(&dir.path().join("a.xml"))
        .unwrap();
    assert_eq!(loaded.len(), 2);
}

#[test]
fn test_recursive_load_propagates_child_errors() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "root.xml",
        r#"<suite name="Root"><suite-files><suite-file path="broken.xml"/></suite-files></suite>"#,
    );
    write(dir.path(), "broken.xml", r#"<suite/>"#);

    let err = SuiteLoader::new(options())
        .load_recursive(&dir.path().join("root.xml"))
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Structural);
}
