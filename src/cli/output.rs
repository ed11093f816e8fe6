//! Handles all user-facing output for the CLI.
//!
//! Machine-readable dumps go through serde; the human summary is colorized
//! with termcolor and written to any `WriteColor` so it can be captured.

use std::io;

use miette::IntoDiagnostic;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::loader::LoadedSuite;
use crate::model::{Suite, Test};

// ============================================================================
// SERIALIZED DUMPS
// ============================================================================

pub fn render_json(suites: &[LoadedSuite]) -> miette::Result<String> {
    serde_json::to_string_pretty(suites).into_diagnostic()
}

pub fn render_yaml(suites: &[LoadedSuite]) -> miette::Result<String> {
    serde_yaml::to_string(suites).into_diagnostic()
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Writes an indented outline of every loaded suite.
pub fn write_summary<W: WriteColor>(out: &mut W, suites: &[LoadedSuite]) -> io::Result<()> {
    for loaded in suites {
        write_suite(out, loaded)?;
    }
    Ok(())
}

fn write_suite<W: WriteColor>(out: &mut W, loaded: &LoadedSuite) -> io::Result<()> {
    let suite = &loaded.suite;
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "suite {}", suite.name)?;
    out.reset()?;
    writeln!(out, " ({})", loaded.path.display())?;
    if let Some(parent) = &loaded.parent {
        writeln!(out, "  included by {}", parent)?;
    }
    write_settings(out, suite)?;

    for test in &suite.tests {
        write_test(out, test)?;
    }
    for file in &suite.suite_files {
        writeln!(out, "  suite-file {}", file)?;
    }

    if !loaded.warnings.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        for warning in &loaded.warnings {
            writeln!(out, "  warning: {}", warning)?;
        }
        out.reset()?;
    }
    Ok(())
}

fn write_settings<W: WriteColor>(out: &mut W, suite: &Suite) -> io::Result<()> {
    writeln!(
        out,
        "  parallel={} thread-count={} verbose={}",
        suite.parallel, suite.thread_count, suite.verbose
    )?;
    for (name, value) in &suite.parameters {
        writeln!(out, "  param {} = {}", name, value)?;
    }
    for listener in &suite.listeners {
        writeln!(out, "  listener {}", listener)?;
    }
    Ok(())
}

fn write_test<W: WriteColor>(out: &mut W, test: &Test) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(out, "  [{}] test {}", test.index, test.name)?;
    out.reset()?;
    writeln!(out)?;
    for class in &test.classes {
        writeln!(out, "    [{}] {}", class.index, class.name)?;
        for include in &class.included_methods {
            writeln!(out, "      + [{}] {}", include.index, include.name)?;
        }
        for exclude in &class.excluded_methods {
            writeln!(out, "      - {}", exclude)?;
        }
    }
    for package in &test.packages {
        writeln!(out, "    package {}", package.name)?;
    }
    let included = test.included_groups();
    if !included.is_empty() {
        writeln!(out, "    groups +{}", included.join(" +"))?;
    }
    let excluded = test.excluded_groups();
    if !excluded.is_empty() {
        writeln!(out, "    groups -{}", excluded.join(" -"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassRef, Suite, Test};
    use std::path::PathBuf;
    use termcolor::Buffer;

    fn sample() -> Vec<LoadedSuite> {
        let mut suite = Suite::new("Nightly");
        let mut test = Test::new("Smoke", 0);
        let mut class = ClassRef::new("com.example.LoginTest", 0);
        class.excluded_methods.insert("flaky".to_string());
        test.classes.push(class);
        suite.tests.push(test);
        vec![LoadedSuite {
            path: PathBuf::from("nightly.xml"),
            suite,
            parent: None,
            warnings: Vec::new(),
        }]
    }

    #[test]
    fn test_summary_lists_tests_and_classes() {
        let mut buffer = Buffer::no_color();
        write_summary(&mut buffer, &sample()).unwrap();
        let text = String::from_utf8(buffer.into_inner()).unwrap();
        assert!(text.contains("suite Nightly (nightly.xml)"));
        assert!(text.contains("[0] test Smoke"));
        assert!(text.contains("[0] com.example.LoginTest"));
        assert!(text.contains("- flaky"));
    }

    #[test]
    fn test_json_dump_is_valid_json() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["suite"]["name"], "Nightly");
    }
}
