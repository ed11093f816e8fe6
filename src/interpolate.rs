//! `${name}` placeholder expansion for parameter attributes.

use std::collections::{BTreeMap, HashMap};

use crate::config::ParseOptions;

/// Something that can answer "what is the value of `name`?".
pub trait PropertySource {
    fn lookup(&self, name: &str) -> Option<String>;
}

impl PropertySource for BTreeMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl PropertySource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl PropertySource for Environment {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A source that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProperties;

impl PropertySource for NoProperties {
    fn lookup(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Expands placeholders against a primary and a fallback lookup.
pub struct Interpolator<'a> {
    primary: &'a dyn PropertySource,
    fallback: &'a dyn PropertySource,
}

impl<'a> Interpolator<'a> {
    pub fn new(primary: &'a dyn PropertySource, fallback: &'a dyn PropertySource) -> Self {
        Self { primary, fallback }
    }

    /// The interpolator a parse with `options` uses.
    pub fn for_options(options: &'a ParseOptions) -> Self {
        let fallback: &'a dyn PropertySource = if options.use_environment {
            &Environment
        } else {
            &NoProperties
        };
        Self::new(&options.properties, fallback)
    }

    fn resolve(&self, name: &str) -> Option<String> {
        self.primary
            .lookup(name)
            .or_else(|| self.fallback.lookup(name))
    }

    /// Single left-to-right pass; substituted values are never re-scanned and
    /// unresolved placeholders are kept verbatim.
    pub fn expand(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut rest = raw;

        while let Some(start) = rest.find("${") {
            let after_open = &rest[start + 2..];
            let Some(close) = after_open.find('}') else {
                break;
            };
            out.push_str(&rest[..start]);
            let name = &after_open[..close];
            match (!name.is_empty()).then(|| self.resolve(name)).flatten() {
                Some(value) => out.push_str(&value),
                None => {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = &after_open[close + 1..];
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_unresolved_placeholder_is_kept() {
        let primary = props(&[]);
        let interp = Interpolator::new(&primary, &NoProperties);
        assert_eq!(interp.expand("${NOPE_VAR}"), "${NOPE_VAR}");
    }

    #[test]
    fn test_primary_lookup_wins() {
        let primary = props(&[("HOME", "/home/tester")]);
        let fallback = props(&[("HOME", "/elsewhere")]);
        let interp = Interpolator::new(&primary, &fallback);
        assert_eq!(interp.expand("${HOME}"), "/home/tester");
    }

    #[test]
    fn test_fallback_lookup() {
        let primary = props(&[]);
        let fallback = props(&[("user", "ada")]);
        let interp = Interpolator::new(&primary, &fallback);
        assert_eq!(interp.expand("hi ${user}!"), "hi ada!");
    }

    #[test]
    fn test_multiple_placeholders_single_pass() {
        let primary = props(&[("a", "${b}"), ("b", "never")]);
        let interp = Interpolator::new(&primary, &NoProperties);
        assert_eq!(interp.expand("${a}-${missing}-${b}"), "${b}-${missing}-never");
    }

    #[test]
    fn test_unterminated_and_empty_placeholders() {
        let primary = props(&[("x", "1")]);
        let interp = Interpolator::new(&primary, &NoProperties);
        assert_eq!(interp.expand("${x} ${x"), "1 ${x");
        assert_eq!(interp.expand("${}"), "${}");
        assert_eq!(interp.expand("plain"), "plain");
    }
}
