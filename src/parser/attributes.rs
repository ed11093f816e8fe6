//! Owned, typed access to the attributes of one start tag.

use quick_xml::events::BytesStart;

use crate::errors::ErrorKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Collect and unescape every attribute of `start`.
    pub fn from_start(start: &BytesStart<'_>) -> Result<Self, quick_xml::Error> {
        let mut entries = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            entries.push((key, value));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The attribute, unless it is absent or only whitespace.
    pub fn non_blank(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.trim().is_empty())
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.get(name).map(String::from)
    }

    pub fn flag(&self, name: &str) -> Result<Option<bool>, ErrorKind> {
        self.get(name)
            .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(ErrorKind::InvalidBoolean {
                    attribute: name.to_string(),
                    value: raw.to_string(),
                }),
            })
            .transpose()
    }

    pub fn number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>, ErrorKind> {
        self.get(name)
            .map(|raw| {
                raw.trim().parse::<T>().map_err(|_| ErrorKind::InvalidNumber {
                    attribute: name.to_string(),
                    value: raw.to_string(),
                })
            })
            .transpose()
    }

    /// A whitespace separated list of numbers; absent or blank gives an empty list.
    pub fn number_list(&self, name: &str) -> Result<Vec<i32>, ErrorKind> {
        let Some(raw) = self.get(name) else {
            return Ok(Vec::new());
        };
        raw.split_whitespace()
            .map(|n| {
                n.parse::<i32>().map_err(|_| ErrorKind::InvalidNumber {
                    attribute: name.to_string(),
                    value: raw.to_string(),
                })
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_start_unescapes_values() {
        let start = BytesStart::from_content(r#"parameter name="q" value="a &amp; b""#, 9);
        let attrs = Attributes::from_start(&start).unwrap();
        assert_eq!(attrs.get("name"), Some("q"));
        assert_eq!(attrs.get("value"), Some("a & b"));
        assert_eq!(attrs.get("missing"), None);
    }

    #[test]
    fn test_typed_values() {
        let attrs: Attributes = [
            ("verbose", " 3 "),
            ("junit", "TRUE"),
            ("enabled", "yes"),
            ("thread-count", "many"),
            ("invocation-numbers", "0 2  5"),
            ("name", "   "),
        ]
        .into_iter()
        .collect();

        assert_eq!(attrs.number::<i32>("verbose"), Ok(Some(3)));
        assert_eq!(attrs.flag("junit"), Ok(Some(true)));
        assert_eq!(attrs.flag("absent"), Ok(None));
        assert!(matches!(
            attrs.flag("enabled"),
            Err(ErrorKind::InvalidBoolean { .. })
        ));
        assert!(matches!(
            attrs.number::<i32>("thread-count"),
            Err(ErrorKind::InvalidNumber { .. })
        ));
        assert_eq!(attrs.number_list("invocation-numbers"), Ok(vec![0, 2, 5]));
        assert_eq!(attrs.number_list("absent"), Ok(vec![]));
        assert_eq!(attrs.non_blank("name"), None);
    }
}
