//! Parser options.
//!
//! Options can be built in code, read from the process environment, or loaded
//! from a small YAML file:
//!
//! ```yaml
//! allow_insecure_dtd: false
//! use_environment: true
//! properties:
//!   env: staging
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment switch that permits schema references over plain http.
pub const INSECURE_DTD_ENV: &str = "TESTNG_DTD_HTTP";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read options file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid options file '{path}': {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Everything a single parse needs besides the document itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Allow unrecognized schema references over insecure transports.
    pub allow_insecure_dtd: bool,
    /// Primary lookup for `${name}` placeholders.
    pub properties: BTreeMap<String, String>,
    /// Fall back to the process environment when `properties` has no entry.
    pub use_environment: bool,
    /// Origin recorded on every parsed suite.
    pub file_name: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_insecure_dtd: false,
            properties: BTreeMap::new(),
            use_environment: true,
            file_name: None,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the insecure-schema switch taken from the environment.
    pub fn from_env() -> Self {
        let allow = std::env::var(INSECURE_DTD_ENV)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        Self::default().allow_insecure_dtd(allow)
    }

    pub fn from_yaml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })
    }

    /// Load options from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path_str.clone(),
            source,
        })?;
        Self::from_yaml_str(&text, &path_str)
    }

    pub fn allow_insecure_dtd(mut self, allow: bool) -> Self {
        self.allow_insecure_dtd = allow;
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn use_environment(mut self, enabled: bool) -> Self {
        self.use_environment = enabled;
        self
    }

    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}
