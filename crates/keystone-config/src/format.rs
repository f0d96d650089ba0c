//! Configuration encodings.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ConfigError;

/// Encoding of a configuration file or KV value, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
    /// `.toml`
    Toml,
}

impl Format {
    /// Parses a format name or extension (case-insensitive).
    ///
    /// ```
    /// use keystone_config::Format;
    ///
    /// assert_eq!(Format::from_name("YML"), Some(Format::Yaml));
    /// assert_eq!(Format::from_name("ini"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Detects the format from a file name or KV key extension.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_name)
    }

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }

    /// Decodes raw bytes into a JSON-shaped document.
    ///
    /// `name` only feeds error messages.
    pub fn decode(self, name: &str, bytes: &[u8]) -> Result<Value, ConfigError> {
        match self {
            Self::Yaml => {
                serde_yaml::from_slice(bytes).map_err(|e| ConfigError::parse(name, self, e))
            }
            Self::Json => {
                serde_json::from_slice(bytes).map_err(|e| ConfigError::parse(name, self, e))
            }
            Self::Toml => {
                let text =
                    std::str::from_utf8(bytes).map_err(|e| ConfigError::parse(name, self, e))?;
                toml::from_str(text).map_err(|e| ConfigError::parse(name, self, e))
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_path() {
        assert_eq!(Format::from_path("configs/iamconfig.yaml"), Some(Format::Yaml));
        assert_eq!(Format::from_path("config.yml"), Some(Format::Yaml));
        assert_eq!(Format::from_path("/etc/app/config.JSON"), Some(Format::Json));
        assert_eq!(Format::from_path("Cargo.toml"), Some(Format::Toml));
        assert_eq!(Format::from_path("README"), None);
        assert_eq!(Format::from_path("notes.md"), None);
    }

    #[test]
    fn test_decode_yaml() {
        let value = Format::Yaml
            .decode("c.yaml", b"server:\n  http:\n    addr: 0.0.0.0:8000\n")
            .unwrap();
        assert_eq!(value, json!({"server": {"http": {"addr": "0.0.0.0:8000"}}}));
    }

    #[test]
    fn test_decode_toml() {
        let value = Format::Toml
            .decode("c.toml", b"[data]\nmax_conns = 10\n")
            .unwrap();
        assert_eq!(value, json!({"data": {"max_conns": 10}}));
    }

    #[test]
    fn test_decode_error_names_source() {
        let err = Format::Json.decode("remote/app.json", b"{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref name, format: Format::Json, .. } if name == "remote/app.json"));
    }
}
