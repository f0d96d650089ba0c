//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::format::Format;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file or directory not found.
    #[error("configuration path not found: {path}")]
    FileNotFound {
        /// Path that does not exist.
        path: PathBuf,
    },

    /// Failed to read a configuration file.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file or key has no supported extension.
    #[error("unsupported configuration format: {name}")]
    UnsupportedFormat {
        /// File name or KV key.
        name: String,
    },

    /// A file or key could not be decoded.
    #[error("failed to parse {format} configuration '{name}': {reason}")]
    Parse {
        /// File name or KV key.
        name: String,
        /// Format that was attempted.
        format: Format,
        /// Decoder message.
        reason: String,
    },

    /// The remote KV store could not be reached.
    #[error("request to {url} failed")]
    Remote {
        /// Requested URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The remote KV store answered with an error status.
    #[error("request to {url} returned HTTP {status}")]
    RemoteStatus {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// A KV value was not valid base64.
    #[error("failed to decode value of key '{key}'")]
    Decode {
        /// The KV key.
        key: String,
        /// Underlying error.
        #[source]
        source: base64::DecodeError,
    },

    /// A requested key is absent from the merged document.
    #[error("configuration key not found: {key}")]
    KeyNotFound {
        /// Dotted key path.
        key: String,
    },

    /// The document (or a section of it) does not match the target type.
    #[error("failed to scan configuration key '{key}'")]
    Scan {
        /// Dotted key path, empty for the whole document.
        key: String,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value.
    #[error("invalid configuration value for {field}: {reason}")]
    InvalidValue {
        /// The field with the invalid value.
        field: String,
        /// Explanation of why the value is invalid.
        reason: String,
    },

    /// Validation error after loading.
    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}

impl ConfigError {
    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Create a new unsupported format error.
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat { name: name.into() }
    }

    /// Create a new parse error.
    pub fn parse(name: impl Into<String>, format: Format, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            name: name.into(),
            format,
            reason: reason.to_string(),
        }
    }

    /// Create a new key not found error.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound { key: key.into() }
    }

    /// Create a new invalid value error.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a new validation error.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error() {
        let err = ConfigError::file_not_found("../../configs");
        assert!(err.to_string().contains("../../configs"));
    }

    #[test]
    fn test_parse_error() {
        let err = ConfigError::parse("config.yaml", Format::Yaml, "did not find expected key");
        let message = err.to_string();
        assert!(message.contains("yaml"));
        assert!(message.contains("config.yaml"));
        assert!(message.contains("did not find expected key"));
    }

    #[test]
    fn test_remote_status_error() {
        let err = ConfigError::RemoteStatus {
            url: "http://consul:8500/v1/kv/configs".to_string(),
            status: 403,
        };
        assert!(err.to_string().contains("HTTP 403"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ConfigError::invalid_value("timeout", "must be greater than zero");
        assert!(err.to_string().contains("timeout"));
        assert!(err.to_string().contains("must be greater than zero"));
    }

    #[test]
    fn test_key_not_found_error() {
        let err = ConfigError::key_not_found("data.database");
        assert_eq!(err.to_string(), "configuration key not found: data.database");
    }
}
