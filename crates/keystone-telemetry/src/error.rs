//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Invalid filter directive.
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser message.
        reason: String,
    },
}

impl TelemetryError {
    /// Creates an invalid filter error.
    pub fn invalid_filter(directive: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::InvalidFilter {
            directive: directive.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("already set".to_string());
        assert_eq!(err.to_string(), "Failed to initialize logging: already set");

        let err = TelemetryError::invalid_filter("keystone=loud", "invalid level");
        assert_eq!(
            err.to_string(),
            "Invalid log filter 'keystone=loud': invalid level"
        );
    }
}
