//! Structured logging for Keystone services.
//!
//! Installs a global `tracing` subscriber: JSON lines in production, pretty
//! multi-line output in development. The filter comes from `RUST_LOG` when
//! set (and allowed), otherwise from [`LogConfig::level`].
//!
//! # Example
//!
//! ```rust,ignore
//! use keystone_telemetry::logging::{init_logging, LogConfig, fields};
//!
//! init_logging(&LogConfig::production().with_service_name("iam-server"))?;
//!
//! tracing::info!(tenant_id = 42, module = "subscribe-client", "subscription created");
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Logging configuration.
///
/// Deserializable so it can live in a service's `log:` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g. `"info"` or `"keystone_config=debug,info"`).
    pub level: String,

    /// Whether `RUST_LOG` overrides `level`.
    pub env_override: bool,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Service name, logged once at startup.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Human-readable output at `debug`.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            env_override: true,
            json_format: false,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
            service_name: "keystone".to_string(),
        }
    }

    /// JSON output at `info`.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            env_override: true,
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
            service_name: "keystone".to_string(),
        }
    }

    /// Sets the service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Sets the filter directive.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    fn filter(&self) -> TelemetryResult<EnvFilter> {
        if self.env_override {
            if let Ok(filter) = EnvFilter::try_from_default_env() {
                return Ok(filter);
            }
        }
        create_env_filter(&self.level)
    }
}

/// Initializes the global logging subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = config.filter()?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    tracing::debug!(
        service.name = %config.service_name,
        json = config.json_format,
        "logging initialized"
    );
    Ok(())
}

/// Parses a filter directive such as `"info"` or `"keystone_config=debug,warn"`.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive).map_err(|e| TelemetryError::invalid_filter(directive, e))
}

/// Standard log field names.
///
/// Use these for consistency across services.
pub mod fields {
    /// Module (component) emitting the event.
    pub const MODULE: &str = "module";

    /// Pipeline stage name.
    pub const STAGE: &str = "stage";

    /// Caller user id.
    pub const USER_ID: &str = "user_id";

    /// Caller user type tag.
    pub const USER_TYPE: &str = "user_type";

    /// Caller tenant id.
    pub const TENANT_ID: &str = "tenant_id";

    /// Business error type tag.
    pub const ERROR_TYPE: &str = "error_type";

    /// Error description.
    pub const ERROR: &str = "error";

    /// Transport operation (HTTP method + path or gRPC method).
    pub const OPERATION: &str = "operation";

    /// HTTP path.
    pub const HTTP_PATH: &str = "http.path";

    /// Configuration source name.
    pub const SOURCE: &str = "source";

    /// Duration field name (in milliseconds).
    pub const DURATION_MS: &str = "duration_ms";

    /// Service name field name.
    pub const SERVICE_NAME: &str = "service.name";
}
