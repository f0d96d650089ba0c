//! Logging setup for Keystone services.
//!
//! Every Keystone crate logs through `tracing` macros. This crate installs
//! the process-wide subscriber and defines the field names services share,
//! so log lines from the middleware, the config bootstrap and the gRPC
//! clients can be queried together.
//!
//! ```text
//! tracing::info!(..) ──► EnvFilter ──► fmt layer (json | pretty) ──► stdout
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use keystone_telemetry::{init_logging, LogConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&LogConfig::production().with_service_name("iam-server"))?;
//!     tracing::info!("service starting");
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, fields, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
