//! # Keystone
//!
//! **Shared support library for Keystone multi-tenant services**
//!
//! - **Configuration bootstrap** – Local files merged with an optional Consul KV source
//! - **Business errors** – One catalog of codes, type tags and HTTP statuses
//! - **Request pipeline** – Identity extraction and user-type path rules from gateway headers
//! - **Subscription client** – gRPC client for the subscription service
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use keystone::prelude::*;
//!
//! #[derive(clap::Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     bootstrap: BootstrapArgs,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&LogConfig::production().with_service_name("iam-server"))?;
//!
//!     let cli = <Cli as clap::Parser>::parse();
//!     let config = bootstrap_config("iam", &cli.bootstrap).await?;
//!     let rules: PathRuleTable = config.scan_key("middleware.user_type")?;
//!     let pipeline = Pipeline::identity_and_access(std::sync::Arc::new(rules));
//!
//!     let subscriptions = Client::new(Some(config.scan_key("clients.subscription")?))?;
//!     // hand `pipeline` and `subscriptions` to the server
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Request → Identity → UserType → Handler
//!              │           │
//!              └─ BusinessError (AUTH_HEADER_MISSING, TENANT_INVALID, ACCESS_FORBIDDEN, ...)
//! ```

#![doc(html_root_url = "https://docs.rs/keystone/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use keystone_core as core;

// Re-export middleware types
pub use keystone_middleware as middleware;

// Re-export configuration types
pub use keystone_config as config;

// Re-export logging setup
pub use keystone_telemetry as telemetry;

// Re-export subscription client
pub use keystone_subscribe as subscribe;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```
/// use keystone::prelude::*;
///
/// let err = BusinessError::from(ErrorKind::AccessForbidden);
/// assert_eq!(err.http_code(), 403);
/// ```
pub mod prelude {
    pub use keystone_core::{
        classify_error, wrap_error, BusinessError, BusinessResult, ErrorKind, IdentityClaim,
        UserType,
    };

    // Re-export pipeline types
    pub use keystone_middleware::{
        IdentityMiddleware, Middleware, MiddlewareContext, Next, PathRuleTable, Pipeline,
        PipelineResult, PrefixMatch, ResponseExt, ServerTransport, UserTypeMiddleware,
    };

    // Re-export configuration types
    pub use keystone_config::{
        bootstrap_config, BootstrapArgs, Config, ConfigError, ConfigLoader, ServiceConfig,
    };

    // Re-export logging setup
    pub use keystone_telemetry::{init_logging, LogConfig};

    // Re-export subscription client
    pub use keystone_subscribe::{Client, SubscribeClient, SubscribeError};
}
