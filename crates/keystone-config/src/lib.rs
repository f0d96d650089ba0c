//! Configuration bootstrap for Keystone services.
//!
//! Services load their configuration from a local path (a file or a
//! directory of files) and, when an address is configured, from Consul KV.
//! Documents are decoded by extension (YAML, JSON or TOML), deep-merged in
//! source order, and scanned into typed structs.
//!
//! ```text
//! --conf ../../configs ──► FileSource ─┐
//!                                      ├─► merge ──► Config ──► scan_key::<T>("data")
//! CONSUL_ADDR / CONSUL_PATH ► Consul ──┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use clap::Parser;
//! use keystone_config::{bootstrap_config, BootstrapArgs, ServiceConfig};
//!
//! #[derive(Parser)]
//! struct Cli {
//!     #[command(flatten)]
//!     bootstrap: BootstrapArgs,
//! }
//!
//! # async fn run() -> Result<(), keystone_config::ConfigError> {
//! let cli = Cli::parse();
//! let config = bootstrap_config("iam", &cli.bootstrap).await?;
//! let subscription: ServiceConfig = config.scan_key("clients.subscription")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod bootstrap;
mod config;
mod consul;
mod env;
mod error;
mod format;
mod service;
mod source;

pub use bootstrap::{
    bootstrap_config, bootstrap_config_with, default_consul_path, BootstrapArgs, BootstrapPlan,
    CONSUL_ADDR_ENV, CONSUL_PATH_ENV, CONSUL_TOKEN_ENV, DEFAULT_CONF_PATH,
};
pub use config::{merge_values, Config, ConfigLoader};
pub use consul::{ConsulKvSource, CONSUL_TOKEN_HEADER};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::ConfigError;
pub use format::Format;
pub use service::{duration_serde, ServiceConfig, DEFAULT_TIMEOUT, DISCOVERY_SCHEME};
pub use source::{BoxFuture, FileSource, KeyValue, MemorySource, Source};
