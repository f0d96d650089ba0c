//! # Keystone Subscribe
//!
//! gRPC client for the subscription service.
//!
//! - [`Client`] - Owns the channel; built from a [`ServiceConfig`](keystone_config::ServiceConfig)
//! - [`SubscribeClient`] - The four subscription RPCs with per-call timeouts
//! - [`Discovery`] - Resolves `discovery:///{service}` endpoints ([`ConsulDiscovery`], [`StaticDiscovery`])
//! - [`proto`] - Protobuf messages and the generated tonic client
//!
//! Failures are logged with `module = "subscribe-client"` and returned as
//! [`SubscribeError`], which converts into a
//! [`BusinessError`](keystone_core::BusinessError) for handlers.

#![doc(html_root_url = "https://docs.rs/keystone-subscribe/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod discovery;
mod error;
pub mod proto;

pub use client::{
    default_config, from_timestamp, to_timestamp, Client, CreateSubscriptionOptions,
    SubscribeClient, UpgradeSubscriptionOptions, DEFAULT_SERVICE_NAME,
};
pub use discovery::{ConsulDiscovery, Discovery, StaticDiscovery};
pub use error::{DiscoveryError, SubscribeError, SubscribeResult};
pub use proto::v1::{SubscriptionInfo, SubscriptionOrderInfo};
