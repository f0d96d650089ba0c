//! Service instance discovery.
//!
//! A [`Discovery`] turns a logical service name into gRPC endpoint URLs.
//! [`ConsulDiscovery`] asks the Consul health API for passing instances;
//! [`StaticDiscovery`] serves a fixed table and is handy in tests and local
//! setups.

use std::collections::HashMap;

use keystone_config::BoxFuture;
use reqwest::Client;
use serde::Deserialize;

use crate::error::DiscoveryError;

/// Header carrying the Consul ACL token.
const CONSUL_TOKEN_HEADER: &str = "X-Consul-Token";

/// Tagged address key under which gRPC endpoints are registered.
const GRPC_TAGGED_ADDRESS: &str = "grpc";

/// Resolves a service name to endpoint URLs (`http://host:port`).
pub trait Discovery: Send + Sync {
    /// Returns the current instances of `service_name`.
    fn resolve<'a>(&'a self, service_name: &'a str)
        -> BoxFuture<'a, Result<Vec<String>, DiscoveryError>>;
}

/// Fixed service table.
#[derive(Debug, Clone, Default)]
pub struct StaticDiscovery {
    services: HashMap<String, Vec<String>>,
}

impl StaticDiscovery {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the instances of a service.
    #[must_use]
    pub fn with_service<I, S>(mut self, service_name: impl Into<String>, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.services.insert(
            service_name.into(),
            endpoints.into_iter().map(Into::into).collect(),
        );
        self
    }
}

impl Discovery for StaticDiscovery {
    fn resolve<'a>(
        &'a self,
        service_name: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, DiscoveryError>> {
        let endpoints = self.services.get(service_name).cloned().unwrap_or_default();
        Box::pin(async move { Ok(endpoints) })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HealthEntry {
    node: NodeEntry,
    service: ServiceEntry,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NodeEntry {
    #[serde(default)]
    address: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ServiceEntry {
    #[serde(default)]
    address: String,
    #[serde(default)]
    port: u16,
    #[serde(default)]
    tagged_addresses: HashMap<String, TaggedAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TaggedAddress {
    address: String,
    port: u16,
}

impl HealthEntry {
    fn endpoint(&self) -> Option<String> {
        if let Some(tagged) = self.service.tagged_addresses.get(GRPC_TAGGED_ADDRESS) {
            return Some(format!("http://{}:{}", tagged.address, tagged.port));
        }
        let host = if self.service.address.is_empty() {
            &self.node.address
        } else {
            &self.service.address
        };
        if host.is_empty() || self.service.port == 0 {
            return None;
        }
        Some(format!("http://{host}:{}", self.service.port))
    }
}

/// Consul health API discovery.
///
/// Issues `GET {addr}/v1/health/service/{name}?passing=true` and prefers a
/// service's `grpc` tagged address over its plain address.
#[derive(Debug, Clone)]
pub struct ConsulDiscovery {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ConsulDiscovery {
    /// Creates a discovery client for the agent at `addr`.
    ///
    /// `http://` is assumed when `addr` has no scheme.
    pub fn new(addr: &str) -> Result<Self, DiscoveryError> {
        let addr = addr.trim().trim_end_matches('/');
        if addr.is_empty() {
            return Err(DiscoveryError::InvalidAddress("address is empty".to_string()));
        }
        let base_url = if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };
        Ok(Self {
            client: Client::new(),
            base_url,
            token: None,
        })
    }

    /// Sets the ACL token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the agent base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch(&self, service_name: &str) -> Result<Vec<String>, DiscoveryError> {
        let url = format!("{}/v1/health/service/{service_name}", self.base_url);
        let mut request = self.client.get(&url).query(&[("passing", "true")]);
        if let Some(token) = &self.token {
            request = request.header(CONSUL_TOKEN_HEADER, token);
        }

        let response = request.send().await.map_err(|source| DiscoveryError::Request {
            url: url.clone(),
            source,
        })?;
        if !response.status().is_success() {
            return Err(DiscoveryError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let entries: Vec<HealthEntry> = response
            .json()
            .await
            .map_err(|source| DiscoveryError::Request { url, source })?;

        let endpoints: Vec<String> = entries.iter().filter_map(HealthEntry::endpoint).collect();
        tracing::debug!(
            service = service_name,
            instances = endpoints.len(),
            "resolved service instances"
        );
        Ok(endpoints)
    }
}

impl Discovery for ConsulDiscovery {
    fn resolve<'a>(
        &'a self,
        service_name: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, DiscoveryError>> {
        Box::pin(self.fetch(service_name))
    }
}
