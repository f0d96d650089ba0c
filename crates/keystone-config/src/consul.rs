//! Consul KV configuration source.
//!
//! Reads every key under a path with one
//! `GET {addr}/v1/kv/{path}?recurse=true` request. Values arrive base64
//! encoded; each key is decoded by its extension. Keys without a supported
//! extension and folder markers (keys ending in `/`) are skipped.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::format::Format;
use crate::source::{BoxFuture, KeyValue, Source};
use crate::ConfigError;

/// Header carrying the Consul ACL token.
pub const CONSUL_TOKEN_HEADER: &str = "X-Consul-Token";

/// One entry of the Consul KV list response.
#[derive(Debug, Deserialize)]
struct KvPair {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value")]
    value: Option<String>,
}

/// Consul KV source.
#[derive(Debug, Clone)]
pub struct ConsulKvSource {
    client: Client,
    base_url: String,
    path: String,
    token: Option<String>,
}

impl ConsulKvSource {
    /// Creates a source for `path` on the agent at `addr`.
    ///
    /// `addr` may omit the scheme (`127.0.0.1:8500`); `http://` is assumed.
    pub fn new(addr: &str, path: impl Into<String>) -> Result<Self, ConfigError> {
        let addr = addr.trim().trim_end_matches('/');
        if addr.is_empty() {
            return Err(ConfigError::invalid_value("consul_addr", "must not be empty"));
        }
        let base_url = if addr.contains("://") {
            addr.to_string()
        } else {
            format!("http://{addr}")
        };

        Ok(Self {
            client: Client::new(),
            base_url,
            path: path.into().trim_matches('/').to_string(),
            token: None,
        })
    }

    /// Sets the ACL token sent with every request.
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

    /// Returns the KV path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn url(&self) -> String {
        format!("{}/v1/kv/{}?recurse=true", self.base_url, self.path)
    }

    async fn fetch(&self) -> Result<Vec<KeyValue>, ConfigError> {
        let url = self.url();
        let mut request = self.client.get(&url);
        if let Some(token) = &self.token {
            request = request.header(CONSUL_TOKEN_HEADER, token);
        }

        let response = request.send().await.map_err(|source| ConfigError::Remote {
            url: url.clone(),
            source,
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::warn!(path = %self.path, "no consul keys found under path");
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(ConfigError::RemoteStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        let pairs: Vec<KvPair> = response
            .json()
            .await
            .map_err(|source| ConfigError::Remote { url, source })?;

        self.decode_pairs(pairs)
    }

    fn decode_pairs(&self, pairs: Vec<KvPair>) -> Result<Vec<KeyValue>, ConfigError> {
        let prefix = format!("{}/", self.path);
        let mut kvs = Vec::with_capacity(pairs.len());

        for pair in pairs {
            if pair.key.ends_with('/') {
                continue;
            }
            let Some(encoded) = pair.value else {
                continue;
            };
            let Some(format) = Format::from_path(&pair.key) else {
                tracing::debug!(key = %pair.key, "skipping consul key without supported extension");
                continue;
            };

            let value = STANDARD.decode(encoded.as_bytes()).map_err(|source| {
                ConfigError::Decode {
                    key: pair.key.clone(),
                    source,
                }
            })?;
            let key = pair
                .key
                .strip_prefix(&prefix)
                .map_or_else(|| pair.key.clone(), str::to_string);
            kvs.push(KeyValue::new(key, value, format));
        }

        Ok(kvs)
    }
}

impl Source for ConsulKvSource {
    fn name(&self) -> String {
        format!("consul:{}/{}", self.base_url, self.path)
    }

    fn load(&self) -> BoxFuture<'_, Result<Vec<KeyValue>, ConfigError>> {
        Box::pin(self.fetch())
    }
}
