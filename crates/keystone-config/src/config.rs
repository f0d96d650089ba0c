//! Merged configuration document and its loader.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::env::{parse_bool, EnvSource, ProcessEnv};
use crate::format::Format;
use crate::source::{MemorySource, Source};
use crate::ConfigError;

/// A merged configuration document.
///
/// # Example
///
/// ```
/// use keystone_config::{Config, Format};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Http {
///     addr: String,
/// }
///
/// let config = Config::from_str("server:\n  http:\n    addr: 0.0.0.0:8000\n", Format::Yaml).unwrap();
///
/// assert_eq!(config.value("server.http.addr").unwrap(), "0.0.0.0:8000");
/// let http: Http = config.scan_key("server.http").unwrap();
/// assert_eq!(http.addr, "0.0.0.0:8000");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    document: Value,
}

impl Config {
    /// Wraps an already merged document.
    #[must_use]
    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    /// Decodes a single document.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str, format: Format) -> Result<Self, ConfigError> {
        let document = format.decode("inline", content.as_bytes())?;
        Ok(Self::from_value(normalize(document)))
    }

    /// Returns the whole document.
    #[must_use]
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Looks up a dotted key such as `"data.database.source"`.
    ///
    /// Numeric segments index into arrays. An empty key returns the root.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return Some(&self.document);
        }
        key.split('.').try_fold(&self.document, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
    }

    /// Returns `true` if the dotted key exists.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    /// Deserializes the whole document.
    pub fn scan<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        serde_json::from_value(self.document.clone()).map_err(|source| ConfigError::Scan {
            key: String::new(),
            source,
        })
    }

    /// Deserializes the section at a dotted key.
    pub fn scan_key<T: DeserializeOwned>(&self, key: &str) -> Result<T, ConfigError> {
        let value = self
            .value(key)
            .ok_or_else(|| ConfigError::key_not_found(key))?;
        serde_json::from_value(value.clone()).map_err(|source| ConfigError::Scan {
            key: key.to_string(),
            source,
        })
    }

    fn merge(&mut self, overlay: Value) {
        merge_values(&mut self.document, overlay);
    }
}

/// Deep-merges `overlay` into `base`.
///
/// Objects merge key by key; any other overlay value replaces the base.
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// Empty YAML documents decode to null.
fn normalize(value: Value) -> Value {
    if value.is_null() {
        Value::Object(Map::new())
    } else {
        value
    }
}

/// Layered configuration loader.
///
/// Sources are loaded in the order they were added; later sources override
/// earlier ones key by key. Environment overrides, when enabled, apply last.
///
/// # Example
///
/// ```no_run
/// use keystone_config::{ConfigLoader, FileSource};
///
/// # async fn run() -> Result<(), keystone_config::ConfigError> {
/// let config = ConfigLoader::new()
///     .with_source(FileSource::new("../../configs"))
///     .with_env_prefix("IAM")
///     .load()
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    sources: Vec<Box<dyn Source>>,
    env_prefix: Option<String>,
    env: Arc<dyn EnvSource>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigLoader")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("env_prefix", &self.env_prefix)
            .finish_non_exhaustive()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            env_prefix: None,
            env: Arc::new(ProcessEnv::new()),
        }
    }

    /// Appends a source.
    #[must_use]
    pub fn with_source<S: Source + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Appends an in-memory document.
    #[must_use]
    pub fn with_string(self, content: &str, format: Format) -> Self {
        let name = format!("string-{}", self.sources.len());
        self.with_source(MemorySource::new(name, content, format))
    }

    /// Enables environment overrides of the form `PREFIX__SECTION__KEY`.
    ///
    /// With prefix `IAM`, `IAM__SERVER__HTTP__ADDR=0.0.0.0:9000` sets
    /// `server.http.addr`. Values that parse as integers, floats or booleans
    /// are stored typed; everything else is a string.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Replaces the environment used for overrides.
    #[must_use]
    pub fn with_env(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    /// Returns the number of configured sources.
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Loads and merges every source, then applies environment overrides.
    pub async fn load(self) -> Result<Config, ConfigError> {
        let mut config = Config::from_value(Value::Object(Map::new()));

        for source in &self.sources {
            let name = source.name();
            let kvs = source.load().await.map_err(|e| {
                tracing::error!(source = %name, error = %e, "failed to load configuration source");
                e
            })?;

            for kv in &kvs {
                let document = kv.format.decode(&kv.key, &kv.value)?;
                config.merge(normalize(document));
            }
            tracing::info!(source = %name, keys = kvs.len(), "configuration source loaded");
        }

        if let Some(prefix) = &self.env_prefix {
            apply_env_overrides(&mut config, prefix, self.env.as_ref());
        }

        Ok(config)
    }
}

fn apply_env_overrides(config: &mut Config, prefix: &str, env: &dyn EnvSource) {
    let marker = format!("{prefix}__");
    let mut vars = env.vars();
    vars.sort();

    for (key, value) in vars {
        let Some(path) = key.strip_prefix(&marker) else {
            continue;
        };
        let segments: Vec<String> = path
            .split("__")
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
            .collect();
        if segments.is_empty() {
            continue;
        }

        let overlay = segments
            .iter()
            .rev()
            .fold(env_value(&value), |inner, segment| {
                let mut map = Map::new();
                map.insert(segment.clone(), inner);
                Value::Object(map)
            });
        tracing::debug!(var = %key, "applying environment override");
        config.merge(overlay);
    }
}

fn env_value(raw: &str) -> Value {
    if let Ok(n) = raw.parse::<i64>() {
        return Value::from(n);
    }
    if let Some(b) = parse_bool(raw) {
        return Value::Bool(b);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    Value::String(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_value_lookup() {
        let config = Config::from_value(json!({
            "server": {"http": {"addr": ":8000"}},
            "brokers": ["a:9092", "b:9092"]
        }));

        assert_eq!(config.value("server.http.addr"), Some(&json!(":8000")));
        assert_eq!(config.value("brokers.1"), Some(&json!("b:9092")));
        assert_eq!(config.value("server.grpc"), None);
        assert_eq!(config.value("server.http.addr.port"), None);
        assert!(config.contains(""));
    }

    #[test]
    fn test_deep_merge() {
        let mut base = json!({"server": {"http": {"addr": ":8000", "timeout": "1s"}}, "list": [1, 2]});
        merge_values(
            &mut base,
            json!({"server": {"http": {"addr": ":9000"}, "grpc": {"addr": ":9001"}}, "list": [3]}),
        );
        assert_eq!(
            base,
            json!({
                "server": {"http": {"addr": ":9000", "timeout": "1s"}, "grpc": {"addr": ":9001"}},
                "list": [3]
            })
        );
    }

    #[test]
    fn test_scan() {
        #[derive(Deserialize)]
        struct Data {
            driver: String,
            max_conns: u32,
        }

        let config = Config::from_value(json!({"data": {"driver": "mysql", "max_conns": 20}}));
        let data: Data = config.scan_key("data").unwrap();
        assert_eq!(data.driver, "mysql");
        assert_eq!(data.max_conns, 20);

        assert!(matches!(
            config.scan_key::<Data>("cache"),
            Err(ConfigError::KeyNotFound { .. })
        ));
        assert!(matches!(
            config.scan_key::<u32>("data"),
            Err(ConfigError::Scan { .. })
        ));
    }

    #[test]
    fn test_empty_yaml_document() {
        let config = Config::from_str("", Format::Yaml).unwrap();
        assert_eq!(config.document(), &json!({}));
    }

    #[test]
    fn test_env_value_typing() {
        assert_eq!(env_value("42"), json!(42));
        assert_eq!(env_value("true"), json!(true));
        assert_eq!(env_value("0.5"), json!(0.5));
        assert_eq!(env_value("0.0.0.0:8000"), json!("0.0.0.0:8000"));
    }

    #[tokio::test]
    async fn test_loader_layers_sources() {
        let config = ConfigLoader::new()
            .with_string("server:\n  http:\n    addr: \":8000\"\n    timeout: 1s\n", Format::Yaml)
            .with_string("[server.http]\naddr = \":9000\"\n", Format::Toml)
            .load()
            .await
            .unwrap();

        assert_eq!(config.value("server.http.addr"), Some(&json!(":9000")));
        assert_eq!(config.value("server.http.timeout"), Some(&json!("1s")));
    }

    #[tokio::test]
    async fn test_loader_env_overrides() {
        let env = MapEnv::new()
            .with("IAM__SERVER__HTTP__ADDR", "0.0.0.0:9000")
            .with("IAM__DATA__MAX_CONNS", "50")
            .with("OTHER__SERVER__HTTP__ADDR", "ignored");

        let config = ConfigLoader::new()
            .with_string(r#"{"server": {"http": {"addr": ":8000"}}}"#, Format::Json)
            .with_env_prefix("iam")
            .with_env(Arc::new(env))
            .load()
            .await
            .unwrap();

        assert_eq!(config.value("server.http.addr"), Some(&json!("0.0.0.0:9000")));
        assert_eq!(config.value("data.max_conns"), Some(&json!(50)));
    }

    #[tokio::test]
    async fn test_loader_decode_error() {
        let err = ConfigLoader::new()
            .with_string("{broken", Format::Json)
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: Format::Json, .. }));
    }
}
