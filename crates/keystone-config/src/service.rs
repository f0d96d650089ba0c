//! Downstream service client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Endpoint scheme that requests service discovery.
pub const DISCOVERY_SCHEME: &str = "discovery:///";

/// Default per-call timeout for downstream clients.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for a downstream gRPC service.
///
/// The endpoint is either a direct address (`http://host:port`,
/// `host:port`) or `discovery:///{service}`, which asks a discovery
/// source for instances.
///
/// ```yaml
/// subscription:
///   endpoint: discovery:///subscription-server
///   service_name: subscription-server
///   timeout: 5s
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Target endpoint.
    pub endpoint: String,

    /// Logical service name.
    pub service_name: String,

    /// Per-call timeout.
    #[serde(with = "duration_serde", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl ServiceConfig {
    /// Discovery endpoint for `service_name` with the default timeout.
    ///
    /// ```
    /// use keystone_config::ServiceConfig;
    ///
    /// let config = ServiceConfig::new("subscription-server");
    /// assert_eq!(config.endpoint, "discovery:///subscription-server");
    /// assert_eq!(config.timeout.as_secs(), 10);
    /// ```
    pub fn new(service_name: impl Into<String>) -> Self {
        let service_name = service_name.into();
        Self {
            endpoint: format!("{DISCOVERY_SCHEME}{service_name}"),
            service_name,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Checks required fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid_value("endpoint", "must not be empty"));
        }
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value("service_name", "must not be empty"));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::invalid_value("timeout", "must be greater than zero"));
        }
        if self.is_discovery() && self.discovery_target().is_none() {
            return Err(ConfigError::invalid_value(
                "endpoint",
                "discovery endpoint names no service",
            ));
        }
        Ok(())
    }

    /// Returns `true` if the endpoint uses service discovery.
    #[must_use]
    pub fn is_discovery(&self) -> bool {
        self.endpoint.starts_with(DISCOVERY_SCHEME)
    }

    /// Service name to resolve for a discovery endpoint.
    #[must_use]
    pub fn discovery_target(&self) -> Option<&str> {
        self.endpoint
            .strip_prefix(DISCOVERY_SCHEME)
            .map(|target| target.trim_end_matches('/'))
            .filter(|target| !target.is_empty())
    }
}

/// Serde support for human-readable durations (`"500ms"`, `"10s"`, `"2m"`,
/// `"1h"`, or bare seconds).
pub mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as whole milliseconds below one second, seconds otherwise.
    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = if duration.subsec_millis() != 0 || duration.as_secs() == 0 {
            format!("{}ms", duration.as_millis())
        } else {
            format!("{}s", duration.as_secs())
        };
        serializer.serialize_str(&text)
    }

    /// Deserializes from a duration string or a number of seconds.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Seconds(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Seconds(n) => Ok(Duration::from_secs(n)),
            Raw::Text(s) => parse_duration(&s).map_err(serde::de::Error::custom),
        }
    }

    /// Parses a duration string.
    pub fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let invalid = || format!("invalid duration: {s:?}");

        let (number, scale): (&str, fn(u64) -> Option<Duration>) =
            if let Some(n) = s.strip_suffix("ms") {
                (n, |n| Some(Duration::from_millis(n)))
            } else if let Some(n) = s.strip_suffix('s') {
                (n, |n| Some(Duration::from_secs(n)))
            } else if let Some(n) = s.strip_suffix('m') {
                (n, |n| n.checked_mul(60).map(Duration::from_secs))
            } else if let Some(n) = s.strip_suffix('h') {
                (n, |n| n.checked_mul(3600).map(Duration::from_secs))
            } else {
                (s, |n| Some(Duration::from_secs(n)))
            };

        let n: u64 = number.trim().parse().map_err(|_| invalid())?;
        scale(n).ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::duration_serde::parse_duration;
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::new("subscription-server");
        assert_eq!(config.service_name, "subscription-server");
        assert!(config.is_discovery());
        assert_eq!(config.discovery_target(), Some("subscription-server"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_direct_endpoint() {
        let config = ServiceConfig::new("subscription-server")
            .with_endpoint("127.0.0.1:9000")
            .with_timeout(Duration::from_secs(3));
        assert!(!config.is_discovery());
        assert_eq!(config.discovery_target(), None);
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_validate() {
        let base = ServiceConfig::new("svc");
        assert!(base.clone().with_endpoint("").validate().is_err());
        assert!(base.clone().with_timeout(Duration::ZERO).validate().is_err());
        assert!(base.clone().with_endpoint("discovery:///").validate().is_err());

        let unnamed = ServiceConfig {
            service_name: " ".to_string(),
            ..base
        };
        assert!(unnamed.validate().is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("500ms"), Ok(Duration::from_millis(500)));
        assert_eq!(parse_duration("10s"), Ok(Duration::from_secs(10)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
        assert_eq!(parse_duration("15"), Ok(Duration::from_secs(15)));
        assert!(parse_duration("soon").is_err());
        assert!(parse_duration("-1s").is_err());
    }

    #[test]
    fn test_serde() {
        let config: ServiceConfig = serde_json::from_str(
            r#"{"endpoint": "discovery:///subscription-server", "service_name": "subscription-server", "timeout": "250ms"}"#,
        )
        .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(250));

        let defaulted: ServiceConfig =
            serde_json::from_str(r#"{"endpoint": "a:1", "service_name": "a"}"#).unwrap();
        assert_eq!(defaulted.timeout, DEFAULT_TIMEOUT);

        let json = serde_json::to_value(ServiceConfig::new("x")).unwrap();
        assert_eq!(json["timeout"], "10s");
    }
}
