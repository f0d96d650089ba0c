//! Service configuration bootstrap.
//!
//! Every service starts the same way: read the local config path from
//! `--conf`, optionally add a Consul KV source, merge, and hand the result
//! to the service for scanning.
//!
//! Resolution order for the Consul settings is flag, then environment:
//!
//! | Setting | Flag            | Env           | Default                           |
//! |---------|-----------------|---------------|-----------------------------------|
//! | address | `--consul-addr` | `CONSUL_ADDR` | none (Consul disabled)            |
//! | path    | `--consul-path` | `CONSUL_PATH` | `configs/{service_name}config.yaml` |
//!
//! The local file source is always present and comes first, so keys in
//! Consul override the local files.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::config::{Config, ConfigLoader};
use crate::consul::ConsulKvSource;
use crate::env::{EnvSource, ProcessEnv};
use crate::source::FileSource;
use crate::ConfigError;

/// Default local configuration path.
pub const DEFAULT_CONF_PATH: &str = "../../configs";

/// Env var holding the Consul agent address.
pub const CONSUL_ADDR_ENV: &str = "CONSUL_ADDR";

/// Env var holding the Consul KV path.
pub const CONSUL_PATH_ENV: &str = "CONSUL_PATH";

/// Env var holding the Consul ACL token.
pub const CONSUL_TOKEN_ENV: &str = "CONSUL_HTTP_TOKEN";

/// Bootstrap command-line flags.
///
/// Flatten into a service's own CLI:
///
/// ```
/// use clap::Parser;
/// use keystone_config::BootstrapArgs;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     bootstrap: BootstrapArgs,
/// }
///
/// let cli = Cli::parse_from(["iam-server", "--conf", "/etc/iam", "--consul-addr", "consul:8500"]);
/// assert_eq!(cli.bootstrap.consul_addr.as_deref(), Some("consul:8500"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct BootstrapArgs {
    /// Local config path (file or directory)
    #[arg(long = "conf", value_name = "PATH", default_value = DEFAULT_CONF_PATH)]
    pub conf: PathBuf,

    /// Consul agent address
    #[arg(long = "consul-addr", alias = "consul_addr", value_name = "ADDR")]
    pub consul_addr: Option<String>,

    /// Consul KV path holding the service config
    #[arg(long = "consul-path", alias = "consul_path", value_name = "PATH")]
    pub consul_path: Option<String>,
}

impl Default for BootstrapArgs {
    fn default() -> Self {
        Self {
            conf: PathBuf::from(DEFAULT_CONF_PATH),
            consul_addr: None,
            consul_path: None,
        }
    }
}

/// Resolved bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapPlan {
    /// Local config path.
    pub conf: PathBuf,
    /// Consul address; `None` disables the Consul source.
    pub consul_addr: Option<String>,
    /// Consul KV path.
    pub consul_path: String,
    /// Consul ACL token.
    pub consul_token: Option<String>,
}

impl BootstrapPlan {
    /// Returns `true` when a Consul source will be added.
    #[must_use]
    pub fn uses_consul(&self) -> bool {
        self.consul_addr.is_some()
    }

    /// Builds the loader for this plan.
    pub fn loader(&self) -> Result<ConfigLoader, ConfigError> {
        let mut loader = ConfigLoader::new().with_source(FileSource::new(&self.conf));

        if let Some(addr) = &self.consul_addr {
            let mut consul = ConsulKvSource::new(addr, self.consul_path.clone())?;
            if let Some(token) = &self.consul_token {
                consul = consul.with_token(token.clone());
            }
            loader = loader.with_source(consul);
        }

        Ok(loader)
    }
}

impl BootstrapArgs {
    /// Resolves flags against the process environment.
    #[must_use]
    pub fn resolve(&self, service_name: &str) -> BootstrapPlan {
        self.resolve_with(service_name, &ProcessEnv::new())
    }

    /// Resolves flags against the given environment.
    ///
    /// Empty flag or env values count as unset.
    ///
    /// ```
    /// use keystone_config::{BootstrapArgs, MapEnv};
    ///
    /// let plan = BootstrapArgs::default().resolve_with("iam", &MapEnv::new());
    /// assert_eq!(plan.consul_path, "configs/iamconfig.yaml");
    /// assert!(!plan.uses_consul());
    /// ```
    #[must_use]
    pub fn resolve_with(&self, service_name: &str, env: &dyn EnvSource) -> BootstrapPlan {
        let consul_addr = non_empty(self.consul_addr.clone())
            .or_else(|| non_empty(env.var(CONSUL_ADDR_ENV)));

        let consul_path = non_empty(self.consul_path.clone())
            .or_else(|| non_empty(env.var(CONSUL_PATH_ENV)))
            .unwrap_or_else(|| default_consul_path(service_name));

        BootstrapPlan {
            conf: self.conf.clone(),
            consul_addr,
            consul_path,
            consul_token: non_empty(env.var(CONSUL_TOKEN_ENV)),
        }
    }
}

/// Default Consul KV path for a service.
#[must_use]
pub fn default_consul_path(service_name: &str) -> String {
    format!("configs/{service_name}config.yaml")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Loads a service's configuration.
///
/// Loads `.env` first, resolves `args` against the process environment and
/// merges the local file source with the optional Consul source.
pub async fn bootstrap_config(service_name: &str, args: &BootstrapArgs) -> Result<Config, ConfigError> {
    bootstrap_config_with(service_name, args, Arc::new(ProcessEnv::with_dotenv())).await
}

/// [`bootstrap_config`] with an explicit environment.
pub async fn bootstrap_config_with(
    service_name: &str,
    args: &BootstrapArgs,
    env: Arc<dyn EnvSource>,
) -> Result<Config, ConfigError> {
    let plan = args.resolve_with(service_name, env.as_ref());
    tracing::info!(
        service = service_name,
        conf = %plan.conf.display(),
        consul_addr = plan.consul_addr.as_deref().unwrap_or(""),
        consul_path = %plan.consul_path,
        "bootstrapping configuration"
    );

    plan.loader()?.with_env(env).load().await
}
