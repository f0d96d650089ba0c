//! Subscription service client.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use keystone_config::{ConfigError, ServiceConfig};
use prost_types::Timestamp;
use tonic::transport::{Channel, Endpoint};

use crate::discovery::Discovery;
use crate::error::{DiscoveryError, SubscribeError, SubscribeResult};
use crate::proto::v1::subscribe_internal_service_client::SubscribeInternalServiceClient;
use crate::proto::v1::{
    CreateSubscriptionRequest, ListSubscriptionsRequest, ReNewSubscriptionRequest,
    SubscriptionInfo, SubscriptionOrderInfo, UpgradeSubscriptionRequest,
};

/// Service name used for discovery by default.
pub const DEFAULT_SERVICE_NAME: &str = "subscription-server";

const MODULE: &str = "subscribe-client";

/// Default client configuration: `discovery:///subscription-server`, 10s.
#[must_use]
pub fn default_config() -> ServiceConfig {
    ServiceConfig::new(DEFAULT_SERVICE_NAME)
}

/// Connection to the subscription service.
///
/// Channels connect lazily; both constructors must run inside a Tokio
/// runtime.
///
/// ```no_run
/// use std::sync::Arc;
/// use keystone_subscribe::{Client, ConsulDiscovery};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let discovery = Arc::new(ConsulDiscovery::new("127.0.0.1:8500")?);
/// let client = Client::with_discovery(None, discovery).await?;
///
/// let subscriptions = client
///     .subscribe_client()
///     .get_tenant_subscriptions(42, "crm")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    config: ServiceConfig,
    subscribe: SubscribeClient,
}

impl Client {
    /// Connects to a direct endpoint. `None` uses [`default_config`].
    ///
    /// A `discovery:///` endpoint is rejected here; use
    /// [`Client::with_discovery`].
    pub fn new(config: Option<ServiceConfig>) -> SubscribeResult<Self> {
        let config = config.unwrap_or_else(default_config);
        config.validate()?;
        if config.is_discovery() {
            return Err(ConfigError::invalid_value(
                "endpoint",
                format!("{} requires a discovery source", config.endpoint),
            )
            .into());
        }

        let channel = endpoint(&config.endpoint, config.timeout)?.connect_lazy();
        tracing::info!(
            module = MODULE,
            endpoint = %config.endpoint,
            timeout = ?config.timeout,
            "subscription client created"
        );
        Ok(Self::from_channel(config, channel))
    }

    /// Resolves instances through `discovery` and balances calls over them.
    ///
    /// A direct endpoint skips discovery and behaves like [`Client::new`].
    pub async fn with_discovery(
        config: Option<ServiceConfig>,
        discovery: Arc<dyn Discovery>,
    ) -> SubscribeResult<Self> {
        let config = config.unwrap_or_else(default_config);
        config.validate()?;
        if !config.is_discovery() {
            return Self::new(Some(config));
        }

        let target = config
            .discovery_target()
            .unwrap_or(config.service_name.as_str())
            .to_string();
        let instances = discovery.resolve(&target).await?;
        if instances.is_empty() {
            return Err(DiscoveryError::no_instances(target).into());
        }

        let endpoints = instances
            .iter()
            .map(|address| endpoint(address, config.timeout))
            .collect::<SubscribeResult<Vec<_>>>()?;
        let channel = Channel::balance_list(endpoints.into_iter());

        tracing::info!(
            module = MODULE,
            endpoint = %config.endpoint,
            timeout = ?config.timeout,
            instances = instances.len(),
            "subscription client created via discovery"
        );
        Ok(Self::from_channel(config, channel))
    }

    fn from_channel(config: ServiceConfig, channel: Channel) -> Self {
        let subscribe = SubscribeClient {
            inner: SubscribeInternalServiceClient::new(channel),
            timeout: config.timeout,
        };
        Self { config, subscribe }
    }

    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the subscription RPC client.
    #[must_use]
    pub fn subscribe_client(&self) -> &SubscribeClient {
        &self.subscribe
    }

    /// Consumes the client and drops its channel handle.
    ///
    /// There is no explicit shutdown: the underlying connection closes when
    /// the last handle to the channel is dropped. Outstanding clones of
    /// [`SubscribeClient`] keep it open and remain usable. Dropping the
    /// client has the same effect; this method only adds a log line.
    pub fn close(self) {
        tracing::debug!(module = MODULE, endpoint = %self.config.endpoint, "subscription client closed");
    }
}

fn endpoint(address: &str, timeout: Duration) -> SubscribeResult<Endpoint> {
    let uri = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };
    Ok(Endpoint::from_shared(uri)?
        .timeout(timeout)
        .connect_timeout(timeout))
}

/// Optional fields for [`SubscribeClient::create_subscription`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSubscriptionOptions {
    /// Subscription start.
    pub start_date: Option<DateTime<Utc>>,
    /// Subscription end.
    pub end_date: Option<DateTime<Utc>>,
    /// Renew automatically at the end of the period.
    pub automatic_renewal: bool,
    /// Trial subscription.
    pub is_trial: bool,
}

/// Optional fields for [`SubscribeClient::upgrade_subscription`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeSubscriptionOptions {
    /// New start.
    pub start_date: Option<DateTime<Utc>>,
    /// New end.
    pub end_date: Option<DateTime<Utc>>,
}

/// Subscription RPCs.
///
/// Every call carries the configured timeout. Failures are logged and
/// returned.
#[derive(Debug, Clone)]
pub struct SubscribeClient {
    inner: SubscribeInternalServiceClient<Channel>,
    timeout: Duration,
}

impl SubscribeClient {
    fn request<T>(&self, message: T) -> tonic::Request<T> {
        let mut request = tonic::Request::new(message);
        request.set_timeout(self.timeout);
        request
    }

    /// Lists a tenant's subscriptions to a product.
    pub async fn get_tenant_subscriptions(
        &self,
        tenant_id: u32,
        product_code: &str,
    ) -> SubscribeResult<Vec<SubscriptionInfo>> {
        let request = self.request(list_request(tenant_id, product_code));

        let response = self
            .inner
            .clone()
            .list_subscriptions(request)
            .await
            .map_err(|status| {
                tracing::error!(
                    module = MODULE,
                    tenant_id,
                    product_code,
                    code = ?status.code(),
                    error = %status.message(),
                    "failed to list subscriptions"
                );
                SubscribeError::status("ListSubscriptions", status)
            })?;

        Ok(response.into_inner().subscriptions)
    }

    /// Creates a subscription for the calling tenant.
    pub async fn create_subscription(
        &self,
        product_code: &str,
        plan_code: &str,
        order: Option<SubscriptionOrderInfo>,
        options: Option<CreateSubscriptionOptions>,
    ) -> SubscribeResult<SubscriptionInfo> {
        const METHOD: &str = "CreateSubscription";
        let request = self.request(create_request(product_code, plan_code, order, options));

        let response = self
            .inner
            .clone()
            .create_subscription(request)
            .await
            .map_err(|status| {
                tracing::error!(
                    module = MODULE,
                    product_code,
                    plan_code,
                    code = ?status.code(),
                    error = %status.message(),
                    "failed to create subscription"
                );
                SubscribeError::status(METHOD, status)
            })?;

        response
            .into_inner()
            .subscription
            .ok_or(SubscribeError::MissingPayload { method: METHOD })
    }

    /// Extends a subscription by `renew_time`.
    pub async fn renew_subscription(
        &self,
        product_code: &str,
        plan_code: &str,
        renew_time: Duration,
        order: Option<SubscriptionOrderInfo>,
    ) -> SubscribeResult<SubscriptionInfo> {
        const METHOD: &str = "ReNewSubscription";
        let request = self.request(renew_request(product_code, plan_code, renew_time, order)?);

        let response = self
            .inner
            .clone()
            .re_new_subscription(request)
            .await
            .map_err(|status| {
                tracing::error!(
                    module = MODULE,
                    product_code,
                    plan_code,
                    renew_time = ?renew_time,
                    code = ?status.code(),
                    error = %status.message(),
                    "failed to renew subscription"
                );
                SubscribeError::status(METHOD, status)
            })?;

        response
            .into_inner()
            .subscription
            .ok_or(SubscribeError::MissingPayload { method: METHOD })
    }

    /// Moves a subscription to another plan.
    pub async fn upgrade_subscription(
        &self,
        product_code: &str,
        plan_code: &str,
        order: Option<SubscriptionOrderInfo>,
        options: Option<UpgradeSubscriptionOptions>,
    ) -> SubscribeResult<SubscriptionInfo> {
        const METHOD: &str = "UpgradeSubscription";
        let request = self.request(upgrade_request(product_code, plan_code, order, options));

        let response = self
            .inner
            .clone()
            .upgrade_subscription(request)
            .await
            .map_err(|status| {
                tracing::error!(
                    module = MODULE,
                    product_code,
                    plan_code,
                    code = ?status.code(),
                    error = %status.message(),
                    "failed to upgrade subscription"
                );
                SubscribeError::status(METHOD, status)
            })?;

        response
            .into_inner()
            .subscription
            .ok_or(SubscribeError::MissingPayload { method: METHOD })
    }
}

fn list_request(tenant_id: u32, product_code: &str) -> ListSubscriptionsRequest {
    ListSubscriptionsRequest {
        tenant_id: Some(tenant_id),
        product_code: Some(product_code.to_string()),
    }
}

fn create_request(
    product_code: &str,
    plan_code: &str,
    order: Option<SubscriptionOrderInfo>,
    options: Option<CreateSubscriptionOptions>,
) -> CreateSubscriptionRequest {
    let options = options.unwrap_or_default();
    CreateSubscriptionRequest {
        product_code: product_code.to_string(),
        plan_code: plan_code.to_string(),
        automatic_renewal: options.automatic_renewal,
        start_date: options.start_date.map(to_timestamp),
        end_date: options.end_date.map(to_timestamp),
        is_trial: options.is_trial,
        order,
    }
}

fn renew_request(
    product_code: &str,
    plan_code: &str,
    renew_time: Duration,
    order: Option<SubscriptionOrderInfo>,
) -> SubscribeResult<ReNewSubscriptionRequest> {
    let re_new_time = prost_types::Duration::try_from(renew_time)
        .map_err(|e| SubscribeError::invalid_argument("renew_time", e.to_string()))?;
    Ok(ReNewSubscriptionRequest {
        product_code: product_code.to_string(),
        plan_code: plan_code.to_string(),
        re_new_time: Some(re_new_time),
        order,
    })
}

fn upgrade_request(
    product_code: &str,
    plan_code: &str,
    order: Option<SubscriptionOrderInfo>,
    options: Option<UpgradeSubscriptionOptions>,
) -> UpgradeSubscriptionRequest {
    let options = options.unwrap_or_default();
    UpgradeSubscriptionRequest {
        product_code: product_code.to_string(),
        plan_code: plan_code.to_string(),
        start_date: options.start_date.map(to_timestamp),
        end_date: options.end_date.map(to_timestamp),
        order,
    }
}

/// Converts a UTC time to a protobuf timestamp.
#[must_use]
pub fn to_timestamp(at: DateTime<Utc>) -> Timestamp {
    // Leap seconds report nanos >= 1e9, which protobuf does not allow.
    let nanos = at.timestamp_subsec_nanos().min(999_999_999);
    Timestamp {
        seconds: at.timestamp(),
        nanos: i32::try_from(nanos).unwrap_or_default(),
    }
}

/// Converts a protobuf timestamp to UTC, if it is in range.
#[must_use]
pub fn from_timestamp(ts: &Timestamp) -> Option<DateTime<Utc>> {
    let nanos = u32::try_from(ts.nanos).ok()?;
    DateTime::from_timestamp(ts.seconds, nanos)
}
