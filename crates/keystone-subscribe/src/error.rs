//! Subscription client errors.

use keystone_config::ConfigError;
use keystone_core::{BusinessError, ErrorKind};
use thiserror::Error;
use tonic::Code;

/// Result type for subscription client operations.
pub type SubscribeResult<T> = Result<T, SubscribeError>;

/// Service discovery errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The discovery request could not be sent or decoded.
    #[error("discovery request to {url} failed: {source}")]
    Request {
        /// Request URL.
        url: String,
        /// Underlying HTTP error.
        #[source]
        source: reqwest::Error,
    },

    /// The discovery backend answered with a non-success status.
    #[error("discovery request to {url} returned status {status}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// No healthy instance is registered for the service.
    #[error("no instances found for service '{service}'")]
    NoInstances {
        /// Service name that was resolved.
        service: String,
    },

    /// The discovery backend address is unusable.
    #[error("invalid discovery address: {0}")]
    InvalidAddress(String),
}

impl DiscoveryError {
    /// No instances for `service`.
    pub fn no_instances(service: impl Into<String>) -> Self {
        Self::NoInstances {
            service: service.into(),
        }
    }
}

/// Subscription client errors.
#[derive(Debug, Error)]
pub enum SubscribeError {
    /// Client configuration is invalid.
    #[error("invalid client configuration: {0}")]
    Config(#[from] ConfigError),

    /// Instance resolution failed.
    #[error("service discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The gRPC channel could not be built.
    #[error("failed to create gRPC channel: {0}")]
    Transport(#[from] tonic::transport::Error),

    /// The remote call failed.
    #[error("{method} failed: {}", .status.message())]
    Status {
        /// RPC method name.
        method: &'static str,
        /// gRPC status returned by the call.
        #[source]
        status: Box<tonic::Status>,
    },

    /// The call succeeded but carried no subscription.
    #[error("{method} returned no subscription")]
    MissingPayload {
        /// RPC method name.
        method: &'static str,
    },

    /// An argument cannot be encoded.
    #[error("invalid argument '{field}': {reason}")]
    InvalidArgument {
        /// Argument name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl SubscribeError {
    /// Wraps a gRPC status.
    pub fn status(method: &'static str, status: tonic::Status) -> Self {
        Self::Status {
            method,
            status: Box::new(status),
        }
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the gRPC code for [`SubscribeError::Status`].
    #[must_use]
    pub fn code(&self) -> Option<Code> {
        match self {
            Self::Status { status, .. } => Some(status.code()),
            _ => None,
        }
    }
}

impl From<SubscribeError> for BusinessError {
    fn from(err: SubscribeError) -> Self {
        let kind = match err.code() {
            Some(Code::NotFound) => ErrorKind::DataNotFound,
            Some(Code::AlreadyExists) => ErrorKind::DataDuplicate,
            Some(Code::InvalidArgument) => ErrorKind::InvalidParameter,
            Some(Code::PermissionDenied) => ErrorKind::PermissionDenied,
            Some(Code::Unauthenticated) => ErrorKind::TokenInvalid,
            Some(Code::Unavailable | Code::DeadlineExceeded) => ErrorKind::ServiceUnavailable,
            Some(_) => ErrorKind::SystemError,
            None => match err {
                SubscribeError::Discovery(_) | SubscribeError::Transport(_) => {
                    ErrorKind::ServiceUnavailable
                }
                SubscribeError::InvalidArgument { .. } => ErrorKind::InvalidParameter,
                _ => ErrorKind::SystemError,
            },
        };
        kind.with_message(err.to_string())
    }
}
