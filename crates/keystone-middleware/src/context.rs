//! Middleware context types.
//!
//! The [`MiddlewareContext`] is the request-scoped value carrier: it holds the
//! transport metadata the host attached, the identity claim once the identity
//! stage has produced it, and typed extensions for anything else.

use crate::transport::ServerTransport;
use keystone_core::IdentityClaim;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;

/// Context that flows through the middleware pipeline.
///
/// # Example
///
/// ```
/// use keystone_middleware::{MiddlewareContext, ServerTransport};
/// use http::HeaderMap;
///
/// let ctx = MiddlewareContext::with_transport(ServerTransport::grpc(
///     "/subscribe.v1.SubscribeInternalService/ListSubscriptions",
///     HeaderMap::new(),
/// ));
///
/// assert!(ctx.transport().is_some());
/// assert!(ctx.claim().is_none());
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    /// Transport metadata supplied by the host server.
    transport: Option<ServerTransport>,

    /// Caller identity, set by the identity stage.
    claim: Option<IdentityClaim>,

    /// When the request started processing.
    started_at: Instant,

    /// Type-erased extension data.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates an empty context without transport metadata.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transport: None,
            claim: None,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Creates a context carrying the given transport metadata.
    #[must_use]
    pub fn with_transport(transport: ServerTransport) -> Self {
        Self {
            transport: Some(transport),
            ..Self::new()
        }
    }

    /// Returns the transport metadata, if the host supplied any.
    #[must_use]
    pub fn transport(&self) -> Option<&ServerTransport> {
        self.transport.as_ref()
    }

    /// Replaces the transport metadata.
    pub fn set_transport(&mut self, transport: ServerTransport) {
        self.transport = Some(transport);
    }

    /// Returns the identity claim established for this request.
    #[must_use]
    pub fn claim(&self) -> Option<&IdentityClaim> {
        self.claim.as_ref()
    }

    /// Stores the identity claim.
    ///
    /// Only the identity stage calls this.
    pub(crate) fn attach_claim(&mut self, claim: IdentityClaim) {
        self.claim = Some(claim);
    }

    /// Returns when the request started processing.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    ///
    /// ```
    /// use keystone_middleware::MiddlewareContext;
    ///
    /// struct Locale(&'static str);
    ///
    /// let mut ctx = MiddlewareContext::new();
    /// ctx.set_extension(Locale("en-US"));
    /// assert_eq!(ctx.get_extension::<Locale>().unwrap().0, "en-US");
    /// ```
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }

    /// Checks if an extension of the given type exists.
    #[must_use]
    pub fn has_extension<T: Send + Sync + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeId::of::<T>())
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}
