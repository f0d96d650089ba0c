//! Ordered middleware pipeline.
//!
//! Stages run in the order they were added. The first stage to return an
//! error ends the request; later stages and the handler never run.
//!
//! ## Standard Pipeline
//!
//! [`Pipeline::identity_and_access`] assembles the two standard stages:
//!
//! 1. **Identity** - build an identity claim from gateway headers
//! 2. **UserType** - deny paths listed for the caller's user type

use std::sync::Arc;

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::rules::PathRuleTable;
use crate::stages::{IdentityMiddleware, UserTypeMiddleware};
use crate::transport::ServerTransport;
use crate::types::{PipelineResult, Request};

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An immutable, ordered middleware pipeline.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bytes::Bytes;
/// use http_body_util::Full;
/// use keystone_middleware::{PathRuleTable, Pipeline};
///
/// # tokio_test::block_on(async {
/// let pipeline = Pipeline::identity_and_access(Arc::new(PathRuleTable::standard()));
///
/// let request = http::Request::builder()
///     .uri("/api/v1/users/1")
///     .header("x-user-id", "7")
///     .header("x-user-type", "merchant")
///     .header("x-tenant-id", "42")
///     .body(Full::new(Bytes::new()))
///     .unwrap();
///
/// let response = pipeline
///     .serve_http(request, |_ctx, _req| {
///         Box::pin(async { Ok(http::Response::new(Full::new(Bytes::from("ok")))) })
///     })
///     .await
///     .unwrap();
/// assert_eq!(response.status(), 200);
/// # });
/// ```
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Builds the standard identity + user-type pipeline.
    #[must_use]
    pub fn identity_and_access(table: Arc<PathRuleTable>) -> Self {
        Self::builder()
            .add_stage(IdentityMiddleware::new())
            .add_stage(UserTypeMiddleware::new(table))
            .build()
    }

    /// Processes a request through every stage, then the handler.
    ///
    /// The context is borrowed so callers can inspect it afterwards.
    pub async fn process<H>(
        &self,
        ctx: &mut MiddlewareContext,
        request: Request,
        handler: H,
    ) -> PipelineResult
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, PipelineResult>
            + Send
            + 'static,
    {
        let next = self.build_chain(handler);
        next.run(ctx, request).await
    }

    /// Processes an HTTP request with a fresh context carrying its
    /// [`ServerTransport`].
    pub async fn serve_http<H>(&self, request: Request, handler: H) -> PipelineResult
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, PipelineResult>
            + Send
            + 'static,
    {
        let mut ctx = MiddlewareContext::with_transport(ServerTransport::http(&request));
        self.process(&mut ctx, request, handler).await
    }

    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, PipelineResult>
            + Send
            + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns the names of all middleware stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of middleware stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Builder for constructing a [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn add_stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Appends an already shared stage.
    #[must_use]
    pub fn add_shared_stage(mut self, middleware: BoxedMiddleware) -> Self {
        self.stages.push(middleware);
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

/// Stages of the standard pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: identity extraction
    Identity = 1,
    /// Stage 2: user-type access control
    UserType = 2,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::UserType => "user_type",
        }
    }

    /// Returns all stages in order.
    #[must_use]
    pub const fn all() -> [Stage; 2] {
        [Self::Identity, Self::UserType]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Request as HttpRequest, Response as HttpResponse, StatusCode};
    use http_body_util::Full;
    use keystone_core::{BusinessError, ErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct OrderTrackingMiddleware {
        name: &'static str,
        counter: Arc<AtomicUsize>,
        order: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl Middleware for OrderTrackingMiddleware {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process<'a>(
            &'a self,
            ctx: &'a mut MiddlewareContext,
            request: Request,
            next: Next<'a>,
        ) -> BoxFuture<'a, PipelineResult> {
            Box::pin(async move {
                self.counter.fetch_add(1, Ordering::SeqCst);
                self.order.lock().unwrap().push(self.name);
                next.run(ctx, request).await
            })
        }
    }

    struct Deny;

    impl Middleware for Deny {
        fn name(&self) -> &'static str {
            "deny"
        }

        fn process<'a>(
            &'a self,
            _ctx: &'a mut MiddlewareContext,
            _request: Request,
            _next: Next<'a>,
        ) -> BoxFuture<'a, PipelineResult> {
            Box::pin(async { Err(BusinessError::from(ErrorKind::PermissionDenied)) })
        }
    }

    fn request() -> Request {
        HttpRequest::builder()
            .uri("/test")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn ok(_ctx: &mut MiddlewareContext, _req: Request) -> BoxFuture<'static, PipelineResult> {
        Box::pin(async {
            Ok(HttpResponse::builder()
                .status(StatusCode::OK)
                .body(Full::new(Bytes::from("OK")))
                .unwrap())
        })
    }

    #[tokio::test]
    async fn test_pipeline_executes_in_order() {
        let counter = Arc::new(AtomicUsize::new(0));
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));

        let tracker = |name| OrderTrackingMiddleware {
            name,
            counter: counter.clone(),
            order: order.clone(),
        };

        let pipeline = Pipeline::builder()
            .add_stage(tracker("first"))
            .add_stage(tracker("second"))
            .add_stage(tracker("third"))
            .build();

        let mut ctx = MiddlewareContext::new();
        let response = pipeline.process(&mut ctx, request(), ok).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_error_stops_later_stages() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::builder()
            .add_stage(Deny)
            .add_stage(OrderTrackingMiddleware {
                name: "after",
                counter: counter.clone(),
                order: Arc::default(),
            })
            .build();

        let mut ctx = MiddlewareContext::new();
        let err = pipeline.process(&mut ctx, request(), ok).await.unwrap_err();

        assert!(err.is(ErrorKind::PermissionDenied));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_pipeline() {
        let pipeline = Pipeline::builder().build();
        let mut ctx = MiddlewareContext::new();
        let response = pipeline.process(&mut ctx, request(), ok).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(pipeline.stage_count(), 0);
    }

    #[test]
    fn test_standard_pipeline_stages() {
        let pipeline = Pipeline::identity_and_access(Arc::new(PathRuleTable::standard()));
        assert_eq!(pipeline.stage_count(), 2);
        assert_eq!(
            pipeline.stage_names(),
            Stage::all().iter().map(|s| s.name()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_stage_ordering() {
        assert!(Stage::Identity < Stage::UserType);
    }
}
