//! User-type access control middleware.
//!
//! Coarse gatekeeping in front of handlers: each user type has a list of
//! path prefixes it must not reach (see [`PathRuleTable`]). Fine-grained
//! permission checks stay inside the handlers.

use std::sync::Arc;

use keystone_core::{BusinessError, ErrorKind, IdentityClaim, UserType};

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::pipeline::Stage;
use crate::rules::PathRuleTable;
use crate::transport::ServerTransport;
use crate::types::{PipelineResult, Request};

/// Checks a single user type against a path.
pub fn check_access(
    table: &PathRuleTable,
    user_type: &UserType,
    path: &str,
) -> Result<(), BusinessError> {
    if table.is_allowed(user_type, path) {
        Ok(())
    } else {
        Err(ErrorKind::AccessForbidden.into())
    }
}

/// Decides whether the claimed caller may reach the transport's path.
///
/// Failure order:
///
/// 1. no claim: `TOKEN_INVALID`
/// 2. empty user type: `USER_TYPE_UNDEFINED`
/// 3. no transport, or not HTTP: `SYSTEM_ERROR`
/// 4. unknown user type or denied prefix: `ACCESS_FORBIDDEN`
///
/// ```
/// use keystone_core::{ErrorKind, IdentityClaim, UserType};
/// use keystone_middleware::stages::user_type::authorize;
/// use keystone_middleware::PathRuleTable;
///
/// let table = PathRuleTable::standard();
/// let err = authorize(&table, None, None).unwrap_err();
/// assert!(err.is(ErrorKind::TokenInvalid));
///
/// let claim = IdentityClaim::new(1, None, 42);
/// let err = authorize(&table, Some(&claim), None).unwrap_err();
/// assert!(err.is(ErrorKind::UserTypeUndefined));
/// ```
pub fn authorize(
    table: &PathRuleTable,
    claim: Option<&IdentityClaim>,
    transport: Option<&ServerTransport>,
) -> Result<(), BusinessError> {
    let claim = claim.ok_or(ErrorKind::TokenInvalid)?;
    let user_type = claim.user_type().ok_or(ErrorKind::UserTypeUndefined)?;
    let path = transport
        .and_then(ServerTransport::http_path)
        .ok_or(ErrorKind::SystemError)?;

    check_access(table, user_type, path)
}

/// Middleware enforcing the [`PathRuleTable`] against the caller's user type.
///
/// Must run after [`IdentityMiddleware`](crate::IdentityMiddleware).
#[derive(Debug, Clone)]
pub struct UserTypeMiddleware {
    table: Arc<PathRuleTable>,
}

impl UserTypeMiddleware {
    /// Creates the middleware with a shared rule table.
    #[must_use]
    pub fn new(table: Arc<PathRuleTable>) -> Self {
        Self { table }
    }

    /// Returns the rule table.
    #[must_use]
    pub fn table(&self) -> &PathRuleTable {
        &self.table
    }
}

impl Default for UserTypeMiddleware {
    fn default() -> Self {
        Self::new(Arc::new(PathRuleTable::standard()))
    }
}

impl Middleware for UserTypeMiddleware {
    fn name(&self) -> &'static str {
        Stage::UserType.name()
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, PipelineResult> {
        Box::pin(async move {
            if let Err(error) = authorize(&self.table, ctx.claim(), ctx.transport()) {
                tracing::debug!(
                    stage = self.name(),
                    error_type = error.error_type(),
                    user_type = ctx.claim().map_or("", IdentityClaim::user_type_tag),
                    path = ctx.transport().and_then(ServerTransport::http_path),
                    "access denied"
                );
                return Err(error);
            }
            next.run(ctx, request).await
        })
    }
}
