//! Identity extraction middleware.
//!
//! The API gateway authenticates callers and forwards their identity as
//! plain headers. This stage reads those headers, validates their shape and
//! stores an [`IdentityClaim`] in the context. Values are trusted as-is.
//!
//! | Header        | Required | Format                    |
//! |---------------|----------|---------------------------|
//! | `X-User-ID`   | yes      | decimal u32, non-zero     |
//! | `X-User-Type` | no       | passed through verbatim   |
//! | `X-Tenant-ID` | yes      | decimal u32, non-zero     |

use http::{HeaderMap, HeaderValue};
use keystone_core::{BusinessError, ErrorKind, IdentityClaim, UserType};

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::pipeline::Stage;
use crate::types::{PipelineResult, Request};

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Header carrying the caller's user type tag.
pub const USER_TYPE_HEADER: &str = "x-user-type";

/// Header carrying the caller's tenant id.
pub const TENANT_ID_HEADER: &str = "x-tenant-id";

/// Builds an identity claim from request headers.
///
/// Checks run in a fixed order, so a request missing several headers always
/// reports the same error: missing user id, missing tenant, invalid user id,
/// then invalid tenant.
///
/// ```
/// use http::HeaderMap;
/// use keystone_core::ErrorKind;
/// use keystone_middleware::stages::identity::extract_claim;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-user-id", "7".parse().unwrap());
/// headers.insert("x-tenant-id", "42".parse().unwrap());
///
/// let claim = extract_claim(&headers).unwrap();
/// assert_eq!((claim.user_id(), claim.tenant_id()), (7, 42));
/// assert_eq!(claim.user_type_tag(), "");
///
/// headers.insert("x-user-id", "abc".parse().unwrap());
/// assert!(extract_claim(&headers).unwrap_err().is(ErrorKind::AuthHeaderInvalid));
/// ```
pub fn extract_claim(headers: &HeaderMap) -> Result<IdentityClaim, BusinessError> {
    let user_id = header_bytes(headers, USER_ID_HEADER);
    let tenant_id = header_bytes(headers, TENANT_ID_HEADER);

    if user_id.is_empty() {
        return Err(ErrorKind::AuthHeaderMissing.with_message("X-User-ID header is missing"));
    }
    if tenant_id.is_empty() {
        return Err(ErrorKind::TenantMissing.into());
    }

    let user_id = parse_id(user_id)
        .ok_or_else(|| ErrorKind::AuthHeaderInvalid.with_message("Invalid X-User-ID format"))?;
    let tenant_id = parse_id(tenant_id).ok_or(ErrorKind::TenantInvalid)?;

    // Non-UTF-8 bytes survive as replacement characters, so the tag is still
    // present and falls through to an unknown type.
    let user_type = UserType::parse(&String::from_utf8_lossy(header_bytes(
        headers,
        USER_TYPE_HEADER,
    )));

    Ok(IdentityClaim::new(user_id, user_type, tenant_id))
}

fn header_bytes<'h>(headers: &'h HeaderMap, name: &str) -> &'h [u8] {
    headers
        .get(name)
        .map(HeaderValue::as_bytes)
        .unwrap_or_default()
}

/// Parses a non-zero decimal u32. Signs, whitespace and non-ASCII are rejected.
fn parse_id(raw: &[u8]) -> Option<u32> {
    if !raw.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(raw)
        .ok()?
        .parse::<u32>()
        .ok()
        .filter(|id| *id != 0)
}

/// Middleware that establishes the caller's [`IdentityClaim`].
///
/// Requires [`ServerTransport`](crate::ServerTransport) metadata in the
/// context; without it the request fails with `SYSTEM_ERROR`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMiddleware;

impl IdentityMiddleware {
    /// Creates the identity middleware.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Middleware for IdentityMiddleware {
    fn name(&self) -> &'static str {
        Stage::Identity.name()
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, PipelineResult> {
        Box::pin(async move {
            let Some(transport) = ctx.transport() else {
                tracing::error!(stage = self.name(), "transport metadata missing from context");
                return Err(ErrorKind::SystemError.into());
            };

            let claim = match extract_claim(transport.request_header()) {
                Ok(claim) => claim,
                Err(error) => {
                    tracing::debug!(
                        stage = self.name(),
                        error_type = error.error_type(),
                        operation = transport.operation(),
                        "identity rejected"
                    );
                    return Err(error);
                }
            };

            tracing::trace!(
                user_id = claim.user_id(),
                tenant_id = claim.tenant_id(),
                user_type = claim.user_type_tag(),
                "identity established"
            );
            ctx.attach_claim(claim);
            next.run(ctx, request).await
        })
    }
}
