//! End-to-end tests for the identity + user-type pipeline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use keystone_core::{ErrorKind, IdentityClaim, UserType};
use keystone_middleware::stages::identity::extract_claim;
use keystone_middleware::stages::user_type::authorize;
use keystone_middleware::{
    BoxFuture, MiddlewareContext, PathRuleTable, Pipeline, PipelineResult, PrefixMatch, Request,
    Response, ResponseExt, ServerTransport,
};
use proptest::prelude::*;

fn request(path: &str, headers: &[(&str, &str)]) -> Request {
    let mut builder = http::Request::builder().uri(path);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Full::new(Bytes::new())).unwrap()
}

/// Handler that records whether it ran and which claim it saw.
#[derive(Clone, Default)]
struct Recorder {
    called: Arc<AtomicBool>,
    claim: Arc<Mutex<Option<IdentityClaim>>>,
}

impl Recorder {
    fn handler(
        &self,
    ) -> impl FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, PipelineResult> + Send + 'static
    {
        let recorder = self.clone();
        move |ctx, _req| {
            recorder.called.store(true, Ordering::SeqCst);
            *recorder.claim.lock().unwrap() = ctx.claim().cloned();
            Box::pin(async { Ok(Response::new(Full::new(Bytes::from("handled")))) })
        }
    }

    fn called(&self) -> bool {
        self.called.load(Ordering::SeqCst)
    }

    fn claim(&self) -> Option<IdentityClaim> {
        self.claim.lock().unwrap().clone()
    }
}

fn standard() -> Pipeline {
    Pipeline::identity_and_access(Arc::new(PathRuleTable::standard()))
}

#[tokio::test]
async fn missing_user_id_never_reaches_handler() {
    let recorder = Recorder::default();
    let err = standard()
        .serve_http(
            request("/api/v1/users", &[("x-tenant-id", "42"), ("x-user-type", "platform")]),
            recorder.handler(),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::AuthHeaderMissing));
    assert_eq!(err.message(), "X-User-ID header is missing");
    assert!(!recorder.called());
}

#[tokio::test]
async fn non_numeric_user_id_is_invalid() {
    let recorder = Recorder::default();
    let err = standard()
        .serve_http(
            request("/api/v1/users", &[("x-user-id", "abc"), ("x-tenant-id", "42")]),
            recorder.handler(),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::AuthHeaderInvalid));
    assert!(!recorder.called());
}

#[tokio::test]
async fn platform_denied_tenant_management() {
    let recorder = Recorder::default();
    let err = standard()
        .serve_http(
            request(
                "/api/v1/tenants/123",
                &[("x-user-id", "7"), ("x-user-type", "platform"), ("x-tenant-id", "42")],
            ),
            recorder.handler(),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::AccessForbidden));
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    assert!(!recorder.called());
}

#[tokio::test]
async fn platform_allowed_user_management() {
    let recorder = Recorder::default();
    let response = standard()
        .serve_http(
            request(
                "/api/v1/users/123",
                &[("x-user-id", "7"), ("x-user-type", "platform"), ("x-tenant-id", "42")],
            ),
            recorder.handler(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(recorder.called());
    assert_eq!(
        recorder.claim(),
        Some(IdentityClaim::new(7, Some(UserType::Platform), 42))
    );
}

#[tokio::test]
async fn merchant_denied_group_management() {
    let recorder = Recorder::default();
    let err = standard()
        .serve_http(
            request(
                "/api/v1/groups/7",
                &[("x-user-id", "9"), ("x-user-type", "merchant"), ("x-tenant-id", "42")],
            ),
            recorder.handler(),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::AccessForbidden));
    assert!(!recorder.called());
}

#[tokio::test]
async fn percent_encoded_paths_are_denied() {
    let cases = [
        ("platform", "/api/v1/%74enants/123"),
        ("platform", "/api/v1/tenant%73/123"),
        ("merchant", "/api/v1/group%73/7"),
        ("merchant", "/api%2Fv1/groups"),
    ];

    for (user_type, path) in cases {
        let recorder = Recorder::default();
        let err = standard()
            .serve_http(
                request(
                    path,
                    &[("x-user-id", "9"), ("x-user-type", user_type), ("x-tenant-id", "42")],
                ),
                recorder.handler(),
            )
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::AccessForbidden), "{user_type} {path}");
        assert!(!recorder.called());
    }
}

#[tokio::test]
async fn non_utf8_user_type_is_forbidden_not_undefined() {
    let recorder = Recorder::default();
    let mut req = request("/api/v1/users/1", &[("x-user-id", "9"), ("x-tenant-id", "42")]);
    req.headers_mut().insert(
        "x-user-type",
        http::HeaderValue::from_bytes(b"plat\xe9form").unwrap(),
    );

    let err = standard()
        .serve_http(req, recorder.handler())
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::AccessForbidden));
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    assert!(!recorder.called());
}

#[tokio::test]
async fn unknown_user_type_always_denied() {
    for path in ["/", "/api/v1/users/1", "/api/v1/tenants", "/health"] {
        let recorder = Recorder::default();
        let err = standard()
            .serve_http(
                request(
                    path,
                    &[("x-user-id", "9"), ("x-user-type", "unknown-type"), ("x-tenant-id", "42")],
                ),
                recorder.handler(),
            )
            .await
            .unwrap_err();

        assert!(err.is(ErrorKind::AccessForbidden), "path {path}");
        assert!(!recorder.called());
    }
}

#[tokio::test]
async fn missing_user_type_is_undefined() {
    let recorder = Recorder::default();
    let err = standard()
        .serve_http(
            request("/api/v1/users", &[("x-user-id", "9"), ("x-tenant-id", "42")]),
            recorder.handler(),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::UserTypeUndefined));
}

#[tokio::test]
async fn context_without_transport_is_system_error() {
    let recorder = Recorder::default();
    let mut ctx = MiddlewareContext::new();
    let err = standard()
        .process(
            &mut ctx,
            request("/api/v1/users", &[("x-user-id", "9"), ("x-tenant-id", "42")]),
            recorder.handler(),
        )
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::SystemError));
    assert!(err.is_system_error());
    assert!(ctx.claim().is_none());
}

#[tokio::test]
async fn grpc_transport_fails_access_stage() {
    let mut headers = HeaderMap::new();
    headers.insert("x-user-id", "9".parse().unwrap());
    headers.insert("x-user-type", "merchant".parse().unwrap());
    headers.insert("x-tenant-id", "42".parse().unwrap());

    let recorder = Recorder::default();
    let mut ctx = MiddlewareContext::with_transport(ServerTransport::grpc(
        "/subscribe.v1.SubscribeInternalService/ListSubscriptions",
        headers,
    ));
    let err = standard()
        .process(&mut ctx, request("/", &[]), recorder.handler())
        .await
        .unwrap_err();

    assert!(err.is(ErrorKind::SystemError));
    assert!(ctx.claim().is_some());
    assert!(!recorder.called());
}

#[tokio::test]
async fn error_renders_as_json_envelope() {
    let err = standard()
        .serve_http(
            request("/api/v1/users", &[("x-user-id", "1"), ("x-tenant-id", "0")]),
            Recorder::default().handler(),
        )
        .await
        .unwrap_err();

    let response = Response::from_business_error(&err);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["error"]["type"], "TENANT_INVALID");
    assert_eq!(json["error"]["code"], ErrorKind::TenantInvalid.code());
}

#[test]
fn access_stage_without_claim_is_token_invalid() {
    let table = PathRuleTable::standard();
    for path in ["/", "/api/v1/tenants", "/api/v1/users/1"] {
        let transport = ServerTransport::http(&request(path, &[]));
        let err = authorize(&table, None, Some(&transport)).unwrap_err();
        assert!(err.is(ErrorKind::TokenInvalid));
    }
}

proptest! {
    #[test]
    fn extraction_is_idempotent(
        user_id in 1u32..,
        tenant_id in 1u32..,
        user_type in "[a-z-]{0,12}",
    ) {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", user_id.to_string().parse().unwrap());
        headers.insert("x-tenant-id", tenant_id.to_string().parse().unwrap());
        headers.insert("x-user-type", user_type.parse().unwrap());

        let first = extract_claim(&headers).unwrap();
        let second = extract_claim(&headers).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.user_id(), user_id);
        prop_assert_eq!(first.tenant_id(), tenant_id);
        prop_assert_eq!(first.user_type_tag(), user_type.as_str());
    }

    #[test]
    fn rejected_headers_are_deterministic(raw in "\\PC{0,12}") {
        let mut headers = HeaderMap::new();
        if let Ok(value) = raw.parse() {
            headers.insert("x-user-id", value);
        }
        headers.insert("x-tenant-id", "42".parse().unwrap());

        let first = extract_claim(&headers);
        let second = extract_claim(&headers);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn segment_match_never_overmatches(suffix in "[A-Za-z0-9]{1,8}") {
        let path = format!("/api/v1/tenants{suffix}");
        prop_assert!(PrefixMatch::Raw.matches(&path, "/api/v1/tenants"));
        prop_assert!(!PrefixMatch::Segment.matches(&path, "/api/v1/tenants"));
        let nested = format!("/api/v1/tenants/{suffix}");
        prop_assert!(PrefixMatch::Segment.matches(&nested, "/api/v1/tenants"));
    }
}
