//! Common types used throughout the middleware pipeline.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use keystone_core::BusinessError;

/// The HTTP request type used in the middleware pipeline.
pub type Request = http::Request<Full<Bytes>>;

/// The HTTP response type used in the middleware pipeline.
pub type Response = http::Response<Full<Bytes>>;

/// Outcome of a stage or handler.
///
/// `Err` terminates the pipeline; the error travels back to the caller
/// untouched.
pub type PipelineResult = Result<Response, BusinessError>;

/// Extension trait for building responses.
pub trait ResponseExt {
    /// Creates a JSON error response.
    fn json_error(status: StatusCode, code: &str, message: &str) -> Response;

    /// Renders a business error as a JSON envelope with its HTTP status.
    ///
    /// ```json
    /// {"error": {"code": 10310, "type": "ACCESS_FORBIDDEN", "message": "access forbidden"}}
    /// ```
    fn from_business_error(error: &BusinessError) -> Response;
}

impl ResponseExt for Response {
    fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
        let body = serde_json::json!({
            "error": {
                "code": code,
                "message": message
            }
        });
        json_response(status, body.to_string())
    }

    fn from_business_error(error: &BusinessError) -> Response {
        let body = serde_json::to_string(&error.to_envelope()).unwrap_or_else(|_| {
            serde_json::json!({ "error": { "message": error.message() } }).to_string()
        });
        json_response(error.status_code(), body)
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    let mut response = http::Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
