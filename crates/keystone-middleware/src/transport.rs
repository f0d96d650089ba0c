//! Transport metadata attached to a request by the host server.
//!
//! Stages never look at the raw request for identity or routing decisions;
//! they read the [`ServerTransport`] stored in the context. This keeps the
//! stages usable for both HTTP and gRPC hosts.

use http::HeaderMap;
use percent_encoding::percent_decode_str;

use crate::types::Request;

/// Kind of server transport a request arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Plain HTTP.
    Http,
    /// gRPC over HTTP/2.
    Grpc,
}

impl TransportKind {
    /// Returns the kind name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Grpc => "grpc",
        }
    }
}

/// Server-side transport metadata for one request.
#[derive(Debug, Clone)]
pub struct ServerTransport {
    kind: TransportKind,
    operation: String,
    headers: HeaderMap,
    path: Option<String>,
}

impl ServerTransport {
    /// Builds HTTP transport metadata from a request.
    ///
    /// The operation is `"{METHOD} {path}"`. The stored path is
    /// percent-decoded and excludes the query string, so `/api/v1/%74enants`
    /// is matched as `/api/v1/tenants`.
    ///
    /// ```
    /// use bytes::Bytes;
    /// use http_body_util::Full;
    /// use keystone_middleware::{ServerTransport, TransportKind};
    ///
    /// let request = http::Request::builder()
    ///     .uri("/api/v1/users/7?expand=roles")
    ///     .body(Full::new(Bytes::new()))
    ///     .unwrap();
    ///
    /// let transport = ServerTransport::http(&request);
    /// assert_eq!(transport.kind(), TransportKind::Http);
    /// assert_eq!(transport.http_path(), Some("/api/v1/users/7"));
    /// ```
    #[must_use]
    pub fn http(request: &Request) -> Self {
        let path = percent_decode_str(request.uri().path())
            .decode_utf8_lossy()
            .into_owned();
        Self {
            kind: TransportKind::Http,
            operation: format!("{} {}", request.method(), path),
            headers: request.headers().clone(),
            path: Some(path),
        }
    }

    /// Builds gRPC transport metadata.
    #[must_use]
    pub fn grpc(operation: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            kind: TransportKind::Grpc,
            operation: operation.into(),
            headers,
            path: None,
        }
    }

    /// Returns the transport kind.
    #[must_use]
    pub const fn kind(&self) -> TransportKind {
        self.kind
    }

    /// Returns the operation name (HTTP method and path, or gRPC full method).
    #[must_use]
    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Returns the inbound request headers.
    #[must_use]
    pub const fn request_header(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the URL path for HTTP transports, `None` otherwise.
    #[must_use]
    pub fn http_path(&self) -> Option<&str> {
        match self.kind {
            TransportKind::Http => self.path.as_deref(),
            TransportKind::Grpc => None,
        }
    }
}
