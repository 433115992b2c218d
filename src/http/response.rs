//! Response values produced by hooks and rendered by the transport.
//!
//! # Responsibilities
//! - Represent a final response (status, headers, optional JSON body)
//! - Provide constructors for the outcomes hooks commonly abort with
//! - Render into an Axum response
//!
//! # Design Decisions
//! - Plain value type; no streaming, hooks abort with small payloads
//! - Invalid header values are dropped with a warning rather than failing the hook

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

/// A final response, either returned by a short-circuiting hook or built
/// by the transport after the chain completes.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a header, replacing any previous value.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(v) => {
                self.headers.insert(name, v);
            }
            Err(_) => {
                tracing::warn!(header = %name, "Dropping invalid response header value");
            }
        }
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn ok(body: Value) -> Self {
        Self::new(StatusCode::OK).with_body(body)
    }

    pub fn bad_request(body: Value) -> Self {
        Self::new(StatusCode::BAD_REQUEST).with_body(body)
    }

    pub fn unauthorized(body: Value) -> Self {
        Self::new(StatusCode::UNAUTHORIZED).with_body(body)
    }

    pub fn forbidden(body: Value) -> Self {
        Self::new(StatusCode::FORBIDDEN).with_body(body)
    }

    pub fn not_found(body: Value) -> Self {
        Self::new(StatusCode::NOT_FOUND).with_body(body)
    }

    pub fn internal_server_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for HttpResponse {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        };
        response.headers_mut().extend(self.headers);
        response
    }
}
