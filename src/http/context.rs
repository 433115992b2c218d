//! Per-request context threaded through a middleware chain.
//!
//! # Responsibilities
//! - Carry the inbound request (head + buffered body)
//! - Hold the authenticated principal written by auth hooks
//! - Provide a scratch map for hooks to pass data down the chain
//! - Hold the value produced by the service invocation
//!
//! # Design Decisions
//! - One context per request, owned by the transport; never shared
//! - Body is buffered as `Bytes` so the context is `Send + Sync`

use axum::body::Bytes;
use axum::http::{header, Method, Request};
use serde_json::{Map, Value};

use crate::http::request::X_REQUEST_ID;

/// Mutable state for one in-flight request.
#[derive(Debug)]
pub struct Context {
    /// Inbound request.
    pub request: Request<Bytes>,

    /// Authenticated principal, if an auth hook accepted the request.
    pub user: Option<Value>,

    /// Free-form state shared between hooks of the same chain.
    pub state: Map<String, Value>,

    /// Value returned by the service invocation.
    pub result: Option<Value>,
}

impl Context {
    pub fn new(request: Request<Bytes>) -> Self {
        Self {
            request,
            user: None,
            state: Map::new(),
            result: None,
        }
    }

    /// Context around an empty `GET /` request.
    pub fn empty() -> Self {
        Self::new(Request::new(Bytes::new()))
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// First value of header `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    /// Value of cookie `name` across all `Cookie` headers.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.header(X_REQUEST_ID)
    }

    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// Parse the buffered body as JSON.
    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        if self.request.body().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(self.request.body())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::empty()
    }
}
