//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use hook_router::hooks::{hook_fn, HookOutcome, Middleware};
use hook_router::ServiceManager;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Order in which hooks ran.
pub type Trail = Arc<Mutex<Vec<String>>>;

pub fn trail() -> Trail {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(trail: &Trail) -> Vec<String> {
    trail.lock().unwrap().clone()
}

/// Hook that appends `name` to `trail` and continues.
pub fn trail_hook(name: &'static str, trail: &Trail) -> Middleware {
    let trail = trail.clone();
    hook_fn(name, move |_, _| {
        trail.lock().unwrap().push(name.to_string());
        Ok(HookOutcome::Continue)
    })
}

/// Address of a service manager, for checking which one a hook received.
pub fn services_id(services: &ServiceManager) -> String {
    format!("{:p}", services)
}

/// Hook that records the manager it was called with under `ctx.state[key]`.
pub fn state_hook(key: &'static str) -> Middleware {
    hook_fn(key, move |ctx, services| {
        ctx.state.insert(key.to_string(), json!({ "services": services_id(services) }));
        Ok(HookOutcome::Continue)
    })
}

/// Signed HS256 token with a far-future expiry.
pub fn token(secret: &str, sub: &str) -> String {
    let claims = json!({ "sub": sub, "exp": 4_102_444_800u64 });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Send one request through `router` and decode the body as JSON (`Null` when empty).
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
