//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Mount every `ReducedRoute` on an Axum router
//! - Wire up middleware (tracing, timeout, request ID)
//! - Build one `Context` per request and run the route's chain
//! - Render the outcome: abort response, success status + result, or 500
//!
//! # Design Decisions
//! - Routes with the same pattern share one method router
//! - Duplicate method + pattern: first route wins, later ones are skipped with a warning
//! - Patterns Axum would refuse are skipped with a warning instead of panicking
//! - Hook errors are classified here, not in the executor

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{on, MethodFilter, MethodRouter},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::hooks::{execute_chain, ChainOutcome};
use crate::http::context::Context;
use crate::http::method::HttpMethod;
use crate::http::pattern::{to_router_pattern, CaptureIndex};
use crate::http::request::MakeRequestUuid;
use crate::http::response::HttpResponse;
use crate::lifecycle::shutdown;
use crate::routing::ReducedRoute;
use crate::services::ServiceManager;

/// HTTP server serving a set of reduced routes.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    pub fn new(config: AppConfig, routes: Vec<ReducedRoute>, services: Arc<ServiceManager>) -> Self {
        let router = build_router(&config, routes, services);
        Self { router, config }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The assembled router, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &AppConfig, routes: Vec<ReducedRoute>, services: Arc<ServiceManager>) -> Router {
    let max_body_bytes = config.listener.max_body_bytes;
    let mut patterns: Vec<String> = Vec::new();
    let mut mounted: HashMap<String, (MethodRouter, Vec<HttpMethod>)> = HashMap::new();
    let mut captures = CaptureIndex::new();

    for route in routes {
        let method = route.http_method;
        let pattern = match to_router_pattern(&route.pattern()) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!(method = %method, error = %e, "Unmountable route skipped");
                continue;
            }
        };
        if !mounted.contains_key(&pattern) {
            if let Err(e) = captures.register(&pattern) {
                tracing::warn!(method = %method, error = %e, "Conflicting route skipped");
                continue;
            }
        }

        let (method_router, methods) = mounted.entry(pattern.clone()).or_insert_with(|| {
            patterns.push(pattern.clone());
            (MethodRouter::new(), Vec::new())
        });
        if methods.contains(&method) {
            tracing::warn!(method = %method, pattern = %pattern, "Duplicate route skipped");
            continue;
        }

        tracing::debug!(method = %method, pattern = %pattern, middlewares = route.middlewares.len(), "Mounting route");
        let route = Arc::new(route);
        let services = services.clone();
        let handler = move |request: Request<Body>| dispatch(route.clone(), services.clone(), max_body_bytes, request);

        *method_router = std::mem::replace(method_router, MethodRouter::new()).on(method_filter(method), handler);
        methods.push(method);
    }

    let mut router = Router::new();
    for pattern in patterns {
        if let Some((method_router, _)) = mounted.remove(&pattern) {
            router = router.route(&pattern, method_router);
        }
    }

    router
        .fallback(not_found)
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
}

fn method_filter(method: HttpMethod) -> MethodFilter {
    match method {
        HttpMethod::Get => MethodFilter::GET,
        HttpMethod::Post => MethodFilter::POST,
        HttpMethod::Put => MethodFilter::PUT,
        HttpMethod::Patch => MethodFilter::PATCH,
        HttpMethod::Delete => MethodFilter::DELETE,
        HttpMethod::Head => MethodFilter::HEAD,
        HttpMethod::Options => MethodFilter::OPTIONS,
    }
}

/// Run one request through its route's chain.
async fn dispatch(
    route: Arc<ReducedRoute>,
    services: Arc<ServiceManager>,
    max_body_bytes: usize,
    request: Request<Body>,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return HttpResponse::new(StatusCode::PAYLOAD_TOO_LARGE)
                .with_body(json!({ "code": "payload_too_large" }))
                .into_response();
        }
    };
    let mut ctx = Context::new(Request::from_parts(parts, bytes));

    match execute_chain(&route.middlewares, &mut ctx, &services).await {
        Ok(ChainOutcome::Aborted { response, .. }) => response.into_response(),
        Ok(ChainOutcome::Completed) => render_result(route.success_status, ctx.result),
        Err(e) => {
            tracing::error!(
                request_id = ctx.request_id().unwrap_or("unknown"),
                pattern = %route.pattern(),
                error = %e,
                "Middleware chain failed"
            );
            HttpResponse::internal_server_error().into_response()
        }
    }
}

fn render_result(success_status: u16, result: Option<Value>) -> Response {
    let status = StatusCode::from_u16(success_status).unwrap_or_else(|_| {
        tracing::warn!(success_status, "Invalid success status, using 200");
        StatusCode::OK
    });
    match result {
        None | Some(Value::Null) => status.into_response(),
        Some(value) => (status, Json(value)).into_response(),
    }
}

async fn not_found() -> HttpResponse {
    HttpResponse::not_found(json!({ "code": "not_found", "description": "No matching route found" }))
}
