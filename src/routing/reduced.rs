//! Transport-facing route descriptor.

use std::fmt;

use crate::hooks::Middleware;
use crate::http::HttpMethod;
use crate::routing::path;

/// A flattened route: method, path hierarchy, one ordered middleware chain.
#[derive(Clone)]
pub struct ReducedRoute {
    pub http_method: HttpMethod,

    /// Path segments, outer-most first. Not concatenated so callers can
    /// still see the nesting.
    pub paths: Vec<String>,

    /// Status used when the chain completes without aborting.
    pub success_status: u16,

    /// Pre-hooks, the service invocation and post-hooks, in run order.
    pub middlewares: Vec<Middleware>,
}

impl ReducedRoute {
    /// Single route pattern built from `paths`.
    pub fn pattern(&self) -> String {
        path::concat(&self.paths)
    }

    /// Middleware names in run order.
    pub fn middleware_names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name()).collect()
    }
}

impl fmt::Debug for ReducedRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReducedRoute")
            .field("http_method", &self.http_method)
            .field("paths", &self.paths)
            .field("success_status", &self.success_status)
            .field("middlewares", &self.middleware_names())
            .finish()
    }
}
