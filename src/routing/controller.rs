//! Route registry.
//!
//! # Responsibilities
//! - Own a named set of routes under an optional prefix
//! - Attach hooks to every route or to named routes
//! - Re-prefix all routes when the registry is nested under another one
//!
//! # Design Decisions
//! - Names are unique; re-adding a name replaces the route in place,
//!   keeping its position in iteration order
//! - Unknown names are configuration errors and are returned, never ignored
//! - Pre-hooks can be prepended, post-hooks appended; there is no
//!   prepend for post-hooks or append-at-bottom for pre-hooks beyond
//!   the `with_*` appenders
//! - Targeted operations check every name before mutating anything

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::hooks::{Handler, Middleware, ServiceInvocation};
use crate::http::HttpMethod;
use crate::routing::path;
use crate::routing::reduced::ReducedRoute;

/// Registry configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("No route called {0} could be found.")]
    NotFound(String),
}

/// One route owned by a [`Controller`].
#[derive(Clone)]
pub struct Route {
    pub http_method: HttpMethod,
    pub path: String,
    pub pre_hooks: Vec<Middleware>,
    pub post_hooks: Vec<Middleware>,
    pub handler: Arc<dyn Handler>,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("http_method", &self.http_method)
            .field("path", &self.path)
            .field("pre_hooks", &self.pre_hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .field("post_hooks", &self.post_hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Named routes scoped under an optional prefix.
#[derive(Debug, Clone)]
pub struct Controller<N> {
    prefix: Option<String>,
    routes: Vec<(N, Route)>,
}

impl<N> Default for Controller<N> {
    fn default() -> Self {
        Self {
            prefix: None,
            routes: Vec::new(),
        }
    }
}

impl<N> Controller<N>
where
    N: Clone + PartialEq + fmt::Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            routes: Vec::new(),
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Register a route. An existing route with the same name is replaced.
    pub fn add_route(&mut self, name: N, http_method: HttpMethod, route_path: &str, handler: Arc<dyn Handler>) {
        let path = match &self.prefix {
            Some(prefix) => path::join(prefix, route_path),
            None => path::normalize(route_path),
        };
        let route = Route {
            http_method,
            path,
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
            handler,
        };

        match self.position(&name) {
            Some(i) => self.routes[i].1 = route,
            None => self.routes.push((name, route)),
        }
    }

    pub fn get_route(&self, name: &N) -> Result<&Route, RouteError> {
        self.position(name)
            .map(|i| &self.routes[i].1)
            .ok_or_else(|| RouteError::NotFound(name.to_string()))
    }

    /// Insert `hooks` before all existing pre-hooks of every route.
    pub fn add_pre_hooks_at_the_top(&mut self, hooks: &[Middleware]) {
        for (_, route) in &mut self.routes {
            route.pre_hooks.splice(0..0, hooks.iter().cloned());
        }
    }

    /// Append `hooks` after all existing post-hooks of every route.
    pub fn add_post_hooks_at_the_bottom(&mut self, hooks: &[Middleware]) {
        for (_, route) in &mut self.routes {
            route.post_hooks.extend(hooks.iter().cloned());
        }
    }

    /// Append one pre-hook to the named routes, or to all routes if `names` is empty.
    pub fn with_pre_hook(&mut self, hook: Middleware, names: &[N]) -> Result<&mut Self, RouteError> {
        self.with_pre_hooks(&[hook], names)
    }

    /// Append pre-hooks to the named routes, or to all routes if `names` is empty.
    pub fn with_pre_hooks(&mut self, hooks: &[Middleware], names: &[N]) -> Result<&mut Self, RouteError> {
        for i in self.targets(names)? {
            self.routes[i].1.pre_hooks.extend(hooks.iter().cloned());
        }
        Ok(self)
    }

    /// Append one post-hook to the named routes, or to all routes if `names` is empty.
    pub fn with_post_hook(&mut self, hook: Middleware, names: &[N]) -> Result<&mut Self, RouteError> {
        self.with_post_hooks(&[hook], names)
    }

    /// Append post-hooks to the named routes, or to all routes if `names` is empty.
    pub fn with_post_hooks(&mut self, hooks: &[Middleware], names: &[N]) -> Result<&mut Self, RouteError> {
        for i in self.targets(names)? {
            self.routes[i].1.post_hooks.extend(hooks.iter().cloned());
        }
        Ok(self)
    }

    /// Prefix every route path with `prefix`.
    pub fn add_path_at_the_beginning(&mut self, prefix: &str) {
        for (_, route) in &mut self.routes {
            route.path = path::join(prefix, &route.path);
        }
    }

    /// Snapshot of all routes in insertion order.
    pub fn routes(&self) -> Vec<Route> {
        self.routes.iter().map(|(_, route)| route.clone()).collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &N> {
        self.routes.iter().map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Flatten every route into `pre_hooks ++ [handler] ++ post_hooks`.
    pub fn reduce(&self, success_status: u16) -> Vec<ReducedRoute> {
        self.routes
            .iter()
            .map(|(_, route)| {
                let mut middlewares = Vec::with_capacity(route.pre_hooks.len() + 1 + route.post_hooks.len());
                middlewares.extend(route.pre_hooks.iter().cloned());
                middlewares.push(ServiceInvocation::middleware(route.handler.clone()));
                middlewares.extend(route.post_hooks.iter().cloned());
                ReducedRoute {
                    http_method: route.http_method,
                    paths: vec![route.path.clone()],
                    success_status,
                    middlewares,
                }
            })
            .collect()
    }

    fn position(&self, name: &N) -> Option<usize> {
        self.routes.iter().position(|(n, _)| n == name)
    }

    fn targets(&self, names: &[N]) -> Result<Vec<usize>, RouteError> {
        if names.is_empty() {
            return Ok((0..self.routes.len()).collect());
        }
        names
            .iter()
            .map(|name| self.position(name).ok_or_else(|| RouteError::NotFound(name.to_string())))
            .collect()
    }
}
