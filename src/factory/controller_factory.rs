//! Controller factory.
//!
//! # Responsibilities
//! - Resolve a service instance and ask the implementer for its routes
//! - Merge class-level and method-level hooks around each service call
//! - Emit one `ReducedRoute` per declared route
//!
//! # Chain order
//! ```text
//! class pre ++ method pre ++ [invoke] ++ method post ++ class post
//! ```
//! Method-level segments are empty when a route names no service method.
//!
//! # Design Decisions
//! - Binding is deferred: `attach_service` captures the prefix, `bind`
//!   receives the resolver, so each test can bind against its own manager
//! - Reduced routes are built fresh on every `bind`

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::hooks::{Handler, Middleware, ServiceInvocation};
use crate::http::HttpMethod;
use crate::routing::{path, ReducedRoute};
use crate::services::{Service, ServiceManager};

/// A route as declared by a factory implementer.
#[derive(Clone)]
pub struct DeclaredRoute {
    pub http_method: HttpMethod,
    pub path: String,

    /// Invocation of the bound service operation.
    pub middleware: Arc<dyn Handler>,

    /// Method whose hooks apply, or `None` for class-level hooks only.
    pub service_method_name: Option<String>,

    pub success_status: u16,
}

impl DeclaredRoute {
    pub fn new(http_method: HttpMethod, path: impl Into<String>, middleware: Arc<dyn Handler>) -> Self {
        Self {
            http_method,
            path: path.into(),
            middleware,
            service_method_name: None,
            success_status: 200,
        }
    }

    pub fn service_method(mut self, name: impl Into<String>) -> Self {
        self.service_method_name = Some(name.into());
        self
    }

    pub fn success_status(mut self, status: u16) -> Self {
        self.success_status = status;
        self
    }
}

impl fmt::Debug for DeclaredRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredRoute")
            .field("http_method", &self.http_method)
            .field("path", &self.path)
            .field("service_method_name", &self.service_method_name)
            .field("success_status", &self.success_status)
            .finish_non_exhaustive()
    }
}

/// Binds a service type to the routes it serves.
pub trait ControllerFactory: Send + Sync {
    type Service: Service;

    /// Routes served by `service`.
    fn routes(&self, service: Arc<Self::Service>) -> Vec<DeclaredRoute>;

    /// Defer binding under `prefix` until a resolver is available.
    fn attach_service(&self, prefix: &str) -> ServiceBinder<'_, Self>
    where
        Self: Sized,
    {
        ServiceBinder {
            factory: self,
            prefix: path::normalize(prefix),
            _service: PhantomData,
        }
    }
}

/// A factory waiting for a resolver.
pub struct ServiceBinder<'a, F: ControllerFactory> {
    factory: &'a F,
    prefix: String,
    _service: PhantomData<fn() -> F::Service>,
}

impl<'a, F: ControllerFactory> ServiceBinder<'a, F> {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Resolve the service from `services` and reduce its routes.
    pub fn bind(&self, services: &ServiceManager) -> Vec<ReducedRoute> {
        let service = services.resolve::<F::Service>();
        let hooks = services.hooks();
        let class_pre = hooks.class_pre_hooks::<F::Service>();
        let class_post = hooks.class_post_hooks::<F::Service>();

        let routes: Vec<ReducedRoute> = self
            .factory
            .routes(service)
            .into_iter()
            .map(|route| {
                let (method_pre, method_post) = match route.service_method_name.as_deref() {
                    Some(method) => (
                        hooks.method_pre_hooks::<F::Service>(method),
                        hooks.method_post_hooks::<F::Service>(method),
                    ),
                    None => (&[][..], &[][..]),
                };
                let middlewares = merge_hooks(class_pre, method_pre, route.middleware, method_post, class_post);

                ReducedRoute {
                    http_method: route.http_method,
                    paths: vec![self.prefix.clone(), path::normalize(&route.path)],
                    success_status: route.success_status,
                    middlewares,
                }
            })
            .collect();

        tracing::debug!(
            service = type_name::<F::Service>(),
            prefix = %self.prefix,
            routes = routes.len(),
            "Service attached"
        );
        routes
    }
}

/// Build `class_pre ++ method_pre ++ [invoke] ++ method_post ++ class_post`.
pub fn merge_hooks(
    class_pre: &[Middleware],
    method_pre: &[Middleware],
    invoke: Arc<dyn Handler>,
    method_post: &[Middleware],
    class_post: &[Middleware],
) -> Vec<Middleware> {
    let mut chain =
        Vec::with_capacity(class_pre.len() + method_pre.len() + 1 + method_post.len() + class_post.len());
    chain.extend(class_pre.iter().cloned());
    chain.extend(method_pre.iter().cloned());
    chain.push(ServiceInvocation::middleware(invoke));
    chain.extend(method_post.iter().cloned());
    chain.extend(class_post.iter().cloned());
    chain
}
