//! Hook contract.
//!
//! # Responsibilities
//! - Define the shape every middleware satisfies (pre-hooks, post-hooks,
//!   and the service invocation itself)
//! - Distinguish "continue" from "abort with a response" at the type level
//! - Carry hook failures to the transport untouched
//!
//! # Design Decisions
//! - Hooks are async trait objects shared via `Arc`
//! - Sync closures are adapted with [`hook_fn`]
//! - Service operations implement [`Handler`] and are wrapped in a
//!   [`ServiceInvocation`] hook that stores their value in `Context::result`

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::http::{Context, HttpResponse};
use crate::services::ServiceManager;

/// Boxed error type accepted from hook and handler implementations.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Error raised inside a hook. Passed through the chain unmodified.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct HookError(BoxError);

impl HookError {
    pub fn new(err: impl Into<BoxError>) -> Self {
        Self(err.into())
    }

    pub fn into_inner(self) -> BoxError {
        self.0
    }
}

/// What a hook decided.
#[derive(Debug, Clone, PartialEq)]
pub enum HookOutcome {
    /// Run the next middleware.
    Continue,
    /// Stop the chain; this response is final.
    Abort(HttpResponse),
}

pub type HookResult = Result<HookOutcome, HookError>;

/// A middleware entry.
#[async_trait]
pub trait Hook: Send + Sync {
    async fn call(&self, ctx: &mut Context, services: &ServiceManager) -> HookResult;

    /// Name used in logs and debug output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared hook handle. Chains and hook lists are sequences of these.
pub type Middleware = Arc<dyn Hook>;

/// Hook built from a synchronous closure.
pub struct FnHook<F> {
    name: &'static str,
    f: F,
}

#[async_trait]
impl<F> Hook for FnHook<F>
where
    F: Fn(&mut Context, &ServiceManager) -> HookResult + Send + Sync,
{
    async fn call(&self, ctx: &mut Context, services: &ServiceManager) -> HookResult {
        (self.f)(ctx, services)
    }

    fn name(&self) -> &str {
        self.name
    }
}

/// Wrap a synchronous closure as a hook.
pub fn hook_fn<F>(name: &'static str, f: F) -> Middleware
where
    F: Fn(&mut Context, &ServiceManager) -> HookResult + Send + Sync + 'static,
{
    Arc::new(FnHook { name, f })
}

/// A service operation bound to a route.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &mut Context, services: &ServiceManager) -> Result<Value, HookError>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(&mut Context, &ServiceManager) -> Result<Value, HookError> + Send + Sync,
{
    async fn handle(&self, ctx: &mut Context, services: &ServiceManager) -> Result<Value, HookError> {
        (self.0)(ctx, services)
    }
}

/// Wrap a synchronous closure as a handler.
pub fn handler_fn<F>(f: F) -> Arc<dyn Handler>
where
    F: Fn(&mut Context, &ServiceManager) -> Result<Value, HookError> + Send + Sync + 'static,
{
    Arc::new(FnHandler(f))
}

struct AsyncFnHandler<F>(F);

#[async_trait]
impl<F, Fut> Handler for AsyncFnHandler<F>
where
    F: Fn(&mut Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, HookError>> + Send + 'static,
{
    async fn handle(&self, ctx: &mut Context, _services: &ServiceManager) -> Result<Value, HookError> {
        (self.0)(ctx).await
    }
}

/// Wrap an async service call as a handler.
///
/// The closure reads what it needs from the context synchronously and
/// returns an owned future, typically over a cloned `Arc` of the service.
pub fn async_handler<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(&mut Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, HookError>> + Send + 'static,
{
    Arc::new(AsyncFnHandler(f))
}

/// Hook that runs a service operation and stores its value in `Context::result`.
pub struct ServiceInvocation {
    handler: Arc<dyn Handler>,
}

impl ServiceInvocation {
    pub fn new(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    pub fn middleware(handler: Arc<dyn Handler>) -> Middleware {
        Arc::new(Self::new(handler))
    }
}

#[async_trait]
impl Hook for ServiceInvocation {
    async fn call(&self, ctx: &mut Context, services: &ServiceManager) -> HookResult {
        let value = self.handler.handle(ctx, services).await?;
        ctx.result = Some(value);
        Ok(HookOutcome::Continue)
    }

    fn name(&self) -> &str {
        "service_invocation"
    }
}

impl fmt::Debug for dyn Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hook({})", self.name())
    }
}
