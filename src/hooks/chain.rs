//! Short-circuit executor.
//!
//! # Responsibilities
//! - Run a middleware chain strictly in order, awaiting each entry
//! - Stop at the first hook that aborts and surface its response
//! - Hand hook errors back untouched
//!
//! # Design Decisions
//! - No concurrency inside a chain; one request, one sequential walk
//! - No catch-all around hooks; classification belongs to the transport

use crate::hooks::hook::{HookError, HookOutcome, Middleware};
use crate::http::{Context, HttpResponse};
use crate::observability::metrics;
use crate::services::ServiceManager;

/// How a chain finished.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOutcome {
    /// Every middleware ran and continued.
    Completed,
    /// The middleware at `position` aborted with `response`.
    Aborted { position: usize, response: HttpResponse },
}

impl ChainOutcome {
    pub fn is_aborted(&self) -> bool {
        matches!(self, ChainOutcome::Aborted { .. })
    }

    pub fn into_response(self) -> Option<HttpResponse> {
        match self {
            ChainOutcome::Completed => None,
            ChainOutcome::Aborted { response, .. } => Some(response),
        }
    }
}

/// Execute `middlewares` in order against one request context.
pub async fn execute_chain(
    middlewares: &[Middleware],
    ctx: &mut Context,
    services: &ServiceManager,
) -> Result<ChainOutcome, HookError> {
    for (position, middleware) in middlewares.iter().enumerate() {
        match middleware.call(ctx, services).await {
            Ok(HookOutcome::Continue) => continue,
            Ok(HookOutcome::Abort(response)) => {
                tracing::debug!(
                    position,
                    hook = middleware.name(),
                    status = %response.status,
                    "Middleware chain aborted"
                );
                metrics::record_chain("aborted");
                return Ok(ChainOutcome::Aborted { position, response });
            }
            Err(e) => {
                metrics::record_chain("failed");
                return Err(e);
            }
        }
    }

    metrics::record_chain("completed");
    Ok(ChainOutcome::Completed)
}
