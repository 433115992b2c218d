//! Hook subsystem.
//!
//! # Data Flow
//! ```text
//! Request context
//!     → chain.rs (walk middlewares in order)
//!     → hook.rs (each entry: Continue | Abort(response) | Err)
//!     → Completed, or Aborted at position k (entries > k never run)
//! ```
//!
//! # Design Decisions
//! - Short-circuit is a value, not an error
//! - Errors leave the chain exactly as the hook raised them
//! - jwt.rs is one concrete hook; anything implementing `Hook` plugs in the same way

pub mod chain;
pub mod hook;
pub mod jwt;

pub use chain::{execute_chain, ChainOutcome};
pub use hook::{
    async_handler, handler_fn, hook_fn, BoxError, Handler, Hook, HookError, HookOutcome, HookResult,
    Middleware, ServiceInvocation,
};
pub use jwt::{JwtHook, TokenSource};
