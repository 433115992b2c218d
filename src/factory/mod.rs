//! Controller factory subsystem.
//!
//! # Data Flow
//! ```text
//! ControllerFactory::attach_service(prefix)
//!     → ServiceBinder (prefix captured, nothing resolved yet)
//!     → bind(&ServiceManager)
//!         → resolve service instance
//!         → routes(service) → DeclaredRoute[]
//!         → merge class + method hooks around each invocation
//!         → ReducedRoute[] (paths = [prefix, route path])
//! ```

pub mod controller_factory;

pub use controller_factory::{merge_hooks, ControllerFactory, DeclaredRoute, ServiceBinder};
