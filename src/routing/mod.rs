//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declaration (at startup):
//!     Controller::add_route(name, method, path, handler)
//!     → path.rs (prefix + path, collapse separators)
//!     → hook attachment (with_*, add_*_at_the_top/bottom)
//!     → nesting (add_path_at_the_beginning)
//!     → reduce() → ReducedRoute[]
//!
//! Serving:
//!     ReducedRoute.paths → path::concat → route pattern
//! ```
//!
//! # Design Decisions
//! - Routes are mutated only during wiring, immutable once reduced
//! - Deterministic: hook order is exactly the order of attachment calls

pub mod controller;
pub mod path;
pub mod reduced;

pub use controller::{Controller, Route, RouteError};
pub use path::normalize;
pub use reduced::ReducedRoute;
