//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Register service hooks → Bind controllers → ReducedRoute[]
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight chains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - All wiring finishes before the listener is bound; routes and hooks are
//!   never mutated while serving
//! - Fail fast: any startup error is fatal

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{build_application, Application};
