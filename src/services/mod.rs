//! Service resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Wiring (startup):
//!     ServiceManager::register_hooks::<S>(ServiceHooks)
//!     → metadata.rs (class + method hook lists, declaration order)
//!
//! Binding (ControllerFactory::attach_service → ServiceBinder::bind):
//!     manager.rs resolve::<S>() (create-or-reuse singleton)
//!     → metadata.rs lookups (absent ⇒ empty)
//! ```

pub mod manager;
pub mod metadata;

pub use manager::{Service, ServiceManager};
pub use metadata::{HookMetadata, HookSet, ServiceHooks};
