//! Hook Router
//!
//! Binds service operations to HTTP routes and composes the hooks declared
//! around them into one ordered, short-circuiting middleware chain per route.
//!
//! # Architecture Overview
//!
//! ```text
//!   Wiring (startup)                                   Serving (per request)
//!   ────────────────                                   ─────────────────────
//!   ┌──────────────┐   register_hooks   ┌──────────┐
//!   │  services    │◀───────────────────│ startup  │
//!   │ manager +    │                    └────┬─────┘
//!   │ metadata     │                         │ attach_service(prefix)
//!   └──────┬───────┘                         ▼
//!          │ resolve / hook lists     ┌──────────────┐       ┌──────────────┐
//!          └─────────────────────────▶│   factory    │──────▶│ ReducedRoute │
//!                                     └──────────────┘       └──────┬───────┘
//!   ┌──────────────┐  reduce()                                      │
//!   │  routing     │────────────────────────────────────────────────┤
//!   │ (Controller) │                                                ▼
//!   └──────────────┘                                         ┌──────────────┐
//!                                     Client ───────────────▶│ http server  │
//!                                                            └──────┬───────┘
//!                                                                   ▼
//!                                                            ┌──────────────┐
//!                                                            │ hooks::chain │
//!                                                            │ pre → invoke │
//!                                                            │  → post      │
//!                                                            └──────────────┘
//! ```
//!
//! # Chain order
//!
//! `class pre ++ method pre ++ [invoke] ++ method post ++ class post`.
//! A hook returning [`hooks::HookOutcome::Abort`] ends the chain with its
//! response; nothing after it runs.

// Core subsystems
pub mod factory;
pub mod hooks;
pub mod http;
pub mod routing;
pub mod services;

// Built-in service
pub mod admin;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use factory::{ControllerFactory, DeclaredRoute};
pub use hooks::{Hook, HookError, HookOutcome};
pub use http::{Context, HttpMethod, HttpResponse, HttpServer};
pub use lifecycle::Shutdown;
pub use routing::{Controller, ReducedRoute};
pub use services::{Service, ServiceManager};
