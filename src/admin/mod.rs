//! Built-in status service.
//!
//! # Routes (under `admin.prefix`)
//! - `GET /status`: version, state and uptime
//! - `GET /whoami`: the principal set by an auth hook, or `null`
//!
//! # Hooks
//! - Class level: API key check when `admin.api_key` is set
//! - `whoami`: required JWT when `jwt.secret` is set

pub mod auth;
pub mod handlers;

pub use auth::ApiKeyHook;
pub use handlers::{StatusController, StatusService, SystemStatus};
