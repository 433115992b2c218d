//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, one handler per ReducedRoute)
//!       (pattern.rs checks each pattern before it is mounted)
//!     → request.rs (assign / propagate request ID)
//!     → context.rs (buffered request + per-request state)
//!     → hooks::chain (middlewares run in order)
//!     → response.rs (abort response, or success status + result)
//!     → Send to client
//! ```

pub mod context;
pub mod method;
pub mod pattern;
pub mod request;
pub mod response;
pub mod server;

pub use context::Context;
pub use method::HttpMethod;
pub use pattern::PatternError;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::HttpResponse;
pub use server::HttpServer;
