use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use serde_json::Value;

use crate::factory::{ControllerFactory, DeclaredRoute};
use crate::hooks::{handler_fn, HookError};
use crate::http::HttpMethod;
use crate::services::{Service, ServiceManager};

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub uptime_secs: u64,
}

pub struct StatusService {
    started_at: Instant,
}

impl Service for StatusService {
    fn create(_services: &ServiceManager) -> Self {
        Self {
            started_at: Instant::now(),
        }
    }
}

impl StatusService {
    pub fn status(&self) -> SystemStatus {
        SystemStatus {
            version: env!("CARGO_PKG_VERSION"),
            status: "operational",
            uptime_secs: self.started_at.elapsed().as_secs(),
        }
    }
}

/// Routes of [`StatusService`].
pub struct StatusController;

impl ControllerFactory for StatusController {
    type Service = StatusService;

    fn routes(&self, service: Arc<StatusService>) -> Vec<DeclaredRoute> {
        vec![
            DeclaredRoute::new(
                HttpMethod::Get,
                "/status",
                handler_fn(move |_, _| serde_json::to_value(service.status()).map_err(HookError::new)),
            )
            .service_method("status"),
            DeclaredRoute::new(
                HttpMethod::Get,
                "/whoami",
                handler_fn(|ctx, _| Ok(ctx.user.clone().unwrap_or(Value::Null))),
            )
            .service_method("whoami"),
        ]
    }
}
