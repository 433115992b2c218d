//! Startup orchestration.
//!
//! # Responsibilities
//! - Register hook declarations for built-in services
//! - Bind controllers against one service manager
//! - Hand the resulting routes to the transport
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - The service manager is frozen behind an `Arc` once wiring ends

use std::sync::Arc;

use crate::admin::{ApiKeyHook, StatusController, StatusService};
use crate::config::AppConfig;
use crate::factory::ControllerFactory;
use crate::hooks::JwtHook;
use crate::routing::ReducedRoute;
use crate::services::{ServiceHooks, ServiceManager};

/// Wired application, ready to serve.
pub struct Application {
    pub services: Arc<ServiceManager>,
    pub routes: Vec<ReducedRoute>,
}

/// Wire built-in services from `config`.
pub fn build_application(config: &AppConfig) -> Application {
    let mut services = ServiceManager::new();
    let mut routes = Vec::new();

    if config.admin.enabled {
        let mut hooks = ServiceHooks::new();
        if !config.admin.api_key.is_empty() {
            hooks = hooks.pre_hook(Arc::new(ApiKeyHook::new(&config.admin.api_key)));
        }
        if !config.jwt.secret.is_empty() {
            let jwt = Arc::new(JwtHook::from_config(true, &config.jwt));
            hooks = hooks.method("whoami", |m| m.pre_hook(jwt));
        }
        services.register_hooks::<StatusService>(hooks);
        routes.extend(StatusController.attach_service(&config.admin.prefix).bind(&services));
    }

    tracing::info!(routes = routes.len(), "Application wired");
    Application {
        services: Arc::new(services),
        routes,
    }
}
