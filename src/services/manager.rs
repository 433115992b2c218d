//! Dependency resolver.
//!
//! # Responsibilities
//! - Construct service singletons on first request
//! - Cache them per type for the life of the manager
//! - Accept pre-built instances (test doubles, configured clients)
//! - Own the hook metadata registry used when services are attached
//!
//! # Design Decisions
//! - Passed explicitly to every binder and hook; never a global
//! - Construction runs outside the cache lock so services may resolve
//!   their own dependencies

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use dashmap::DashMap;

use crate::services::metadata::{HookMetadata, ServiceHooks};

type Instance = Arc<dyn Any + Send + Sync>;

/// A type the resolver can build.
pub trait Service: Send + Sync + 'static {
    fn create(services: &ServiceManager) -> Self
    where
        Self: Sized;
}

/// Per-application service container.
#[derive(Debug, Default)]
pub struct ServiceManager {
    instances: DashMap<TypeId, Instance>,
    hooks: HookMetadata,
}

impl ServiceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the singleton for `S`, creating it if needed.
    pub fn resolve<S: Service>(&self) -> Arc<S> {
        if let Some(existing) = self.cached::<S>() {
            return existing;
        }

        tracing::debug!(service = type_name::<S>(), "Creating service instance");
        let created = Arc::new(S::create(self));

        // Another caller may have raced us; keep whichever landed first.
        let stored = self
            .instances
            .entry(TypeId::of::<S>())
            .or_insert_with(|| created.clone() as Instance)
            .value()
            .clone();
        stored.downcast::<S>().unwrap_or(created)
    }

    /// Install `instance` as the singleton for `S`, replacing any existing one.
    pub fn set<S: Send + Sync + 'static>(&self, instance: Arc<S>) {
        self.instances.insert(TypeId::of::<S>(), instance as Instance);
    }

    /// Return the singleton for `S` only if it already exists.
    pub fn cached<S: Send + Sync + 'static>(&self) -> Option<Arc<S>> {
        self.instances
            .get(&TypeId::of::<S>())
            .and_then(|entry| entry.value().clone().downcast::<S>().ok())
    }

    /// Declare hooks for service `S`.
    pub fn register_hooks<S: 'static>(&mut self, hooks: ServiceHooks) -> &mut Self {
        self.hooks.register::<S>(hooks);
        self
    }

    pub fn hooks(&self) -> &HookMetadata {
        &self.hooks
    }
}
