//! Hook metadata registry.
//!
//! Replaces class/method annotations with an explicit map built at wiring
//! time: service type → class-level hooks, (service type, method name) →
//! method-level hooks. Lists keep declaration order. Anything not
//! registered reads as an empty list.

use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::hooks::Middleware;

const NO_HOOKS: &[Middleware] = &[];

/// Ordered pre-hooks and post-hooks declared at one level.
#[derive(Clone, Default)]
pub struct HookSet {
    pre: Vec<Middleware>,
    post: Vec<Middleware>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pre_hook(mut self, hook: Middleware) -> Self {
        self.pre.push(hook);
        self
    }

    pub fn post_hook(mut self, hook: Middleware) -> Self {
        self.post.push(hook);
        self
    }

    pub fn pre_hooks(&self) -> &[Middleware] {
        &self.pre
    }

    pub fn post_hooks(&self) -> &[Middleware] {
        &self.post
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }

    fn extend(&mut self, other: HookSet) {
        self.pre.extend(other.pre);
        self.post.extend(other.post);
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSet")
            .field("pre", &self.pre.iter().map(|h| h.name()).collect::<Vec<_>>())
            .field("post", &self.post.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Hooks declared for one service: class-level plus per-method sets.
#[derive(Debug, Clone, Default)]
pub struct ServiceHooks {
    class: HookSet,
    methods: HashMap<String, HookSet>,
}

impl ServiceHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a class-level pre-hook.
    pub fn pre_hook(mut self, hook: Middleware) -> Self {
        self.class.pre.push(hook);
        self
    }

    /// Append a class-level post-hook.
    pub fn post_hook(mut self, hook: Middleware) -> Self {
        self.class.post.push(hook);
        self
    }

    /// Declare hooks for the method called `name`.
    pub fn method(mut self, name: &str, declare: impl FnOnce(HookSet) -> HookSet) -> Self {
        let set = self.methods.remove(name).unwrap_or_default();
        self.methods.insert(name.to_string(), declare(set));
        self
    }

    pub fn class_hooks(&self) -> &HookSet {
        &self.class
    }

    pub fn method_hooks(&self, name: &str) -> Option<&HookSet> {
        self.methods.get(name)
    }

    fn extend(&mut self, other: ServiceHooks) {
        self.class.extend(other.class);
        for (name, set) in other.methods {
            self.methods.entry(name).or_default().extend(set);
        }
    }
}

#[derive(Debug)]
struct Entry {
    service: &'static str,
    hooks: ServiceHooks,
}

/// Registry of hook declarations keyed by service type.
#[derive(Debug, Default)]
pub struct HookMetadata {
    entries: HashMap<TypeId, Entry>,
}

impl HookMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register hooks for service `S`. Repeated calls append in call order.
    pub fn register<S: 'static>(&mut self, hooks: ServiceHooks) {
        let service = type_name::<S>();
        tracing::debug!(service, "Registering service hooks");
        self.entries
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Entry {
                service,
                hooks: ServiceHooks::default(),
            })
            .hooks
            .extend(hooks);
    }

    pub fn get<S: 'static>(&self) -> Option<&ServiceHooks> {
        self.entries.get(&TypeId::of::<S>()).map(|e| &e.hooks)
    }

    pub fn class_pre_hooks<S: 'static>(&self) -> &[Middleware] {
        self.get::<S>().map_or(NO_HOOKS, |h| h.class.pre_hooks())
    }

    pub fn class_post_hooks<S: 'static>(&self) -> &[Middleware] {
        self.get::<S>().map_or(NO_HOOKS, |h| h.class.post_hooks())
    }

    pub fn method_pre_hooks<S: 'static>(&self, method: &str) -> &[Middleware] {
        self.get::<S>()
            .and_then(|h| h.method_hooks(method))
            .map_or(NO_HOOKS, HookSet::pre_hooks)
    }

    pub fn method_post_hooks<S: 'static>(&self, method: &str) -> &[Middleware] {
        self.get::<S>()
            .and_then(|h| h.method_hooks(method))
            .map_or(NO_HOOKS, HookSet::post_hooks)
    }

    /// Names of services with registered hooks.
    pub fn services(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.values().map(|e| e.service)
    }
}
