//! Controller factory tests: hook merge order, path building and the
//! short-circuit contract over a fully attached service.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use hook_router::factory::{ControllerFactory, DeclaredRoute};
use hook_router::hooks::{
    async_handler, execute_chain, handler_fn, hook_fn, ChainOutcome, Hook, HookError, HookOutcome, HookResult,
};
use hook_router::services::ServiceHooks;
use hook_router::{Context, HttpMethod, HttpResponse, Service, ServiceManager};
use serde_json::json;

use common::{entries, services_id, state_hook, trail, trail_hook, Trail};

struct Greeter;

impl Service for Greeter {
    fn create(_: &ServiceManager) -> Self {
        Greeter
    }
}

impl Greeter {
    async fn foobar(&self) -> String {
        "Hello world".to_string()
    }
}

struct GreeterController;

impl ControllerFactory for GreeterController {
    type Service = Greeter;

    fn routes(&self, service: Arc<Greeter>) -> Vec<DeclaredRoute> {
        vec![
            DeclaredRoute::new(
                HttpMethod::Get,
                "/foobar",
                async_handler(move |_ctx| {
                    let service = service.clone();
                    async move { Ok::<_, HookError>(json!(service.foobar().await)) }
                }),
            )
            .service_method("foobar")
            .success_status(10000),
            DeclaredRoute::new(HttpMethod::Post, "/plain", handler_fn(|_, _| Ok(json!("plain")))),
        ]
    }
}

const CLASS_PRE: [&str; 2] = ["preClass1", "preClass2"];
const CLASS_POST: [&str; 2] = ["postClass1", "postClass2"];
const METHOD_PRE: [&str; 2] = ["preMethod1", "preMethod2"];
const METHOD_POST: [&str; 2] = ["postMethod1", "postMethod2"];

fn greeter_hooks() -> ServiceHooks {
    ServiceHooks::new()
        .pre_hook(state_hook(CLASS_PRE[0]))
        .pre_hook(state_hook(CLASS_PRE[1]))
        .post_hook(state_hook(CLASS_POST[0]))
        .post_hook(state_hook(CLASS_POST[1]))
        .method("foobar", |m| {
            m.pre_hook(state_hook(METHOD_PRE[0]))
                .pre_hook(state_hook(METHOD_PRE[1]))
                .post_hook(state_hook(METHOD_POST[0]))
                .post_hook(state_hook(METHOD_POST[1]))
        })
}

fn greeter_services() -> ServiceManager {
    let mut services = ServiceManager::new();
    services.register_hooks::<Greeter>(greeter_hooks());
    services
}

#[test]
fn test_attach_builds_prefix_and_route_paths() {
    let services = greeter_services();
    let routes = GreeterController.attach_service("/my_path").bind(&services);

    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].http_method, HttpMethod::Get);
    assert_eq!(routes[0].paths, vec!["/my_path".to_string(), "/foobar".to_string()]);
    assert_eq!(routes[0].success_status, 10000);
    assert_eq!(routes[0].pattern(), "/my_path/foobar");

    assert_eq!(routes[1].http_method, HttpMethod::Post);
    assert_eq!(routes[1].success_status, 200);
}

#[test]
fn test_chain_order_with_method_hooks() {
    let services = greeter_services();
    let routes = GreeterController.attach_service("/my_path").bind(&services);

    assert_eq!(routes[0].middlewares.len(), 9);
    assert_eq!(
        routes[0].middleware_names(),
        vec![
            "preClass1",
            "preClass2",
            "preMethod1",
            "preMethod2",
            "service_invocation",
            "postMethod1",
            "postMethod2",
            "postClass1",
            "postClass2",
        ]
    );
}

#[test]
fn test_route_without_method_gets_class_hooks_only() {
    let services = greeter_services();
    let routes = GreeterController.attach_service("/my_path").bind(&services);

    assert_eq!(routes[1].middlewares.len(), 5);
    assert_eq!(
        routes[1].middleware_names(),
        vec!["preClass1", "preClass2", "service_invocation", "postClass1", "postClass2"]
    );
}

#[test]
fn test_service_without_metadata() {
    let services = ServiceManager::new();
    let routes = GreeterController.attach_service("/").bind(&services);

    assert!(routes.iter().all(|r| r.middleware_names() == vec!["service_invocation"]));
}

#[tokio::test]
async fn test_stepping_through_chain_accumulates_state() {
    let services = greeter_services();
    let routes = GreeterController.attach_service("/my_path").bind(&services);
    let chain = &routes[0].middlewares;
    let id = services_id(&services);
    let mut ctx = Context::empty();

    let before_invoke: Vec<&str> = CLASS_PRE.iter().chain(METHOD_PRE.iter()).copied().collect();
    for (i, key) in before_invoke.iter().enumerate() {
        assert_eq!(chain[i].call(&mut ctx, &services).await.unwrap(), HookOutcome::Continue);
        assert_eq!(ctx.state[*key], json!({ "services": id }));
        assert_eq!(ctx.state.len(), i + 1);
    }

    assert!(ctx.result.is_none());
    chain[4].call(&mut ctx, &services).await.unwrap();
    assert_eq!(ctx.result, Some(json!("Hello world")));

    let after_invoke: Vec<&str> = METHOD_POST.iter().chain(CLASS_POST.iter()).copied().collect();
    for (i, key) in after_invoke.iter().enumerate() {
        chain[5 + i].call(&mut ctx, &services).await.unwrap();
        assert_eq!(ctx.state[*key], json!({ "services": id }));
    }
    assert_eq!(ctx.state.len(), 8);
}

#[tokio::test]
async fn test_full_chain_completes() {
    let services = greeter_services();
    let routes = GreeterController.attach_service("/my_path").bind(&services);
    let mut ctx = Context::empty();

    let outcome = execute_chain(&routes[0].middlewares, &mut ctx, &services).await.unwrap();
    assert_eq!(outcome, ChainOutcome::Completed);
    assert_eq!(ctx.result, Some(json!("Hello world")));
    assert_eq!(ctx.state.len(), 8);
}

#[tokio::test]
async fn test_abort_in_method_pre_hook_skips_invocation_and_post_hooks() {
    let log = trail();
    let mut services = ServiceManager::new();
    services.register_hooks::<Greeter>(
        ServiceHooks::new()
            .pre_hook(trail_hook("class-pre", &log))
            .post_hook(trail_hook("class-post", &log))
            .method("foobar", |m| {
                m.pre_hook(hook_fn("deny", |_, _| {
                    Ok(HookOutcome::Abort(
                        HttpResponse::new(StatusCode::FORBIDDEN).with_body(json!({ "code": "forbidden" })),
                    ))
                }))
                .pre_hook(trail_hook("method-pre", &log))
                .post_hook(trail_hook("method-post", &log))
            }),
    );
    let routes = GreeterController.attach_service("/").bind(&services);
    let mut ctx = Context::empty();

    match execute_chain(&routes[0].middlewares, &mut ctx, &services).await.unwrap() {
        ChainOutcome::Aborted { position, response } => {
            assert_eq!(position, 1);
            assert_eq!(response.status, StatusCode::FORBIDDEN);
            assert_eq!(response.body, Some(json!({ "code": "forbidden" })));
        }
        ChainOutcome::Completed => panic!("expected abort"),
    }
    assert_eq!(entries(&log), vec!["class-pre"]);
    assert!(ctx.result.is_none());
}

#[tokio::test]
async fn test_abort_in_class_post_hook_keeps_earlier_effects() {
    let log = trail();
    let mut services = ServiceManager::new();
    services.register_hooks::<Greeter>(
        ServiceHooks::new()
            .post_hook(hook_fn("gate", |_, _| {
                Ok(HookOutcome::Abort(HttpResponse::new(StatusCode::ACCEPTED)))
            }))
            .post_hook(trail_hook("never", &log))
            .method("foobar", |m| m.post_hook(trail_hook("method-post", &log))),
    );
    let routes = GreeterController.attach_service("/").bind(&services);
    let mut ctx = Context::empty();

    let outcome = execute_chain(&routes[0].middlewares, &mut ctx, &services).await.unwrap();
    assert!(outcome.is_aborted());
    assert_eq!(entries(&log), vec!["method-post"]);
    assert_eq!(ctx.result, Some(json!("Hello world")));
}

#[tokio::test]
async fn test_hook_error_stops_chain() {
    let log = trail();
    let mut services = ServiceManager::new();
    services.register_hooks::<Greeter>(
        ServiceHooks::new()
            .pre_hook(hook_fn("explode", |_, _| Err(HookError::new("lookup failed"))))
            .post_hook(trail_hook("after", &log)),
    );
    let routes = GreeterController.attach_service("/").bind(&services);
    let mut ctx = Context::empty();

    let err = execute_chain(&routes[1].middlewares, &mut ctx, &services).await.unwrap_err();
    assert_eq!(err.to_string(), "lookup failed");
    assert!(entries(&log).is_empty());
    assert!(ctx.result.is_none());
}

#[test]
fn test_service_resolved_once_across_binds() {
    let services = ServiceManager::new();
    GreeterController.attach_service("/a").bind(&services);
    let first = services.cached::<Greeter>().unwrap();
    GreeterController.attach_service("/b").bind(&services);
    let second = services.cached::<Greeter>().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

/// Waits on a timer, records itself, then answers with `outcome`.
struct Throttle {
    name: &'static str,
    trail: Trail,
    outcome: HookOutcome,
}

#[async_trait]
impl Hook for Throttle {
    async fn call(&self, _ctx: &mut Context, _services: &ServiceManager) -> HookResult {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.trail.lock().unwrap().push(self.name.to_string());
        Ok(self.outcome.clone())
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[tokio::test]
async fn test_suspending_hooks_run_in_declared_order() {
    let log = trail();
    let throttle = |name, outcome| {
        Arc::new(Throttle {
            name,
            trail: log.clone(),
            outcome,
        })
    };
    let mut services = ServiceManager::new();
    services.register_hooks::<Greeter>(
        ServiceHooks::new()
            .pre_hook(throttle("class-pre", HookOutcome::Continue))
            .pre_hook(trail_hook("class-pre-sync", &log))
            .post_hook(throttle("class-post", HookOutcome::Continue))
            .method("foobar", |m| {
                m.pre_hook(throttle("method-pre", HookOutcome::Continue))
                    .post_hook(trail_hook("method-post-sync", &log))
            }),
    );
    let routes = GreeterController.attach_service("/").bind(&services);
    let mut ctx = Context::empty();

    let outcome = execute_chain(&routes[0].middlewares, &mut ctx, &services).await.unwrap();
    assert_eq!(outcome, ChainOutcome::Completed);
    assert_eq!(
        entries(&log),
        vec!["class-pre", "class-pre-sync", "method-pre", "method-post-sync", "class-post"]
    );
    assert_eq!(ctx.result, Some(json!("Hello world")));
}

#[tokio::test]
async fn test_abort_after_suspension_stops_chain() {
    let log = trail();
    let mut services = ServiceManager::new();
    services.register_hooks::<Greeter>(
        ServiceHooks::new()
            .pre_hook(Arc::new(Throttle {
                name: "quota",
                trail: log.clone(),
                outcome: HookOutcome::Abort(HttpResponse::new(StatusCode::TOO_MANY_REQUESTS)),
            }))
            .pre_hook(trail_hook("after-quota", &log))
            .post_hook(trail_hook("class-post", &log)),
    );
    let routes = GreeterController.attach_service("/").bind(&services);
    let mut ctx = Context::empty();

    let response = execute_chain(&routes[0].middlewares, &mut ctx, &services)
        .await
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(entries(&log), vec!["quota"]);
    assert!(ctx.result.is_none());
}
