//! Route registry composition: nesting registries and running the
//! flattened chains.

mod common;

use axum::http::StatusCode;
use hook_router::hooks::{execute_chain, handler_fn, hook_fn, ChainOutcome, HookOutcome};
use hook_router::routing::RouteError;
use hook_router::{Context, Controller, HttpMethod, HttpResponse, ServiceManager};
use serde_json::json;

use common::{entries, trail, trail_hook};

#[tokio::test]
async fn test_nested_registry_wraps_hooks_like_an_onion() {
    let log = trail();
    let mut users: Controller<String> = Controller::with_prefix("/users");
    users.add_route("list".into(), HttpMethod::Get, "/", handler_fn(|_, _| Ok(json!([]))));
    users.add_route("show".into(), HttpMethod::Get, "/{id}", handler_fn(|_, _| Ok(json!({}))));
    users
        .with_pre_hook(trail_hook("inner-pre", &log), &["show".to_string()])
        .unwrap()
        .with_post_hook(trail_hook("inner-post", &log), &[])
        .unwrap();

    // Mounting under an outer registry.
    users.add_path_at_the_beginning("/api//v2");
    users.add_pre_hooks_at_the_top(&[trail_hook("outer-pre", &log)]);
    users.add_post_hooks_at_the_bottom(&[trail_hook("outer-post", &log)]);

    let reduced = users.reduce(200);
    assert_eq!(reduced.len(), 2);
    assert_eq!(reduced[0].pattern(), "/api/v2/users/");
    assert_eq!(reduced[1].pattern(), "/api/v2/users/{id}");
    assert_eq!(
        reduced[1].middleware_names(),
        vec!["outer-pre", "inner-pre", "service_invocation", "inner-post", "outer-post"]
    );

    let services = ServiceManager::new();
    let mut ctx = Context::empty();
    let outcome = execute_chain(&reduced[1].middlewares, &mut ctx, &services).await.unwrap();
    assert_eq!(outcome, ChainOutcome::Completed);
    assert_eq!(entries(&log), vec!["outer-pre", "inner-pre", "inner-post", "outer-post"]);
    assert_eq!(ctx.result, Some(json!({})));
}

#[tokio::test]
async fn test_outer_guard_short_circuits_inner_routes() {
    let log = trail();
    let mut admin: Controller<&str> = Controller::new();
    admin.add_route("purge", HttpMethod::Delete, "/cache", handler_fn(|_, _| Ok(json!("purged"))));
    admin.with_pre_hook(trail_hook("audit", &log), &[]).unwrap();
    admin.add_pre_hooks_at_the_top(&[hook_fn("guard", |_, _| {
        Ok(HookOutcome::Abort(HttpResponse::forbidden(json!({ "code": "forbidden" }))))
    })]);

    let reduced = admin.reduce(200);
    let services = ServiceManager::new();
    let mut ctx = Context::empty();

    let response = execute_chain(&reduced[0].middlewares, &mut ctx, &services)
        .await
        .unwrap()
        .into_response()
        .unwrap();
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert!(entries(&log).is_empty());
    assert!(ctx.result.is_none());
}

#[test]
fn test_unknown_target_leaves_registry_untouched() {
    let log = trail();
    let mut controller: Controller<&str> = Controller::new();
    controller.add_route("a", HttpMethod::Get, "/a", handler_fn(|_, _| Ok(json!(null))));

    let err = controller
        .with_pre_hooks(&[trail_hook("h", &log)], &["a", "missing"])
        .unwrap_err();
    assert_eq!(err, RouteError::NotFound("missing".into()));
    assert_eq!(err.to_string(), "No route called missing could be found.");
    assert!(controller.get_route(&"a").unwrap().pre_hooks.is_empty());
}
