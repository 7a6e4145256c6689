// File: tests/dispatch_tests.rs
// Purpose: Full-pipeline integration tests - resolve, authorize, validate, invoke

use gantry::{
    Action, App, AppConfig, AuthorizationSpec, Controller, FieldRules, Guard, HttpMethod,
    Identity, Module, Request, Response, Schema, ValueType,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

/// Accepts requests carrying `x-token: secret` as alice with the given permissions
struct TokenGuard {
    permissions: Vec<String>,
}

impl TokenGuard {
    fn new<const N: usize>(permissions: [&str; N]) -> Arc<Self> {
        Arc::new(Self {
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        })
    }
}

impl Guard for TokenGuard {
    fn authenticate(&self, request: &Request) -> Option<Identity> {
        (request.header("x-token") == Some("secret"))
            .then(|| Identity::with_permissions("alice", self.permissions.clone()))
    }
}

fn user_module() -> Module {
    Module::new("home").controller(
        Controller::new("user")
            .action(Action::new("profile", |_| json!({"page": "profile"})).get("/user/profile"))
            .action(
                Action::new("show", |cx| json!({"id": cx.param("id")}))
                    .get("/user/{id:alphanum}"),
            )
            .action(
                Action::new("create", |cx| (201, Value::Object(cx.input.clone())))
                    .post("/user")
                    .validate(
                        Schema::new()
                            .field("name", FieldRules::new().min(1.0))
                            .field("contact.email", FieldRules::new().email()),
                    ),
            ),
    )
}

fn admin_module() -> Module {
    Module::new("ops").controller(
        Controller::new("admin")
            .action(
                Action::new("purge", |_| json!({"purged": true}))
                    .delete("/admin/cache")
                    .auth(AuthorizationSpec::new().permission("admin")),
            )
            .action(
                Action::new("report", |cx| {
                    json!({"by": cx.identity.as_ref().map(|i| i.subject.clone())})
                })
                .auth(AuthorizationSpec::new()),
            ),
    )
}

fn app() -> App {
    App::builder()
        .module(user_module())
        .module(admin_module())
        .guard("jwt", TokenGuard::new(["admin"]))
        .build()
        .unwrap()
}

#[test]
fn test_declared_route_runs_end_to_end() {
    let response = app().handle(&Request::new(HttpMethod::Get, "/user/abc123"));
    assert_eq!(response, Response::ok(json!({"id": "abc123"})));
}

#[test]
fn test_static_route_wins_by_registration_order() {
    let response = app().handle(&Request::new(HttpMethod::Get, "/user/profile"));
    assert_eq!(response.body, json!({"page": "profile"}));
}

#[test]
fn test_unmatched_path_is_404() {
    let response = app().handle(&Request::new(HttpMethod::Get, "/nowhere/at/all/deep"));
    assert_eq!(response.status, 404);
    assert_eq!(response.body, json!({"error": "not found"}));
}

#[test]
fn test_wrong_method_is_405_with_allow_list() {
    let response = app().handle(&Request::new(HttpMethod::Post, "/user/profile"));
    assert_eq!(response.status, 405);
    assert_eq!(response.body["allow"], json!(["GET"]));
}

#[test]
fn test_405_suppresses_convention_fallback() {
    // /ops/admin/report is reachable by fallback, but declaring a GET route
    // on the same shape makes a POST a 405, not a fallback hit
    let module = Module::new("ops").controller(
        Controller::new("admin").action(
            Action::new("report", |_| json!({"declared": true})).get("/ops/admin/report"),
        ),
    );
    let app = App::builder().module(module).build().unwrap();

    let response = app.handle(&Request::new(HttpMethod::Post, "/ops/admin/report"));
    assert_eq!(response.status, 405);
}

#[test]
fn test_missing_credentials_are_401() {
    let response = app().handle(&Request::new(HttpMethod::Delete, "/admin/cache"));
    assert_eq!(response.status, 401);
    assert_eq!(response.body, json!({"error": "unauthenticated"}));
}

#[test]
fn test_missing_permission_is_403() {
    let app = App::builder()
        .module(admin_module())
        .guard("jwt", TokenGuard::new(["viewer"]))
        .build()
        .unwrap();

    let request = Request::new(HttpMethod::Delete, "/admin/cache").with_header("x-token", "secret");
    let response = app.handle(&request);
    assert_eq!(response.status, 403);
    assert_eq!(response.body, json!({"error": "forbidden"}));
}

#[test]
fn test_authorized_request_reaches_the_action() {
    let request = Request::new(HttpMethod::Delete, "/admin/cache").with_header("x-token", "secret");
    let response = app().handle(&request);
    assert_eq!(response, Response::ok(json!({"purged": true})));
}

#[test]
fn test_unregistered_guard_is_500_not_401() {
    let module = Module::new("ops").controller(
        Controller::new("admin").action(
            Action::new("purge", |_| json!(null))
                .delete("/admin/cache")
                .auth(AuthorizationSpec::with_guard("session")),
        ),
    );
    let app = App::builder().module(module).build().unwrap();

    let response = app.handle(&Request::new(HttpMethod::Delete, "/admin/cache"));
    assert_eq!(response.status, 500);
    assert_eq!(response.body, json!({"error": "internal server error"}));
}

#[test]
fn test_invalid_payload_is_422_with_every_error() {
    let request = Request::new(HttpMethod::Post, "/user")
        .with_payload(json!({"contact": {"email": "not-an-email"}}));
    let response = app().handle(&request);

    assert_eq!(response.status, 422);
    assert_eq!(response.body["error"], json!("validation failed"));
    // Both fields reported in one pass
    assert!(response.body["fields"]["name"].is_array());
    assert!(response.body["fields"]["contact.email"].is_array());
}

#[test]
fn test_valid_payload_is_allow_listed_before_the_action() {
    let request = Request::new(HttpMethod::Post, "/user").with_payload(json!({
        "name": "alice",
        "contact": {"email": "alice@example.com"},
        "role": "superuser"
    }));
    let response = app().handle(&request);

    assert_eq!(response.status, 201);
    // The undeclared "role" field never reaches the action
    assert_eq!(
        response.body,
        json!({"name": "alice", "contact.email": "alice@example.com"})
    );
}

#[test]
fn test_convention_fallback_reaches_undeclared_action() {
    let request =
        Request::new(HttpMethod::Get, "/ops/admin/report").with_header("x-token", "secret");
    let response = app().handle(&request);
    assert_eq!(response, Response::ok(json!({"by": "alice"})));
}

#[test]
fn test_convention_fallback_still_enforces_auth() {
    let response = app().handle(&Request::new(HttpMethod::Get, "/ops/admin/report"));
    assert_eq!(response.status, 401);
}

#[test]
fn test_convention_fallback_can_be_disabled() {
    let config: AppConfig = toml::from_str("[routing]\nconvention_fallback = false").unwrap();
    let app = App::builder()
        .config(config)
        .module(user_module())
        .build()
        .unwrap();

    let response = app.handle(&Request::new(HttpMethod::Get, "/home/user/profile"));
    assert_eq!(response.status, 404);
}

#[test]
fn test_fallback_needs_exactly_three_segments() {
    let app = app();
    assert_eq!(
        app.handle(&Request::new(HttpMethod::Get, "/ops/admin")).status,
        404
    );
    assert_eq!(
        app.handle(&Request::new(HttpMethod::Get, "/ops/admin/report/extra"))
            .status,
        404
    );
}

#[test]
fn test_base_path_is_stripped_before_resolution() {
    let config: AppConfig = toml::from_str("[routing]\nbase_path = \"/api\"").unwrap();
    let app = App::builder()
        .config(config)
        .module(user_module())
        .build()
        .unwrap();

    let response = app.handle(&Request::new(HttpMethod::Get, "/api/user/abc123"));
    assert_eq!(response.body, json!({"id": "abc123"}));
}

#[test]
fn test_base_path_strips_only_at_segment_boundaries() {
    let config: AppConfig = toml::from_str("[routing]\nbase_path = \"/api\"").unwrap();
    let app = App::builder()
        .config(config)
        .module(user_module())
        .build()
        .unwrap();

    // Shares the string prefix but not the path segment; must stay untouched
    let response = app.handle(&Request::new(HttpMethod::Get, "/apiuser/abc123"));
    assert_eq!(response.status, 404);

    // The bare base path resolves as root
    let response = app.handle(&Request::new(HttpMethod::Get, "/api"));
    assert_eq!(response.status, 404); // no root route declared, but not misrouted
}

#[test]
fn test_trailing_slash_resolves_like_canonical_path() {
    let response = app().handle(&Request::new(HttpMethod::Get, "/user/profile/"));
    assert_eq!(response.status, 200);
}

#[test]
fn test_rule_mismatch_falls_through_to_404() {
    // alphanum rejects the dash, and no fallback target exists for this shape
    let response = app().handle(&Request::new(HttpMethod::Get, "/user/abc-123"));
    assert_eq!(response.status, 404);
}

#[test]
fn test_custom_rule_constrains_declared_route() {
    let module = Module::new("home").controller(Controller::new("order").action(
        Action::new("show", |cx| json!({"code": cx.param("code")})).get("/order/{code:hex}"),
    ));
    let app = App::builder()
        .rule("hex", "[0-9a-f]+")
        .module(module)
        .build()
        .unwrap();

    assert_eq!(
        app.handle(&Request::new(HttpMethod::Get, "/order/deadbeef"))
            .status,
        200
    );
    assert_eq!(
        app.handle(&Request::new(HttpMethod::Get, "/order/XYZ")).status,
        404
    );
}

#[test]
fn test_repeated_dispatch_is_deterministic() {
    let app = app();
    let request = Request::new(HttpMethod::Get, "/user/abc123");
    let first = app.handle(&request);
    let second = app.handle(&request);
    assert_eq!(first, second);
}

#[test]
fn test_validation_runs_after_authorization() {
    // An unauthenticated request to a guarded, schema-bearing action must
    // get 401, never a validation report
    let module = Module::new("ops").controller(
        Controller::new("admin").action(
            Action::new("create", |_| json!(null))
                .post("/admin/users")
                .auth(AuthorizationSpec::new())
                .validate(Schema::new().field("name", FieldRules::new().typed(ValueType::String))),
        ),
    );
    let app = App::builder()
        .module(module)
        .guard("jwt", TokenGuard::new([]))
        .build()
        .unwrap();

    let response = app.handle(&Request::new(HttpMethod::Post, "/admin/users"));
    assert_eq!(response.status, 401);
}
