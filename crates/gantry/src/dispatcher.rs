// File: src/dispatcher.rs
// Purpose: Per-request pipeline - resolve, authorize, validate, invoke, respond

use crate::app::{App, RegisteredAction};
use crate::auth::{authorize, AuthError};
use crate::controller::ActionContext;
use crate::request::{Request, Response};
use gantry_router::{normalize_path, AuthorizationSpec, ResolveError, RouteTarget};
use gantry_validation::{validate, Schema};
use serde_json::{json, Map};
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// Runs one request through the pipeline and maps every failure to its
/// status code
///
/// Stages run in a fixed order and fail fast: resolve, authorize, validate,
/// invoke, respond. Validation never runs before authorization, so
/// unauthenticated callers cannot probe validation errors. Convention
/// fallback is attempted only on `NotFound`; a declared route that matched
/// the path shape owns it, so `MethodNotAllowed` stays a 405.
pub(crate) fn dispatch(app: &App, request: &Request) -> Response {
    let path = effective_path(app, &request.path);

    match app.table.resolve(request.method, &path) {
        Ok(found) => {
            debug!(
                method = %request.method,
                path = %path,
                target = %found.route.target,
                "route resolved"
            );
            let Some(action) = app.handlers.get(&found.route.target) else {
                error!(target = %found.route.target, "no handler registered for resolved route");
                return internal_error();
            };
            run_gates(
                app,
                request,
                found.route.options.auth.as_ref(),
                found.route.options.schema.as_ref(),
                action,
                found.params,
            )
        }
        Err(ResolveError::MethodNotAllowed { allowed, .. }) => {
            warn!(method = %request.method, path = %path, "method not allowed");
            Response::new(
                405,
                json!({
                    "error": "method not allowed",
                    "allow": allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>(),
                }),
            )
        }
        Err(ResolveError::NotFound { .. }) => fallback(app, request, &path),
    }
}

/// Convention-based resolution: `/{module}/{controller}/{action}`
///
/// Lower priority by construction: reached only after every declared route
/// failed to match. The synthesized match carries no path parameters; the
/// action's declared auth and validation specs still apply.
fn fallback(app: &App, request: &Request, path: &str) -> Response {
    if app.config.routing.convention_fallback {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if let [module, controller, action] = segments.as_slice() {
            let target = RouteTarget::new(*module, *controller, *action);
            if let Some(registered) = app.handlers.get(&target) {
                debug!(method = %request.method, path = %path, target = %target, "convention fallback resolved");
                return run_gates(
                    app,
                    request,
                    registered.auth.as_ref(),
                    registered.schema.as_ref(),
                    registered,
                    HashMap::new(),
                );
            }
        }
    }

    debug!(method = %request.method, path = %path, "no route matched");
    Response::new(404, json!({"error": "not found"}))
}

/// Authorization and validation gates, then the action itself
fn run_gates(
    app: &App,
    request: &Request,
    auth: Option<&AuthorizationSpec>,
    schema: Option<&Schema>,
    action: &RegisteredAction,
    params: HashMap<String, String>,
) -> Response {
    let identity = match authorize(auth, request, &app.guards) {
        Ok(identity) => identity,
        Err(AuthError::Unauthenticated) => {
            debug!(method = %request.method, path = %request.path, "unauthenticated");
            return Response::new(401, json!({"error": "unauthenticated"}));
        }
        Err(AuthError::Forbidden) => {
            // Intentionally terse: which permission was missing is not disclosed
            debug!(method = %request.method, path = %request.path, "forbidden");
            return Response::new(403, json!({"error": "forbidden"}));
        }
        Err(AuthError::UnknownGuard(name)) => {
            error!(guard = %name, "route references an unregistered guard");
            return internal_error();
        }
    };

    let input = match schema {
        Some(schema) => match validate(schema, &request.payload) {
            Ok(validated) => validated,
            Err(err) => {
                debug!(fields = err.errors.len(), "validation failed");
                return Response::new(
                    422,
                    json!({"error": "validation failed", "fields": err.errors}),
                );
            }
        },
        None => Map::new(),
    };

    let cx = ActionContext {
        request,
        params,
        input,
        identity,
    };
    (action.handler)(&cx).into_response()
}

/// Strips the configured base path, then normalizes
///
/// The base path only strips at a segment boundary: the remainder must be
/// empty or start with `/`, so `/apiuser/42` is not rewritten when the base
/// is `/api`.
fn effective_path(app: &App, raw: &str) -> String {
    let stripped = match app.config.routing.base_path.as_deref() {
        Some(base) if !base.is_empty() => raw
            .strip_prefix(base)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(raw),
        _ => raw,
    };
    normalize_path(stripped).into_owned()
}

fn internal_error() -> Response {
    Response::new(500, json!({"error": "internal server error"}))
}
