// File: src/controller.rs
// Purpose: Declarative action/controller registration and the route scanner

use crate::auth::Identity;
use crate::request::{IntoOutcome, Outcome, Request};
use gantry_router::{
    AuthorizationSpec, HttpMethod, RouteDescriptor, RouteOptions, RouteTarget,
};
use gantry_validation::Schema;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Everything an action sees when invoked: extracted path parameters, the
/// validated payload (empty map when the action declares no schema), and
/// the identity established by the authorization gate
pub struct ActionContext<'r> {
    pub request: &'r Request,
    pub params: HashMap<String, String>,
    pub input: Map<String, Value>,
    pub identity: Option<Identity>,
}

impl ActionContext<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn input(&self, field: &str) -> Option<&Value> {
        self.input.get(field)
    }
}

/// Boxed action handler, shared between the route table and the fallback index
pub type ActionFn = Arc<dyn Fn(&ActionContext) -> Outcome + Send + Sync>;

/// One HTTP-method declaration on an action (repeatable)
#[derive(Debug, Clone)]
pub struct RouteDecl {
    pub methods: Vec<HttpMethod>,
    pub uri: String,
}

/// A controller action with its declared routes, authorization requirement,
/// and validation schema
///
/// This is the explicit, data-driven equivalent of method attributes: an
/// action carries zero or more route declarations (an action with none stays
/// reachable only through convention-based fallback), at most one
/// authorization spec, and at most one schema.
///
/// ```
/// use gantry::{Action, AuthorizationSpec};
/// use serde_json::json;
///
/// let action = Action::new("show", |cx| json!({"id": cx.param("id")}))
///     .get("/user/{id:alphanum}")
///     .auth(AuthorizationSpec::new());
/// assert_eq!(action.name, "show");
/// ```
pub struct Action {
    pub name: String,
    pub(crate) routes: Vec<RouteDecl>,
    pub(crate) auth: Option<AuthorizationSpec>,
    pub(crate) schema: Option<Schema>,
    pub(crate) handler: ActionFn,
}

impl Action {
    pub fn new<F, R>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ActionContext) -> R + Send + Sync + 'static,
        R: IntoOutcome,
    {
        Self {
            name: name.into(),
            routes: Vec::new(),
            auth: None,
            schema: None,
            handler: Arc::new(move |cx| handler(cx).into_outcome()),
        }
    }

    /// Declares a route for an explicit set of methods
    pub fn route(mut self, methods: Vec<HttpMethod>, uri: impl Into<String>) -> Self {
        self.routes.push(RouteDecl {
            methods,
            uri: uri.into(),
        });
        self
    }

    pub fn get(self, uri: impl Into<String>) -> Self {
        self.route(vec![HttpMethod::Get], uri)
    }

    pub fn post(self, uri: impl Into<String>) -> Self {
        self.route(vec![HttpMethod::Post], uri)
    }

    pub fn put(self, uri: impl Into<String>) -> Self {
        self.route(vec![HttpMethod::Put], uri)
    }

    pub fn patch(self, uri: impl Into<String>) -> Self {
        self.route(vec![HttpMethod::Patch], uri)
    }

    pub fn delete(self, uri: impl Into<String>) -> Self {
        self.route(vec![HttpMethod::Delete], uri)
    }

    pub fn cli(self, uri: impl Into<String>) -> Self {
        self.route(vec![HttpMethod::Cli], uri)
    }

    /// Attaches the authorization requirement (at most one per action)
    pub fn auth(mut self, spec: AuthorizationSpec) -> Self {
        self.auth = Some(spec);
        self
    }

    /// Attaches the validation schema (at most one per action)
    pub fn validate(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// A named controller owning a set of actions
pub struct Controller {
    pub name: String,
    pub(crate) actions: Vec<Action>,
}

impl Controller {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: Vec::new(),
        }
    }

    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

/// A named module owning a set of controllers
pub struct Module {
    pub name: String,
    pub(crate) controllers: Vec<Controller>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            controllers: Vec::new(),
        }
    }

    pub fn controller(mut self, controller: Controller) -> Self {
        self.controllers.push(controller);
        self
    }
}

/// Malformed declarations, surfaced at startup — never deferred to the
/// first request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("invalid route declaration on {controller}@{action}: {reason}")]
    InvalidRouteDeclaration {
        controller: String,
        action: String,
        reason: String,
    },
}

/// Produces route descriptors for every declared route of a controller
///
/// Pure inspection: handlers are never invoked. Fails fast on an empty URI
/// or an empty verb set, naming the offending controller and action. Actions
/// without route declarations yield no descriptors but remain invocable
/// through convention-based fallback.
pub fn scan_controller(
    module: &str,
    controller: &Controller,
) -> Result<Vec<RouteDescriptor>, ScanError> {
    let mut descriptors = Vec::new();

    for action in &controller.actions {
        for decl in &action.routes {
            if decl.uri.is_empty() {
                return Err(ScanError::InvalidRouteDeclaration {
                    controller: controller.name.clone(),
                    action: action.name.clone(),
                    reason: "route URI must not be empty".to_string(),
                });
            }
            if decl.methods.is_empty() {
                return Err(ScanError::InvalidRouteDeclaration {
                    controller: controller.name.clone(),
                    action: action.name.clone(),
                    reason: "route must declare at least one method".to_string(),
                });
            }

            let target = RouteTarget::new(module, &controller.name, &action.name);
            descriptors.push(
                RouteDescriptor::new(decl.methods.clone(), decl.uri.clone(), target)
                    .with_options(RouteOptions {
                        auth: action.auth.clone(),
                        schema: action.schema.clone(),
                    }),
            );
        }
    }

    Ok(descriptors)
}
