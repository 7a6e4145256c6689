// File: src/lib.rs
// Purpose: Framework crate - modules, controllers, dispatch pipeline

//! Declarative request dispatch for module/controller/action applications.
//!
//! An application is a set of modules, each owning controllers, each owning
//! actions. Actions declare their routes, authorization requirements, and
//! validation schemas as data; bootstrap scans those declarations into a
//! compiled route table and every request then runs a fixed pipeline:
//! resolve, authorize, validate, invoke.
//!
//! ```
//! use gantry::{Action, App, Controller, Module, Request};
//! use gantry_router::HttpMethod;
//! use serde_json::json;
//!
//! let app = App::builder()
//!     .module(Module::new("home").controller(
//!         Controller::new("user").action(
//!             Action::new("show", |cx| json!({"id": cx.param("id")}))
//!                 .get("/user/{id:alphanum}"),
//!         ),
//!     ))
//!     .build()
//!     .unwrap();
//!
//! let response = app.handle(&Request::new(HttpMethod::Get, "/user/42"));
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body, json!({"id": "42"}));
//! ```
//!
//! Requests that resolve nowhere get a 404, a matched path with the wrong
//! method a 405, a failed guard 401 or 403, and a failed schema 422. When no
//! declared route matches, `/{module}/{controller}/{action}` convention
//! fallback is tried before giving up.

pub mod app;
pub mod auth;
pub mod config;
pub mod controller;
mod dispatcher;
pub mod request;

pub use app::{App, AppBuilder, BootstrapError};
pub use auth::{authorize, AuthError, Guard, GuardRegistry, Identity};
pub use config::{AppConfig, ProjectConfig, RoutingConfig};
pub use controller::{
    scan_controller, Action, ActionContext, ActionFn, Controller, Module, RouteDecl, ScanError,
};
pub use request::{IntoOutcome, Outcome, Request, Response};

// The routing and validation vocabulary actions are written against
pub use gantry_router::{
    AuthorizationSpec, HttpMethod, Permission, RouteDescriptor, RouteTable, RouteTarget,
    RouterError, RuleRegistry, DEFAULT_GUARD,
};
pub use gantry_validation::{FieldRules, Schema, ValidationError, ValueType};
