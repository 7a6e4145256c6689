// File: src/app.rs
// Purpose: Application bootstrap - rule/guard/module registration, table build

use crate::auth::{Guard, GuardRegistry};
use crate::config::AppConfig;
use crate::controller::{scan_controller, ActionFn, Module, ScanError};
use crate::dispatcher;
use crate::request::{Request, Response};
use gantry_router::{
    AuthorizationSpec, RouteTable, RouteTarget, RouterError, RuleRegistry,
};
use gantry_validation::Schema;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Failures surfaced during [`AppBuilder::build`]
///
/// Every declaration defect is a bootstrap failure: the application either
/// starts with a fully compiled route table or does not start at all.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Declaration(#[from] ScanError),

    #[error(transparent)]
    Routing(#[from] RouterError),

    /// Two actions in the same controller share a name; the later one would
    /// silently take over the earlier one's routes, auth, and schema
    #[error("action `{0}` is registered twice")]
    DuplicateAction(RouteTarget),
}

/// Handler plus the gates it runs behind, indexed by target
///
/// Declared routes and convention fallback resolve to the same entry, so an
/// action's auth and schema hold no matter which way a request reached it.
pub(crate) struct RegisteredAction {
    pub(crate) handler: ActionFn,
    pub(crate) auth: Option<AuthorizationSpec>,
    pub(crate) schema: Option<Schema>,
}

/// A bootstrapped application: compiled route table, handler index, guards
///
/// Immutable once built. `handle` is the single entry point; it owns the
/// whole pipeline and always returns a response.
pub struct App {
    pub(crate) config: AppConfig,
    pub(crate) table: RouteTable,
    pub(crate) handlers: HashMap<RouteTarget, RegisteredAction>,
    pub(crate) guards: GuardRegistry,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("table", &self.table)
            .field("handlers", &self.handlers.keys())
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// Dispatches one request through resolve, authorize, validate, invoke
    pub fn handle(&self, request: &Request) -> Response {
        dispatcher::dispatch(self, request)
    }

    pub fn routes(&self) -> &RouteTable {
        &self.table
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Collects modules, custom rules, and guards, then compiles the table
pub struct AppBuilder {
    config: AppConfig,
    rules: Vec<(String, String)>,
    modules: Vec<Module>,
    guards: GuardRegistry,
}

impl AppBuilder {
    fn new() -> Self {
        Self {
            config: AppConfig::default(),
            rules: Vec::new(),
            modules: Vec::new(),
            guards: GuardRegistry::new(),
        }
    }

    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a custom placeholder rule, available to every route
    pub fn rule(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.rules.push((name.into(), pattern.into()));
        self
    }

    pub fn module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn guard(mut self, name: impl Into<String>, guard: Arc<dyn Guard>) -> Self {
        self.guards.register(name, guard);
        self
    }

    /// Scans every module and compiles the route table
    ///
    /// Modules are scanned in registration order, controllers and actions in
    /// declaration order, so route precedence follows the order the
    /// application wrote its declarations in.
    pub fn build(self) -> Result<App, BootstrapError> {
        let mut rules = RuleRegistry::new();
        for (name, pattern) in self.rules {
            rules.register(&name, &pattern)?;
        }

        let mut descriptors = Vec::new();
        let mut handlers = HashMap::new();

        for module in &self.modules {
            for controller in &module.controllers {
                descriptors.extend(scan_controller(&module.name, controller)?);

                for action in &controller.actions {
                    let target =
                        RouteTarget::new(&module.name, &controller.name, &action.name);
                    if handlers.contains_key(&target) {
                        return Err(BootstrapError::DuplicateAction(target));
                    }
                    handlers.insert(
                        target,
                        RegisteredAction {
                            handler: Arc::clone(&action.handler),
                            auth: action.auth.clone(),
                            schema: action.schema.clone(),
                        },
                    );
                }
            }
        }

        let table = RouteTable::compile(descriptors, &rules)?;

        info!(
            app = %self.config.project.name,
            modules = self.modules.len(),
            actions = handlers.len(),
            "application bootstrapped"
        );

        Ok(App {
            config: self.config,
            table,
            handlers,
            guards: self.guards,
        })
    }
}
