// File: src/descriptor.rs
// Purpose: Route data model - methods, targets, typed option bag, descriptors

use crate::error::RouterError;
use gantry_validation::Schema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// HTTP methods a route can declare
///
/// `Cli` marks actions reachable from the command-line runner rather than
/// an HTTP verb; it participates in resolution like any other method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Cli,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Cli => "CLI",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = RouterError;

    /// Case-insensitive: `"get"` and `"GET"` both parse
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "CLI" => Ok(HttpMethod::Cli),
            _ => Err(RouterError::UnknownMethod(s.to_string())),
        }
    }
}

/// Invocation target: which action handles a matched request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteTarget {
    pub module: String,
    pub controller: String,
    pub action: String,
}

impl RouteTarget {
    pub fn new(
        module: impl Into<String>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            controller: controller.into(),
            action: action.into(),
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.module, self.controller, self.action)
    }
}

/// Permission requirement attached to an authorization spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Permission {
    /// The identity must hold exactly this permission
    Single(String),
    /// The identity must hold at least one of these
    AnyOf(Vec<String>),
}

impl Permission {
    pub fn satisfied_by(&self, held: &HashSet<String>) -> bool {
        match self {
            Permission::Single(p) => held.contains(p),
            Permission::AnyOf(any) => any.iter().any(|p| held.contains(p)),
        }
    }
}

/// Default guard consulted when a route requires authentication
pub const DEFAULT_GUARD: &str = "jwt";

/// Authorization requirement for a route; absence means the route is public
///
/// ```
/// use gantry_router::AuthorizationSpec;
///
/// let spec = AuthorizationSpec::new().permission("admin");
/// assert_eq!(spec.guard, "jwt");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizationSpec {
    pub guard: String,
    pub permission: Option<Permission>,
}

impl AuthorizationSpec {
    /// Authentication required through the default guard, no permission
    pub fn new() -> Self {
        Self {
            guard: DEFAULT_GUARD.to_string(),
            permission: None,
        }
    }

    /// Authentication required through a named guard
    pub fn with_guard(name: impl Into<String>) -> Self {
        Self {
            guard: name.into(),
            permission: None,
        }
    }

    /// Requires a single exact permission
    pub fn permission(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(Permission::Single(permission.into()));
        self
    }

    /// Requires at least one of the given permissions
    pub fn any_of<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permission = Some(Permission::AnyOf(
            permissions.into_iter().map(Into::into).collect(),
        ));
        self
    }
}

impl Default for AuthorizationSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed per-route options, validated at registration time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Authorization requirement; `None` means public
    pub auth: Option<AuthorizationSpec>,
    /// Validation schema applied to the request payload before invocation
    pub schema: Option<Schema>,
}

/// Declarative record of a route before compilation
///
/// Produced by the controller scanner, consumed by `RouteTable::compile`.
/// Immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteDescriptor {
    /// Declared methods, non-empty
    pub methods: Vec<HttpMethod>,
    /// Raw URI template with `{name}` / `{name:rule}` placeholders
    pub uri: String,
    pub target: RouteTarget,
    pub options: RouteOptions,
}

impl RouteDescriptor {
    pub fn new(methods: Vec<HttpMethod>, uri: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            methods,
            uri: uri.into(),
            target,
            options: RouteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("DELETE".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!("cli".parse::<HttpMethod>().unwrap(), HttpMethod::Cli);
        assert!("TRACE".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_target_display() {
        let target = RouteTarget::new("shop", "order", "show");
        assert_eq!(target.to_string(), "shop/order@show");
    }

    #[test]
    fn test_permission_satisfaction() {
        let held: HashSet<String> = ["editor".to_string()].into_iter().collect();

        assert!(Permission::Single("editor".to_string()).satisfied_by(&held));
        assert!(!Permission::Single("admin".to_string()).satisfied_by(&held));

        let any = Permission::AnyOf(vec!["admin".to_string(), "editor".to_string()]);
        assert!(any.satisfied_by(&held));

        let none = Permission::AnyOf(vec!["admin".to_string(), "owner".to_string()]);
        assert!(!none.satisfied_by(&held));
    }

    #[test]
    fn test_authorization_spec_defaults_to_jwt() {
        let spec = AuthorizationSpec::new();
        assert_eq!(spec.guard, "jwt");
        assert!(spec.permission.is_none());

        let spec = AuthorizationSpec::with_guard("session").permission("admin");
        assert_eq!(spec.guard, "session");
        assert_eq!(spec.permission, Some(Permission::Single("admin".to_string())));
    }
}
