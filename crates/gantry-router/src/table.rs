// File: src/table.rs
// Purpose: Compiled route set and request resolution

use crate::descriptor::{HttpMethod, RouteDescriptor, RouteOptions, RouteTarget};
use crate::error::RouterError;
use crate::path::normalize_path;
use crate::pattern::compile_template;
use crate::rules::RuleRegistry;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Request-matchable form of a route descriptor
///
/// Owned exclusively by the route table; rebuilt whenever the table is
/// compiled, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub methods: Vec<HttpMethod>,
    /// Raw template, kept for diagnostics and conflict reports
    pub uri: String,
    pub target: RouteTarget,
    pub options: RouteOptions,
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledRoute {
    pub fn allows(&self, method: HttpMethod) -> bool {
        self.methods.contains(&method)
    }

    /// Parameter names in template order
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// The anchored matcher source, used for duplicate detection
    pub fn matcher(&self) -> &str {
        self.regex.as_str()
    }

    fn capture(&self, path: &str) -> Option<HashMap<String, String>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .filter_map(|name| {
                    caps.name(name)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

/// Result of resolving a request against the table; request-scoped
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    pub route: &'a CompiledRoute,
    /// Extracted path parameters, keyed by placeholder name
    pub params: HashMap<String, String>,
}

/// Request-time resolution failures, mapped to 404/405 at the boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no route matches {method} {path}")]
    NotFound { method: HttpMethod, path: String },

    /// Some route matched the path shape but not the method
    #[error("method {method} not allowed for {path}")]
    MethodNotAllowed {
        method: HttpMethod,
        path: String,
        allowed: Vec<HttpMethod>,
    },
}

/// Compiled, immutable route set
///
/// Routes are matched strictly in registration order; the first route whose
/// method set and regex both match wins. There is no specificity ranking, so
/// static routes must be registered before parametrized ones that overlap
/// them (`/user/profile` before `/user/{id:any}`).
///
/// # Examples
///
/// ```
/// use gantry_router::{HttpMethod, RouteDescriptor, RouteTable, RouteTarget, RuleRegistry};
///
/// let rules = RuleRegistry::new();
/// let table = RouteTable::compile(
///     vec![RouteDescriptor::new(
///         vec![HttpMethod::Get],
///         "/user/{id:alphanum}",
///         RouteTarget::new("home", "user", "show"),
///     )],
///     &rules,
/// )
/// .unwrap();
///
/// let found = table.resolve(HttpMethod::Get, "/user/42").unwrap();
/// assert_eq!(found.params.get("id"), Some(&"42".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compiles descriptors into a matchable table, in registration order
    ///
    /// Fails fast on unknown rules, malformed templates, and duplicate
    /// `(method, matcher)` pairs; a conflict names both targets rather than
    /// letting the later registration silently shadow the earlier one.
    /// Capture names are erased from the conflict key, so `/user/{id}` and
    /// `/user/{name}` collide: they accept exactly the same paths.
    pub fn compile(
        descriptors: Vec<RouteDescriptor>,
        rules: &RuleRegistry,
    ) -> Result<Self, RouterError> {
        let mut routes: Vec<CompiledRoute> = Vec::with_capacity(descriptors.len());
        let mut seen: HashMap<(HttpMethod, String), usize> = HashMap::new();

        for descriptor in descriptors {
            let (regex, param_names) = compile_template(&descriptor.uri, rules)?;
            let shape = matcher_shape(regex.as_str());

            for &method in &descriptor.methods {
                let key = (method, shape.clone());
                if let Some(&existing) = seen.get(&key) {
                    return Err(RouterError::RouteConflict {
                        method,
                        uri: descriptor.uri.clone(),
                        first: routes[existing].target.to_string(),
                        second: descriptor.target.to_string(),
                    });
                }
                seen.insert(key, routes.len());
            }

            routes.push(CompiledRoute {
                methods: descriptor.methods,
                uri: descriptor.uri,
                target: descriptor.target,
                options: descriptor.options,
                regex,
                param_names,
            });
        }

        tracing::info!(routes = routes.len(), "route table compiled");
        Ok(Self { routes })
    }

    /// Resolves a (method, path) pair to at most one route
    ///
    /// The path is normalized first (trailing slash stripped, repeated
    /// slashes collapsed). A path that matched some route's pattern but
    /// never its method yields `MethodNotAllowed` with the union of methods
    /// those routes accept; otherwise `NotFound`. Resolution is pure:
    /// repeated calls against an unchanged table give identical results.
    pub fn resolve(&self, method: HttpMethod, path: &str) -> Result<RouteMatch<'_>, ResolveError> {
        let normalized = normalize_path(path);
        let mut allowed: Vec<HttpMethod> = Vec::new();

        for route in &self.routes {
            if !route.regex.is_match(&normalized) {
                continue;
            }
            if route.allows(method) {
                let params = route.capture(&normalized).unwrap_or_default();
                return Ok(RouteMatch { route, params });
            }
            for &m in &route.methods {
                if !allowed.contains(&m) {
                    allowed.push(m);
                }
            }
        }

        if allowed.is_empty() {
            Err(ResolveError::NotFound {
                method,
                path: normalized.into_owned(),
            })
        } else {
            Err(ResolveError::MethodNotAllowed {
                method,
                path: normalized.into_owned(),
                allowed,
            })
        }
    }

    /// Compiled routes in registration order
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Rewrites named capture groups `(?P<name>` to `(?:` for conflict keying
///
/// Compiled matchers only differ in capture names when their templates used
/// different parameter names for the same shape; such routes accept the same
/// paths and must be treated as duplicates. Literal segments cannot produce
/// a false hit: `regex::escape` backslash-escapes `(` and `?`.
fn matcher_shape(pattern: &str) -> String {
    let mut shape = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while let Some(start) = rest.find("(?P<") {
        shape.push_str(&rest[..start]);
        shape.push_str("(?:");
        rest = &rest[start + 4..];
        match rest.find('>') {
            Some(end) => rest = &rest[end + 1..],
            None => break,
        }
    }
    shape.push_str(rest);
    shape
}
