// File: src/auth.rs
// Purpose: Authorization gate - guard registry, identity snapshot, decision

use crate::request::Request;
use gantry_router::AuthorizationSpec;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Authenticated identity snapshot for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub permissions: HashSet<String>,
}

impl Identity {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            permissions: HashSet::new(),
        }
    }

    pub fn with_permissions<I, S>(subject: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            subject: subject.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

/// A named authentication strategy
///
/// Implementations must be stateless per call: the same request snapshot
/// always yields the same identity, and no request-specific state is
/// carried across invocations.
pub trait Guard: Send + Sync {
    /// Identity for the current request, or `None` when unauthenticated
    fn authenticate(&self, request: &Request) -> Option<Identity>;
}

/// Registry of guards by name
///
/// Guards may register after module registration, so missing guards are
/// detected lazily at request time rather than during bootstrap.
#[derive(Clone, Default)]
pub struct GuardRegistry {
    guards: HashMap<String, Arc<dyn Guard>>,
}

impl GuardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, guard: Arc<dyn Guard>) {
        self.guards.insert(name.into(), guard);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Guard>> {
        self.guards.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }
}

impl std::fmt::Debug for GuardRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardRegistry")
            .field("guards", &self.guards.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Authorization failures; the first two map to 401/403, the last to 500
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    /// Configuration defect: the route names a guard nobody registered
    #[error("guard `{0}` is not registered")]
    UnknownGuard(String),
}

/// Decides whether a request may proceed to its action
///
/// Pure decision over the request's identity snapshot:
/// - no spec → allowed, no guard consulted (public route)
/// - guard missing from the registry → `UnknownGuard`
/// - guard reports no identity → `Unauthenticated`
/// - permission requirement unmet → `Forbidden`
///
/// On success the identity (if any) is returned so the action can see who
/// is calling.
pub fn authorize(
    spec: Option<&AuthorizationSpec>,
    request: &Request,
    guards: &GuardRegistry,
) -> Result<Option<Identity>, AuthError> {
    let Some(spec) = spec else {
        return Ok(None);
    };

    let guard = guards
        .get(&spec.guard)
        .ok_or_else(|| AuthError::UnknownGuard(spec.guard.clone()))?;

    let identity = guard
        .authenticate(request)
        .ok_or(AuthError::Unauthenticated)?;

    if let Some(permission) = &spec.permission {
        if !permission.satisfied_by(&identity.permissions) {
            return Err(AuthError::Forbidden);
        }
    }

    Ok(Some(identity))
}
