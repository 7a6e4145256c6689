// File: src/error.rs
// Purpose: Startup/compile-time route errors (all fatal, abort bootstrap)

use crate::descriptor::HttpMethod;
use thiserror::Error;

/// Errors raised while building the rule registry or compiling the route
/// table. Every variant indicates a programming or configuration defect and
/// must abort initialization; none of these occur on the request path.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("rule `{0}` is already registered")]
    DuplicateRule(String),

    #[error("unknown rule `{0}`")]
    UnknownRule(String),

    #[error("invalid pattern for rule `{name}`: {reason}")]
    InvalidRulePattern { name: String, reason: String },

    #[error("invalid route template `{uri}`: {reason}")]
    InvalidTemplate { uri: String, reason: String },

    #[error("unknown HTTP method `{0}`")]
    UnknownMethod(String),

    #[error(
        "route conflict on {method} `{uri}`: {first} and {second} compile to the same matcher"
    )]
    RouteConflict {
        method: HttpMethod,
        uri: String,
        first: String,
        second: String,
    },
}
