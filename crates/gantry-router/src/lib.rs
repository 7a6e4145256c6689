//! # Gantry Router
//!
//! Route table for the Gantry MVC framework:
//! - Named path-parameter rules (`alpha`, `alphanum`, `any`, `date`,
//!   `float`, `slug`, `uuid`, plus custom registrations)
//! - URI templates with `{name}` / `{name:rule}` placeholders compiled to
//!   anchored regexes with named capture groups
//! - Registration-order resolution with a distinct 404 / 405 outcome
//!
//! The table is built once during application bootstrap and is read-only
//! afterwards, so concurrent `resolve` calls need no locking. Compile-time
//! failures (unknown rule, malformed template, conflicting routes) are
//! fatal and abort bootstrap; only `ResolveError` occurs per request.
//!
//! ## Example
//!
//! ```
//! use gantry_router::{HttpMethod, RouteDescriptor, RouteTable, RouteTarget, RuleRegistry};
//!
//! let rules = RuleRegistry::new();
//! let table = RouteTable::compile(
//!     vec![
//!         RouteDescriptor::new(
//!             vec![HttpMethod::Get],
//!             "/user/profile",
//!             RouteTarget::new("home", "user", "profile"),
//!         ),
//!         RouteDescriptor::new(
//!             vec![HttpMethod::Get],
//!             "/user/{id:any}",
//!             RouteTarget::new("home", "user", "show"),
//!         ),
//!     ],
//!     &rules,
//! )
//! .unwrap();
//!
//! // Registration order wins for overlapping patterns
//! let found = table.resolve(HttpMethod::Get, "/user/profile").unwrap();
//! assert_eq!(found.route.target.action, "profile");
//! ```

pub mod descriptor;
pub mod error;
pub mod path;
pub mod pattern;
pub mod rules;
pub mod table;

pub use descriptor::{
    AuthorizationSpec, HttpMethod, Permission, RouteDescriptor, RouteOptions, RouteTarget,
    DEFAULT_GUARD,
};
pub use error::RouterError;
pub use path::{is_canonical, normalize_path};
pub use pattern::{compile_template, parse_template, TemplateSegment};
pub use rules::{RuleRegistry, DEFAULT_RULE};
pub use table::{CompiledRoute, ResolveError, RouteMatch, RouteTable};
