// File: src/rules.rs
// Purpose: Named regex rules for URI path placeholders

use crate::error::RouterError;
use regex::Regex;
use std::collections::HashMap;

/// Rule applied to an unconstrained `{name}` placeholder
pub const DEFAULT_RULE: &str = "any";

/// Built-in rules, registered by `RuleRegistry::new`
///
/// Patterns are unanchored fragments; compilation wraps them in a named
/// capture group inside the route's anchored regex. None of them may cross
/// a `/` segment boundary (`any` matches everything *except* `/`).
const BUILTIN_RULES: &[(&str, &str)] = &[
    ("alpha", "[A-Za-z]+"),
    ("alphanum", "[A-Za-z0-9]+"),
    ("any", "[^/]+"),
    ("date", r"\d{4}-\d{2}-\d{2}"),
    ("float", r"-?\d+(?:\.\d+)?"),
    ("slug", "[a-z0-9]+(?:-[a-z0-9]+)*"),
    (
        "uuid",
        "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
    ),
];

/// Registry of named path-parameter constraints
///
/// Populated once during bootstrap and read-only afterwards. Built-ins form
/// a fixed set; applications extend it through `register`, which rejects
/// name collisions and patterns that would break segment matching.
///
/// # Examples
///
/// ```
/// use gantry_router::RuleRegistry;
///
/// let mut rules = RuleRegistry::new();
/// rules.register("hex", "[0-9a-f]+").unwrap();
///
/// assert_eq!(rules.resolve("hex").unwrap(), "[0-9a-f]+");
/// assert!(rules.register("hex", "[0-9A-F]+").is_err()); // collision
/// assert!(rules.resolve("missing").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: HashMap<String, String>,
}

impl RuleRegistry {
    /// Creates a registry pre-populated with the built-in rules
    pub fn new() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(name, pattern)| (name.to_string(), pattern.to_string()))
            .collect();
        Self { rules }
    }

    /// Registers a custom rule
    ///
    /// Fails with `DuplicateRule` on a name collision (built-ins included),
    /// and with `InvalidRulePattern` if the pattern contains an unescaped
    /// `/` outside a character class or does not compile.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<(), RouterError> {
        let name = name.into();
        let pattern = pattern.into();

        if self.rules.contains_key(&name) {
            return Err(RouterError::DuplicateRule(name));
        }
        if has_unescaped_slash(&pattern) {
            return Err(RouterError::InvalidRulePattern {
                name,
                reason: "pattern must not match across `/` segment boundaries".to_string(),
            });
        }
        if let Err(err) = Regex::new(&format!("^(?:{pattern})$")) {
            return Err(RouterError::InvalidRulePattern {
                name,
                reason: err.to_string(),
            });
        }

        self.rules.insert(name, pattern);
        Ok(())
    }

    /// Looks up a rule's pattern by name
    pub fn resolve(&self, name: &str) -> Result<&str, RouterError> {
        self.rules
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RouterError::UnknownRule(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// True if the pattern contains a `/` that is neither escaped nor inside a
/// character class (where it cannot cross a segment boundary)
fn has_unescaped_slash(pattern: &str) -> bool {
    let mut escaped = false;
    let mut in_class = false;
    for ch in pattern.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => return true,
            _ => {}
        }
    }
    false
}
