// File: src/pattern.rs
// Purpose: URI template parsing and regex compilation

use crate::error::RouterError;
use crate::rules::{RuleRegistry, DEFAULT_RULE};
use regex::Regex;

/// One segment of a parsed URI template
///
/// A segment is either literal text or a whole placeholder; placeholders
/// cannot occupy part of a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    Literal(String),
    Param { name: String, rule: String },
}

/// Parses a URI template into segments
///
/// Grammar: literal segments separated by `/`; a segment may instead be a
/// placeholder `{name}` or `{name:rule}`. `{name}` defaults to the `any`
/// rule. Parameter names must be identifiers and unique within a template.
///
/// # Examples
///
/// ```
/// use gantry_router::pattern::{parse_template, TemplateSegment};
///
/// let segments = parse_template("/user/{id:alphanum}").unwrap();
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0], TemplateSegment::Literal("user".to_string()));
/// assert_eq!(
///     segments[1],
///     TemplateSegment::Param { name: "id".to_string(), rule: "alphanum".to_string() }
/// );
/// ```
pub fn parse_template(uri: &str) -> Result<Vec<TemplateSegment>, RouterError> {
    let invalid = |reason: &str| RouterError::InvalidTemplate {
        uri: uri.to_string(),
        reason: reason.to_string(),
    };

    if uri.is_empty() {
        return Err(invalid("template must not be empty"));
    }
    if !uri.starts_with('/') {
        return Err(invalid("template must start with `/`"));
    }

    let mut segments = Vec::new();
    let mut seen_params: Vec<&str> = Vec::new();

    for raw in uri.split('/').filter(|s| !s.is_empty()) {
        match raw.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(inner) => {
                let (name, rule) = match inner.split_once(':') {
                    Some((name, rule)) => (name, rule),
                    None => (inner, DEFAULT_RULE),
                };
                if !is_identifier(name) {
                    return Err(invalid(&format!(
                        "parameter name `{name}` is not a valid identifier"
                    )));
                }
                if rule.is_empty() {
                    return Err(invalid(&format!("parameter `{name}` has an empty rule")));
                }
                if seen_params.contains(&name) {
                    return Err(invalid(&format!("duplicate parameter name `{name}`")));
                }
                seen_params.push(name);
                segments.push(TemplateSegment::Param {
                    name: name.to_string(),
                    rule: rule.to_string(),
                });
            }
            None => {
                if raw.contains('{') || raw.contains('}') {
                    return Err(invalid(&format!(
                        "placeholder must span a whole segment, got `{raw}`"
                    )));
                }
                segments.push(TemplateSegment::Literal(raw.to_string()));
            }
        }
    }

    Ok(segments)
}

/// Compiles a URI template into an anchored regex plus the ordered list of
/// parameter names
///
/// Each placeholder becomes a named capture group whose pattern comes from
/// the rule registry; literals are regex-escaped. Referencing an
/// unregistered rule fails with `UnknownRule`.
pub fn compile_template(
    uri: &str,
    rules: &RuleRegistry,
) -> Result<(Regex, Vec<String>), RouterError> {
    let segments = parse_template(uri)?;

    let mut pattern = String::from("^");
    let mut params = Vec::new();

    if segments.is_empty() {
        // Root template "/"
        pattern.push('/');
    } else {
        for segment in &segments {
            pattern.push('/');
            match segment {
                TemplateSegment::Literal(lit) => pattern.push_str(&regex::escape(lit)),
                TemplateSegment::Param { name, rule } => {
                    let rule_pattern = rules.resolve(rule)?;
                    pattern.push_str(&format!("(?P<{name}>{rule_pattern})"));
                    params.push(name.clone());
                }
            }
        }
    }
    pattern.push('$');

    let regex = Regex::new(&pattern).map_err(|err| RouterError::InvalidTemplate {
        uri: uri.to_string(),
        reason: err.to_string(),
    })?;

    Ok((regex, params))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_literals_and_params() {
        let segments = parse_template("/shop/order/{id:uuid}/items/{page}").unwrap();
        assert_eq!(
            segments,
            vec![
                TemplateSegment::Literal("shop".to_string()),
                TemplateSegment::Literal("order".to_string()),
                TemplateSegment::Param {
                    name: "id".to_string(),
                    rule: "uuid".to_string()
                },
                TemplateSegment::Literal("items".to_string()),
                TemplateSegment::Param {
                    name: "page".to_string(),
                    rule: "any".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_root() {
        assert_eq!(parse_template("/").unwrap(), vec![]);
    }

    #[test]
    fn test_parse_rejects_malformed_templates() {
        assert!(parse_template("").is_err());
        assert!(parse_template("user/{id}").is_err()); // no leading slash
        assert!(parse_template("/user/x{id}").is_err()); // partial-segment placeholder
        assert!(parse_template("/user/{id").is_err());
        assert!(parse_template("/user/{42}").is_err()); // bad identifier
        assert!(parse_template("/user/{id:}").is_err()); // empty rule
        assert!(parse_template("/{id}/{id}").is_err()); // duplicate param
    }

    #[test]
    fn test_compile_produces_anchored_named_groups() {
        let rules = RuleRegistry::new();
        let (regex, params) = compile_template("/user/{id:alphanum}", &rules).unwrap();

        assert_eq!(params, vec!["id".to_string()]);
        let caps = regex.captures("/user/42").unwrap();
        assert_eq!(&caps["id"], "42");

        assert!(!regex.is_match("/user/42/extra")); // anchored
        assert!(!regex.is_match("/prefix/user/42"));
    }

    #[test]
    fn test_compile_escapes_literals() {
        let rules = RuleRegistry::new();
        let (regex, _) = compile_template("/v1.0/status", &rules).unwrap();
        assert!(regex.is_match("/v1.0/status"));
        assert!(!regex.is_match("/v1x0/status")); // `.` must not be a wildcard
    }

    #[test]
    fn test_compile_unknown_rule_fails() {
        let rules = RuleRegistry::new();
        assert!(matches!(
            compile_template("/user/{id:hex}", &rules),
            Err(RouterError::UnknownRule(name)) if name == "hex"
        ));
    }

    #[test]
    fn test_compile_root() {
        let rules = RuleRegistry::new();
        let (regex, params) = compile_template("/", &rules).unwrap();
        assert!(params.is_empty());
        assert!(regex.is_match("/"));
        assert!(!regex.is_match("/home"));
    }
}
