// File: src/lib.rs
// Purpose: Validation schemas and the field-rule evaluation algorithm

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

pub mod validators;

/// Validation failure carrying the full per-field error map.
///
/// All declared fields are checked before this is produced, so the caller
/// can report every problem at once rather than one field per round trip.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
#[error("validation failed for {} field(s)", errors.len())]
pub struct ValidationError {
    /// Field path → messages, in stable field order
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Expected JSON value type for the `type` rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Int,
    Float,
    Bool,
    Array,
    Object,
}

impl ValueType {
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Bool => "bool",
            ValueType::Array => "array",
            ValueType::Object => "object",
        }
    }

    /// Checks whether a JSON value has this type
    ///
    /// `Float` accepts any number; `Int` requires an integer representation.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::Float => value.is_number(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Array => value.is_array(),
            ValueType::Object => value.is_object(),
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Rule set declared for a single field path
///
/// Fields are implicitly required; call `optional()` to allow absence.
/// Built with chained methods:
///
/// ```
/// use gantry_validation::{FieldRules, ValueType};
///
/// let rules = FieldRules::new().typed(ValueType::Int).min(18.0);
/// assert!(rules.required);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldRules {
    pub required: bool,
    pub value_type: Option<ValueType>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub email: bool,
    pub url: bool,
    pub ip: bool,
    pub phone: bool,
    pub date: bool,
    pub uuid: bool,
    pub one_of: Option<Vec<Value>>,
    pub equals: Option<Value>,
}

impl FieldRules {
    pub fn new() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }

    /// Marks the field as optional; absence records `null` instead of an error
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn typed(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    /// Minimum string length or numeric value, depending on the value
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Maximum string length or numeric value, depending on the value
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    pub fn url(mut self) -> Self {
        self.url = true;
        self
    }

    pub fn ip(mut self) -> Self {
        self.ip = true;
        self
    }

    pub fn phone(mut self) -> Self {
        self.phone = true;
        self
    }

    pub fn date(mut self) -> Self {
        self.date = true;
        self
    }

    pub fn uuid(mut self) -> Self {
        self.uuid = true;
        self
    }

    /// Restricts the value to a fixed set
    pub fn one_of<I>(mut self, allowed: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.one_of = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Requires equality with a fixed literal
    pub fn equals(mut self, expected: impl Into<Value>) -> Self {
        self.equals = Some(expected.into());
        self
    }
}

/// Validation schema: dotted field paths mapped to their rule sets
///
/// Field paths support nesting (`"user.email"`), resolved against the
/// request payload mapping. Iteration order is stable (BTreeMap) so error
/// reports are deterministic.
///
/// # Examples
///
/// ```
/// use gantry_validation::{validate, FieldRules, Schema};
/// use serde_json::json;
///
/// let schema = Schema::new().field("email", FieldRules::new().email());
///
/// let ok = validate(&schema, &json!({"email": "a@b.com", "extra": 1})).unwrap();
/// assert_eq!(ok.get("email"), Some(&json!("a@b.com")));
/// assert!(ok.get("extra").is_none()); // allow-listing, not passthrough
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    pub fields: BTreeMap<String, FieldRules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares rules for a field path (builder)
    pub fn field(mut self, path: impl Into<String>, rules: FieldRules) -> Self {
        self.fields.insert(path.into(), rules);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolves a dotted field path against a payload mapping
///
/// Missing intermediate segments are treated as absence, not an error.
pub fn lookup_path<'a>(payload: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(payload, |value, segment| value.as_object()?.get(segment))
}

/// Validates a payload against a schema
///
/// Every declared field is checked; errors are accumulated so the result
/// carries the complete per-field error map. On success the returned map
/// contains exactly the declared fields that were present (or `null` for
/// optional absent fields); undeclared payload keys are never copied
/// through.
pub fn validate(schema: &Schema, payload: &Value) -> Result<Map<String, Value>, ValidationError> {
    let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut validated = Map::new();

    for (path, rules) in &schema.fields {
        let value = lookup_path(payload, path);
        match value {
            None | Some(Value::Null) => {
                if rules.required {
                    errors
                        .entry(path.clone())
                        .or_default()
                        .push("field is required".to_string());
                } else {
                    validated.insert(path.clone(), Value::Null);
                }
            }
            Some(value) => {
                let field_errors = apply_rules(rules, value);
                if field_errors.is_empty() {
                    validated.insert(path.clone(), value.clone());
                } else {
                    errors.insert(path.clone(), field_errors);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(validated)
    } else {
        Err(ValidationError { errors })
    }
}

/// Applies every declared rule (except `required`) to a present value
fn apply_rules(rules: &FieldRules, value: &Value) -> Vec<String> {
    let mut messages = Vec::new();

    if let Some(expected) = rules.value_type {
        if !expected.matches(value) {
            messages.push(format!("must be of type {expected}"));
        }
    }

    // min/max apply to string length or numeric value depending on the value
    if rules.min.is_some() || rules.max.is_some() {
        match magnitude(value) {
            Some((measured, is_length)) => {
                let unit = if is_length { " characters" } else { "" };
                if let Some(min) = rules.min {
                    if measured < min {
                        messages.push(format!("must not be less than {min}{unit}"));
                    }
                }
                if let Some(max) = rules.max {
                    if measured > max {
                        messages.push(format!("must not be greater than {max}{unit}"));
                    }
                }
            }
            None => messages.push("must be a string or a number".to_string()),
        }
    }

    if rules.email && !as_str(value).is_some_and(validators::is_valid_email) {
        messages.push("must be a valid email address".to_string());
    }
    if rules.url && !as_str(value).is_some_and(validators::is_valid_url) {
        messages.push("must be a valid URL".to_string());
    }
    if rules.ip && !as_str(value).is_some_and(validators::is_valid_ip) {
        messages.push("must be a valid IP address".to_string());
    }
    if rules.phone && !as_str(value).is_some_and(validators::is_valid_phone) {
        messages.push("must be a valid phone number".to_string());
    }
    if rules.date && !as_str(value).is_some_and(validators::is_valid_date) {
        messages.push("must be a valid date (YYYY-MM-DD)".to_string());
    }
    if rules.uuid && !as_str(value).is_some_and(validators::is_valid_uuid) {
        messages.push("must be a valid UUID".to_string());
    }

    if let Some(allowed) = &rules.one_of {
        if !allowed.contains(value) {
            messages.push("must be one of the allowed values".to_string());
        }
    }
    if let Some(expected) = &rules.equals {
        if value != expected {
            messages.push("must match the expected value".to_string());
        }
    }

    messages
}

fn as_str(value: &Value) -> Option<&str> {
    value.as_str()
}

/// Returns the comparable magnitude of a value and whether it is a length
fn magnitude(value: &Value) -> Option<(f64, bool)> {
    match value {
        Value::String(s) => Some((s.chars().count() as f64, true)),
        Value::Number(n) => n.as_f64().map(|f| (f, false)),
        _ => None,
    }
}
