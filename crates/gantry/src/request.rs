// File: src/request.rs
// Purpose: Transport-free request and response contract

use gantry_router::HttpMethod;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// An already-parsed request as handed over by the transport layer
///
/// The core never touches sockets; it consumes method, path, headers, and a
/// body mapping, and produces a [`Response`]. Header names are stored
/// lowercase so lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: HttpMethod,
    pub path: String,
    headers: HashMap<String, String>,
    /// Body as a JSON mapping; `Null` when the request has no body
    pub payload: Value,
}

impl Request {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            payload: Value::Null,
        }
    }

    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// Status plus renderable body; serialization belongs to the response sink
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Normalized handler return value
///
/// Handlers return anything convertible through [`IntoOutcome`]; the
/// dispatcher folds the outcome into the response contract with a default
/// status of 200.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Renderable body, status 200
    Body(Value),
    /// Body with an explicit status
    Status(u16, Value),
    /// Fully formed response, passed through unchanged
    Response(Response),
}

impl Outcome {
    pub fn into_response(self) -> Response {
        match self {
            Outcome::Body(body) => Response::ok(body),
            Outcome::Status(status, body) => Response::new(status, body),
            Outcome::Response(response) => response,
        }
    }
}

/// Conversion from handler return values into an [`Outcome`]
pub trait IntoOutcome {
    fn into_outcome(self) -> Outcome;
}

impl IntoOutcome for Outcome {
    fn into_outcome(self) -> Outcome {
        self
    }
}

impl IntoOutcome for Value {
    fn into_outcome(self) -> Outcome {
        Outcome::Body(self)
    }
}

impl IntoOutcome for Map<String, Value> {
    fn into_outcome(self) -> Outcome {
        Outcome::Body(Value::Object(self))
    }
}

impl IntoOutcome for String {
    fn into_outcome(self) -> Outcome {
        Outcome::Body(Value::String(self))
    }
}

impl IntoOutcome for &str {
    fn into_outcome(self) -> Outcome {
        Outcome::Body(Value::String(self.to_string()))
    }
}

impl IntoOutcome for (u16, Value) {
    fn into_outcome(self) -> Outcome {
        Outcome::Status(self.0, self.1)
    }
}

impl IntoOutcome for Response {
    fn into_outcome(self) -> Outcome {
        Outcome::Response(self)
    }
}
