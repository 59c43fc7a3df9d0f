//! Tool handler abstraction.
//!
//! A handler is a synchronous function from a validated argument set to a
//! payload or a [`HandlerError`]. Any `Fn(&ToolArguments) -> HandlerResult`
//! closure is a handler; implement the trait directly for handlers that carry
//! their own state.

use serde_json::{Map, Value};

use super::error::HandlerError;

/// Result type returned by tool handlers.
pub type HandlerResult = Result<Value, HandlerError>;

/// Arguments that have passed schema validation.
///
/// Only parameters declared in the tool's schema are present, and each has
/// the declared type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    pub(crate) fn new(inner: Map<String, Value>) -> Self {
        Self(inner)
    }

    /// Raw access to a parameter.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// A string parameter.
    pub fn str(&self, name: &str) -> Result<&str, HandlerError> {
        self.0
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| HandlerError::new(format!("Missing or invalid '{}' parameter", name)))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Executes a tool's logic.
pub trait ToolHandler: Send + Sync {
    fn handle(&self, arguments: &ToolArguments) -> HandlerResult;
}

impl<F> ToolHandler for F
where
    F: Fn(&ToolArguments) -> HandlerResult + Send + Sync,
{
    fn handle(&self, arguments: &ToolArguments) -> HandlerResult {
        self(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArguments {
        match value {
            Value::Object(map) => ToolArguments::new(map),
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_closure_is_handler() {
        let handler = |a: &ToolArguments| -> HandlerResult { Ok(json!(a.len())) };
        let result = handler.handle(&args(json!({"a": 1, "b": 2})));
        assert_eq!(result, Ok(json!(2)));
    }

    #[test]
    fn test_str_accessor() {
        let a = args(json!({"message": "hi", "flag": true}));
        assert_eq!(a.str("message"), Ok("hi"));
        assert!(a.str("flag").is_err());
        assert!(a.str("absent").is_err());
        assert_eq!(a.get("flag"), Some(&json!(true)));
    }
}
