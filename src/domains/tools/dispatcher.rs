//! Tool Dispatcher - validates and routes invocation requests.
//!
//! Dispatch runs three steps: look up the tool, validate the arguments
//! against its input schema, then invoke its handler. Validation is
//! fail-fast, so only the first offending parameter is reported. Every
//! failure is returned as an [`InvocationResult::Failure`]; nothing is
//! propagated to the transport as an error.

use serde_json::{Map, Value};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::error::{HandlerError, ToolError};
use super::handlers::ToolArguments;
use super::invocation::{InvocationRequest, InvocationResult};
use super::registry::{RegisteredTool, ToolRegistry};
use super::schema::{InputSchema, json_type_name};

/// Routes invocation requests to registered tool handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    /// Create a dispatcher over a fully built registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: None,
        }
    }

    /// Bound every handler run by `timeout` when invoked through [`Self::invoke`].
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Dispatch using the configured policy: on a bounded worker when a
    /// timeout is set, inline otherwise.
    pub async fn invoke(&self, request: InvocationRequest) -> InvocationResult {
        match self.timeout {
            Some(timeout) => self.dispatch_with_timeout(request, timeout).await,
            None => self.dispatch(request),
        }
    }

    /// Dispatch a request, running the handler on the calling thread.
    ///
    /// A handler panic is caught and reported as a handler error.
    #[instrument(skip_all, fields(tool = %request.tool_name))]
    pub fn dispatch(&self, request: InvocationRequest) -> InvocationResult {
        let outcome = self.prepare(request).and_then(|(tool, arguments)| {
            match panic::catch_unwind(AssertUnwindSafe(|| tool.handler().handle(&arguments))) {
                Ok(result) => result.map_err(ToolError::from),
                Err(payload) => Err(HandlerError::new(format!(
                    "Handler panicked: {}",
                    panic_message(&*payload)
                ))
                .into()),
            }
        });
        log_outcome(outcome.into())
    }

    /// Dispatch a request, running the handler on a blocking worker bounded
    /// by `timeout`.
    ///
    /// If the deadline passes, `Failure{Timeout}` is returned right away and
    /// the worker is detached; its eventual result is discarded.
    #[instrument(skip_all, fields(tool = %request.tool_name, timeout = ?timeout))]
    pub async fn dispatch_with_timeout(
        &self,
        request: InvocationRequest,
        timeout: Duration,
    ) -> InvocationResult {
        let (tool, arguments) = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(err) => return log_outcome(err.into()),
        };

        let handler = Arc::clone(tool.handler());
        let task = tokio::task::spawn_blocking(move || handler.handle(&arguments));

        let outcome = match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result.map_err(ToolError::from),
            Ok(Err(join_err)) => {
                Err(HandlerError::new(format!("Handler panicked: {}", join_err)).into())
            }
            Err(_) => Err(ToolError::Timeout(timeout)),
        };
        log_outcome(outcome.into())
    }

    /// Steps 1 and 2: look up the tool and validate arguments.
    fn prepare(
        &self,
        request: InvocationRequest,
    ) -> Result<(&RegisteredTool, ToolArguments), ToolError> {
        let tool = self
            .registry
            .lookup(&request.tool_name)
            .ok_or_else(|| ToolError::unknown_tool(&request.tool_name))?;
        let arguments = validate_arguments(tool.descriptor().input_schema(), request.arguments)?;
        Ok((tool, arguments))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}

fn log_outcome(result: InvocationResult) -> InvocationResult {
    match &result {
        InvocationResult::Success { .. } => info!("Tool call succeeded"),
        InvocationResult::Failure { kind, message } => {
            warn!("Tool call failed ({}): {}", kind, message);
        }
    }
    result
}

/// Validate an arguments payload against a schema.
///
/// `null` is treated as an empty object. A required parameter whose value
/// is `null` counts as missing. Parameters the schema does not declare are
/// dropped, so the returned set holds only declared, correctly typed values.
pub fn validate_arguments(schema: &InputSchema, arguments: Value) -> Result<ToolArguments, ToolError> {
    let mut supplied = match arguments {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(ToolError::MalformedArguments(format!(
                "expected an object, got {}",
                json_type_name(&other)
            )));
        }
    };

    let mut validated = Map::new();
    for (name, spec) in schema.iter() {
        match supplied.remove(name) {
            None | Some(Value::Null) if spec.required => {
                return Err(ToolError::invalid_argument(
                    name,
                    "required parameter is missing",
                ));
            }
            None | Some(Value::Null) => {}
            Some(value) if !spec.param_type.accepts(&value) => {
                return Err(ToolError::invalid_argument(
                    name,
                    format!("expected {}, got {}", spec.param_type, json_type_name(&value)),
                ));
            }
            Some(value) => {
                validated.insert(name.to_string(), value);
            }
        }
    }

    if !supplied.is_empty() {
        let ignored: Vec<&str> = supplied.keys().map(String::as_str).collect();
        debug!("Ignoring undeclared parameters: {:?}", ignored);
    }

    Ok(ToolArguments::new(validated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::handlers::HandlerResult;
    use crate::domains::tools::invocation::ErrorKind;
    use crate::domains::tools::schema::{ParamSpec, ParamType, ToolDescriptor};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn message_schema() -> InputSchema {
        InputSchema::new().param("message", ParamSpec::required(ParamType::String))
    }

    fn dispatcher() -> Dispatcher {
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::new("echo", "echo", message_schema()),
                |a: &ToolArguments| -> HandlerResult { Ok(json!(a.str("message")?)) },
            )
            .unwrap();
        registry
            .register(
                ToolDescriptor::new("reverseEcho", "reverse", message_schema()),
                |a: &ToolArguments| -> HandlerResult {
                    Ok(json!(a.str("message")?.chars().rev().collect::<String>()))
                },
            )
            .unwrap();
        registry
            .register(
                ToolDescriptor::new("fail", "always fails", InputSchema::new()),
                |_: &ToolArguments| -> HandlerResult { Err(HandlerError::new("out of cheese")) },
            )
            .unwrap();
        registry
            .register(
                ToolDescriptor::new("slow", "sleeps", InputSchema::new()),
                |_: &ToolArguments| -> HandlerResult {
                    std::thread::sleep(Duration::from_millis(300));
                    Ok(json!("done"))
                },
            )
            .unwrap();
        registry
            .register(
                ToolDescriptor::new("panics", "panics", InputSchema::new()),
                |_: &ToolArguments| -> HandlerResult { panic!("handler bug") },
            )
            .unwrap();
        registry
            .register(
                ToolDescriptor::new(
                    "typed",
                    "typed params",
                    InputSchema::new()
                        .param("count", ParamSpec::required(ParamType::Integer))
                        .param("flag", ParamSpec::optional(ParamType::Boolean))
                        .param("options", ParamSpec::optional(ParamType::Object)),
                ),
                |a: &ToolArguments| -> HandlerResult { Ok(Value::Object(a.clone().into_inner())) },
            )
            .unwrap();
        Dispatcher::new(Arc::new(registry))
    }

    fn failure_message(result: &InvocationResult) -> &str {
        match result {
            InvocationResult::Failure { message, .. } => message.as_str(),
            InvocationResult::Success { .. } => panic!("Expected failure, got {:?}", result),
        }
    }

    #[test]
    fn test_echo_scenario() {
        let result = dispatcher().dispatch(InvocationRequest::new("echo", json!({"message": "hi"})));
        assert_eq!(result, InvocationResult::success("hi"));
    }

    #[test]
    fn test_reverse_echo_scenario() {
        let result =
            dispatcher().dispatch(InvocationRequest::new("reverseEcho", json!({"message": "abc"})));
        assert_eq!(result, InvocationResult::success("cba"));
    }

    #[test]
    fn test_unknown_tool_regardless_of_arguments() {
        let d = dispatcher();
        for arguments in [json!(null), json!({}), json!({"message": "hi"}), json!([1, 2])] {
            let result = d.dispatch(InvocationRequest::new("nope", arguments));
            assert_eq!(result.error_kind(), Some(ErrorKind::UnknownTool));
        }
    }

    #[test]
    fn test_missing_required_parameter() {
        let result = dispatcher().dispatch(InvocationRequest::new("echo", json!({})));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
        assert!(failure_message(&result).contains("message"));
    }

    #[test]
    fn test_null_required_parameter_is_missing() {
        let result =
            dispatcher().dispatch(InvocationRequest::new("echo", json!({"message": null})));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
        assert!(failure_message(&result).contains("missing"));
    }

    #[test]
    fn test_absent_arguments_treated_as_empty() {
        let result = dispatcher().dispatch(InvocationRequest::new("echo", Value::Null));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
        assert!(failure_message(&result).contains("message"));
    }

    #[test]
    fn test_type_mismatch() {
        let result = dispatcher().dispatch(InvocationRequest::new("echo", json!({"message": 42})));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
        let message = failure_message(&result);
        assert!(message.contains("message"));
        assert!(message.contains("expected string, got integer"));
    }

    #[test]
    fn test_non_object_arguments() {
        let result = dispatcher().dispatch(InvocationRequest::new("echo", json!("hi")));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
    }

    #[test]
    fn test_validation_is_fail_fast() {
        // Both `count` and `flag` are wrong; only the first in name order is reported.
        let result = dispatcher().dispatch(InvocationRequest::new(
            "typed",
            json!({"count": "three", "flag": "yes"}),
        ));
        let message = failure_message(&result);
        assert!(message.contains("'count'"));
        assert!(!message.contains("'flag'"));
    }

    #[test]
    fn test_undeclared_parameters_dropped() {
        let result = dispatcher().dispatch(InvocationRequest::new(
            "typed",
            json!({"count": 3, "options": {"a": 1}, "extra": true}),
        ));
        assert_eq!(
            result,
            InvocationResult::success(json!({"count": 3, "options": {"a": 1}}))
        );
    }

    #[test]
    fn test_integer_rejects_float() {
        let result = dispatcher().dispatch(InvocationRequest::new("typed", json!({"count": 1.5})));
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
    }

    #[test]
    fn test_handler_error_wrapped() {
        let result = dispatcher().dispatch(InvocationRequest::new("fail", json!({})));
        assert_eq!(
            result,
            InvocationResult::failure(ErrorKind::HandlerError, "out of cheese")
        );
    }

    #[test]
    fn test_repeated_dispatch_is_idempotent() {
        let d = dispatcher();
        let request = InvocationRequest::new("reverseEcho", json!({"message": "stressed"}));
        let first = d.dispatch(request.clone());
        for _ in 0..10 {
            assert_eq!(d.dispatch(request.clone()), first);
        }
    }

    #[test]
    fn test_handler_invoked_once_per_dispatch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut registry = ToolRegistry::new();
        registry
            .register(
                ToolDescriptor::new("count", "counts", InputSchema::new()),
                move |_: &ToolArguments| -> HandlerResult {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(json!(null))
                },
            )
            .unwrap();
        let d = Dispatcher::new(Arc::new(registry));

        d.dispatch(InvocationRequest::new("count", json!({})));
        d.dispatch(InvocationRequest::new("count", json!({"message": 1})));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // Rejected requests never reach the handler.
        d.dispatch(InvocationRequest::new("count", json!(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dispatch_with_timeout_success() {
        let result = dispatcher()
            .dispatch_with_timeout(
                InvocationRequest::new("echo", json!({"message": "hi"})),
                Duration::from_secs(5),
            )
            .await;
        assert_eq!(result, InvocationResult::success("hi"));
    }

    #[tokio::test]
    async fn test_dispatch_with_timeout_expires() {
        let result = dispatcher()
            .dispatch_with_timeout(
                InvocationRequest::new("slow", json!({})),
                Duration::from_millis(20),
            )
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::Timeout));
    }

    #[tokio::test]
    async fn test_dispatch_with_timeout_validates_first() {
        let d = dispatcher();
        let result = d
            .dispatch_with_timeout(InvocationRequest::new("nope", json!({})), Duration::from_secs(1))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::UnknownTool));

        let result = d
            .dispatch_with_timeout(InvocationRequest::new("echo", json!({})), Duration::from_secs(1))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::InvalidArguments));
    }

    #[tokio::test]
    async fn test_invoke_uses_configured_timeout() {
        let d = dispatcher().with_timeout(Some(Duration::from_millis(20)));
        let result = d.invoke(InvocationRequest::new("slow", json!({}))).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::Timeout));

        let result = d
            .invoke(InvocationRequest::new("echo", json!({"message": "hi"})))
            .await;
        assert_eq!(result, InvocationResult::success("hi"));
    }

    #[tokio::test]
    async fn test_invoke_without_timeout_runs_inline() {
        let d = dispatcher();
        assert!(d.timeout().is_none());
        let result = d
            .invoke(InvocationRequest::new("reverseEcho", json!({"message": "abc"})))
            .await;
        assert_eq!(result, InvocationResult::success("cba"));
    }

    #[tokio::test]
    async fn test_dispatch_with_timeout_panicking_handler() {
        let result = dispatcher()
            .dispatch_with_timeout(
                InvocationRequest::new("panics", json!({})),
                Duration::from_secs(5),
            )
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::HandlerError));
        assert!(failure_message(&result).contains("panicked"));
    }

    #[test]
    fn test_dispatch_inline_panicking_handler() {
        let d = dispatcher();
        let result = d.dispatch(InvocationRequest::new("panics", json!({})));
        assert_eq!(result.error_kind(), Some(ErrorKind::HandlerError));
        assert_eq!(failure_message(&result), "Handler panicked: handler bug");

        // The dispatcher stays usable afterwards.
        let result = d.dispatch(InvocationRequest::new("echo", json!({"message": "hi"})));
        assert_eq!(result, InvocationResult::success("hi"));
    }

    #[tokio::test]
    async fn test_invoke_without_timeout_catches_panic() {
        let result = dispatcher()
            .invoke(InvocationRequest::new("panics", json!({})))
            .await;
        assert_eq!(result.error_kind(), Some(ErrorKind::HandlerError));
    }
}
