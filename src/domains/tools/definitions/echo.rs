//! Echo tool definition.
//!
//! A tool that returns the client's message unchanged.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domains::tools::handlers::{HandlerResult, ToolArguments};
use crate::domains::tools::schema::{InputSchema, ParamSpec, ParamType, ToolDescriptor};

/// Echo tool - echoes the message back to the client.
pub struct EchoTool;

impl EchoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "echo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Echoes the message back to the client.";

    /// Descriptor advertised during discovery.
    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            InputSchema::new().param(
                "message",
                ParamSpec::required(ParamType::String).describe("The message to echo back"),
            ),
        )
    }

    /// Core logic.
    pub fn execute(message: &str) -> String {
        message.to_string()
    }

    /// Registry handler.
    #[instrument(skip_all)]
    pub fn handle(arguments: &ToolArguments) -> HandlerResult {
        let message = arguments.str("message")?;
        debug!("Echo tool called ({} bytes)", message.len());
        Ok(Value::String(Self::execute(message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arguments(value: Value) -> ToolArguments {
        match value {
            Value::Object(map) => ToolArguments::new(map),
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn test_echo_unchanged() {
        assert_eq!(EchoTool::execute("hi"), "hi");
        assert_eq!(EchoTool::execute(""), "");
        assert_eq!(EchoTool::execute("héllo wörld"), "héllo wörld");
    }

    #[test]
    fn test_handle() {
        let result = EchoTool::handle(&arguments(json!({"message": "hi"})));
        assert_eq!(result, Ok(json!("hi")));
    }

    #[test]
    fn test_handle_missing_message() {
        let result = EchoTool::handle(&arguments(json!({})));
        assert!(result.is_err());
    }

    #[test]
    fn test_descriptor() {
        let descriptor = EchoTool::descriptor();
        assert_eq!(descriptor.name(), "echo");
        let param = descriptor.input_schema().get("message").unwrap();
        assert!(param.required);
        assert_eq!(param.param_type, ParamType::String);
    }
}
