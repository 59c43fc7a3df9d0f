//! Reverse echo tool definition.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::domains::tools::handlers::{HandlerResult, ToolArguments};
use crate::domains::tools::schema::{InputSchema, ParamSpec, ParamType, ToolDescriptor};

/// Reverse echo tool - echoes the message back reversed.
pub struct ReverseEchoTool;

impl ReverseEchoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "reverseEcho";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Echoes in reverse the message sent by the client.";

    pub fn descriptor() -> ToolDescriptor {
        ToolDescriptor::new(
            Self::NAME,
            Self::DESCRIPTION,
            InputSchema::new().param(
                "message",
                ParamSpec::required(ParamType::String).describe("The message to reverse"),
            ),
        )
    }

    /// Reverse by Unicode scalar value.
    pub fn execute(message: &str) -> String {
        message.chars().rev().collect()
    }

    #[instrument(skip_all)]
    pub fn handle(arguments: &ToolArguments) -> HandlerResult {
        let message = arguments.str("message")?;
        debug!("Reverse echo tool called ({} chars)", message.chars().count());
        Ok(Value::String(Self::execute(message)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reverse() {
        assert_eq!(ReverseEchoTool::execute("abc"), "cba");
        assert_eq!(ReverseEchoTool::execute(""), "");
        assert_eq!(ReverseEchoTool::execute("a"), "a");
        assert_eq!(ReverseEchoTool::execute("añb"), "bña");
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let message = "The quick brown fox";
        let twice = ReverseEchoTool::execute(&ReverseEchoTool::execute(message));
        assert_eq!(twice, message);
    }

    #[test]
    fn test_handle() {
        let Value::Object(map) = json!({"message": "abc"}) else {
            panic!("Expected object");
        };
        let result = ReverseEchoTool::handle(&ToolArguments::new(map));
        assert_eq!(result, Ok(json!("cba")));
    }
}
