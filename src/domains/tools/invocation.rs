//! Invocation request and result types.
//!
//! These are the transport-agnostic messages exchanged with the dispatcher.
//! Their serde form is the outbound wire shape:
//! `{"status":"ok","result":...}` or `{"status":"error","kind":...,"message":...}`.

use rmcp::model::{CallToolResult, Content};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::error::ToolError;

/// A single tool call as received from a transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    /// Name of the tool to invoke.
    pub tool_name: String,

    /// Argument map. `null` or absent is treated as an empty map.
    #[serde(default)]
    pub arguments: Value,
}

impl InvocationRequest {
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Category of a dispatch-time failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnknownTool,
    InvalidArguments,
    HandlerError,
    Timeout,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnknownTool => "UnknownTool",
            Self::InvalidArguments => "InvalidArguments",
            Self::HandlerError => "HandlerError",
            Self::Timeout => "Timeout",
        };
        f.write_str(s)
    }
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum InvocationResult {
    /// The handler ran and produced a payload.
    #[serde(rename = "ok")]
    Success {
        #[serde(rename = "result")]
        payload: Value,
    },

    /// The call was rejected or the handler failed.
    #[serde(rename = "error")]
    Failure { kind: ErrorKind, message: String },
}

impl InvocationResult {
    pub fn success(payload: impl Into<Value>) -> Self {
        Self::Success {
            payload: payload.into(),
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The failure kind, if this is a failure.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }

    /// Convert into an MCP `CallToolResult`.
    ///
    /// String payloads become a single text block. Structured payloads are
    /// sent both as serialized text and as `structuredContent`. Failures are
    /// reported in-band with `isError` set.
    pub fn into_call_tool_result(self) -> CallToolResult {
        match self {
            Self::Success {
                payload: Value::String(text),
            } => CallToolResult::success(vec![Content::text(text)]),
            Self::Success { payload } => CallToolResult {
                content: vec![Content::text(payload.to_string())],
                structured_content: Some(payload),
                is_error: Some(false),
                meta: None,
            },
            Self::Failure { kind, message } => {
                CallToolResult::error(vec![Content::text(format!("{}: {}", kind, message))])
            }
        }
    }
}

impl From<ToolError> for InvocationResult {
    fn from(err: ToolError) -> Self {
        Self::failure(err.kind(), err.to_string())
    }
}

impl From<Result<Value, ToolError>> for InvocationResult {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(err) => err.into(),
        }
    }
}
