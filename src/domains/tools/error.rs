//! Tool-specific error types.

use std::time::Duration;
use thiserror::Error;

use super::invocation::ErrorKind;

/// Errors raised while building the tool registry.
///
/// These occur during startup and are fatal: the server refuses to serve
/// with an inconsistent registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A tool with the same name is already registered.
    #[error("Duplicate tool name: {0}")]
    DuplicateName(String),
}

/// Errors that can occur while dispatching a tool call.
///
/// None of these escape the dispatcher: each is converted into an
/// `InvocationResult::Failure` for the transport to report.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool is not registered.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An argument failed schema validation.
    #[error("Invalid argument '{parameter}': {reason}")]
    InvalidArguments { parameter: String, reason: String },

    /// The arguments payload itself is malformed (not an object).
    #[error("Invalid arguments: {0}")]
    MalformedArguments(String),

    /// The handler reported a domain failure.
    #[error("{0}")]
    Handler(#[from] HandlerError),

    /// The handler did not finish within the allowed time.
    #[error("Tool execution timed out after {0:?}")]
    Timeout(Duration),
}

impl ToolError {
    /// Create a new "unknown tool" error.
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    /// Create a new "invalid arguments" error for one parameter.
    pub fn invalid_argument(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// The protocol-level error kind this error is reported as.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTool(_) => ErrorKind::UnknownTool,
            Self::InvalidArguments { .. } | Self::MalformedArguments(_) => {
                ErrorKind::InvalidArguments
            }
            Self::Handler(_) => ErrorKind::HandlerError,
            Self::Timeout(_) => ErrorKind::Timeout,
        }
    }
}

/// Failure reported by a tool handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
