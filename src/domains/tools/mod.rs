//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are named, schema-described operations that MCP clients can invoke.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `schema.rs` - Tool descriptors and parameter schemas
//! - `handlers.rs` - Handler trait and validated argument access
//! - `registry.rs` - Central tool registry (built once at startup)
//! - `dispatcher.rs` - Validation and routing of invocation requests
//! - `invocation.rs` - Request/result types and their wire form
//! - `router.rs` - rmcp ToolRouter for STDIO/TCP transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define `descriptor()` and `handle()`
//! 3. Export in `definitions/mod.rs`
//! 4. Register in `ToolRegistry::with_builtin_tools()`
//!
//! Both the HTTP dispatch and the rmcp router pick the tool up from the
//! registry; no transport code changes.

pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod invocation;
mod registry;
pub mod router;
mod schema;

pub use dispatcher::{Dispatcher, validate_arguments};
pub use error::{HandlerError, RegistryError, ToolError};
pub use handlers::{HandlerResult, ToolArguments, ToolHandler};
pub use invocation::{ErrorKind, InvocationRequest, InvocationResult};
pub use registry::{RegisteredTool, ToolRegistry};
pub use router::build_tool_router;
pub use schema::{InputSchema, ParamSpec, ParamType, ToolDescriptor};
