//! Echo MCP Server Library
//!
//! A Model Context Protocol server exposing a registry of named tools and a
//! dispatcher that validates and routes tool calls.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server and its transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool descriptors, the registry, the dispatcher and the
//!     built-in `echo` / `reverseEcho` tools
//!
//! # Example
//!
//! ```rust,no_run
//! use echo_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
pub use domains::tools::{Dispatcher, InvocationRequest, InvocationResult, ToolRegistry};
