//! MCP Server implementation and lifecycle management.
//!
//! The server owns the tool registry (built once, read-only afterwards) and
//! the dispatcher over it. STDIO/TCP clients reach the dispatcher through the
//! rmcp `ToolRouter`; the HTTP transport calls [`McpServer::list_tools`] and
//! [`McpServer::call_tool`] directly.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use crate::domains::tools::{
    Dispatcher, InvocationRequest, InvocationResult, ToolDescriptor, ToolRegistry,
    build_tool_router,
};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Validates and routes tool calls.
    dispatcher: Dispatcher,

    /// Tool router for the rmcp transports.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the built-in tools.
    ///
    /// Fails if the registry cannot be built; the caller should refuse to
    /// serve in that case.
    pub fn new(config: Config) -> super::Result<Self> {
        let registry = ToolRegistry::with_builtin_tools()?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server over an already built registry.
    ///
    /// The registry is frozen here: no registration is possible once the
    /// server exists.
    pub fn with_registry(config: Config, registry: ToolRegistry) -> Self {
        let config = Arc::new(config);
        let dispatcher =
            Dispatcher::new(Arc::new(registry)).with_timeout(config.tools.timeout());

        info!(
            "Serving tools: {}",
            dispatcher.registry().names().join(", ")
        );

        Self {
            tool_router: build_tool_router::<Self>(&dispatcher),
            dispatcher,
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the instructions sent on initialize.
    pub fn instructions(&self) -> &str {
        &self.config.server.instructions
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools in discovery form.
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.dispatcher
            .registry()
            .list_all()
            .map(ToolDescriptor::to_json)
            .collect()
    }

    /// Call a tool. Never fails; errors come back as `Failure` results.
    pub async fn call_tool(&self, request: InvocationRequest) -> InvocationResult {
        self.dispatcher.invoke(request).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(self.config.server.instructions.clone()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
