//! Tool Registry - central registration and lookup for all tools.
//!
//! The registry is built once at startup and then shared behind an `Arc`,
//! after which it is read-only. Concurrent lookups need no locking.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use super::definitions::{EchoTool, ReverseEchoTool};
use super::error::RegistryError;
use super::handlers::ToolHandler;
use super::schema::ToolDescriptor;

// ============================================================================
// Registered Tool
// ============================================================================

/// A registry entry: descriptor plus the handler that implements it.
#[derive(Clone)]
pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: Arc<dyn ToolHandler>,
}

impl RegisteredTool {
    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    pub fn handler(&self) -> &Arc<dyn ToolHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - maps tool names to descriptors and handlers.
///
/// Entries are listed in registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every built-in tool.
    ///
    /// This is the single place where the server's tools are registered.
    pub fn with_builtin_tools() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(EchoTool::descriptor(), EchoTool::handle)?;
        registry.register(ReverseEchoTool::descriptor(), ReverseEchoTool::handle)?;
        info!("Registered {} tools", registry.len());
        Ok(registry)
    }

    /// Register a tool.
    ///
    /// Fails with [`RegistryError::DuplicateName`] if a tool with the same
    /// name exists; the registry is left unchanged in that case.
    pub fn register<H>(&mut self, descriptor: ToolDescriptor, handler: H) -> Result<(), RegistryError>
    where
        H: ToolHandler + 'static,
    {
        self.register_shared(descriptor, Arc::new(handler))
    }

    /// Register a tool whose handler is already behind an `Arc`.
    pub fn register_shared(
        &mut self,
        descriptor: ToolDescriptor,
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), RegistryError> {
        let name = descriptor.name().to_string();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        debug!("Registering tool: {}", name);
        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor,
            handler,
        });
        Ok(())
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// All descriptors, in registration order.
    ///
    /// The iterator is lazy and may be requested any number of times.
    pub fn list_all(&self) -> impl Iterator<Item = &ToolDescriptor> + '_ {
        self.tools.iter().map(RegisteredTool::descriptor)
    }

    /// All tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.list_all().map(ToolDescriptor::name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
