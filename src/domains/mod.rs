//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently has a single domain: tools, which can be listed and
//! invoked by MCP clients.

pub mod tools;
