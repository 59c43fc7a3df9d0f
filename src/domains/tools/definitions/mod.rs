//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file and registered in `registry.rs`.

pub mod echo;
pub mod reverse_echo;

pub use echo::EchoTool;
pub use reverse_echo::ReverseEchoTool;
