//! Configuration management for the MCP server.
//!
//! Configuration is populated from defaults, then overridden by environment
//! variables (a `.env` file is loaded first if present).

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tool dispatch configuration.
    pub tools: ToolsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,

    /// Usage instructions sent to clients on initialize.
    pub instructions: String,
}

/// Configuration for tool dispatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Per-call handler timeout in milliseconds. `None` runs handlers inline
    /// with no deadline.
    pub timeout_ms: Option<u64>,
}

impl ToolsConfig {
    /// The handler timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "echo-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                instructions: "Echo server. Call `echo` or `reverseEcho` with a `message` string."
                    .to_string(),
            },
            tools: ToolsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(raw) = std::env::var("MCP_TOOL_TIMEOUT_MS") {
            match raw.parse::<u64>() {
                Ok(0) => config.tools.timeout_ms = None,
                Ok(ms) => {
                    config.tools.timeout_ms = Some(ms);
                    info!("Tool timeout set to {}ms", ms);
                }
                Err(_) => warn!(
                    "Ignoring MCP_TOOL_TIMEOUT_MS={:?}: expected a number of milliseconds",
                    raw
                ),
            }
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.name, "echo-mcp-server");
        assert_eq!(config.logging.level, "info");
        assert!(config.tools.timeout().is_none());
    }

    #[test]
    fn test_server_name_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("MCP_SERVER_NAME", "custom-echo");
        }
        let config = Config::from_env();
        assert_eq!(config.server.name, "custom-echo");
        unsafe {
            std::env::remove_var("MCP_SERVER_NAME");
        }
    }

    #[test]
    fn test_tool_timeout_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        unsafe {
            std::env::set_var("MCP_TOOL_TIMEOUT_MS", "1500");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.timeout(), Some(Duration::from_millis(1500)));

        unsafe {
            std::env::set_var("MCP_TOOL_TIMEOUT_MS", "0");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.timeout(), None);

        unsafe {
            std::env::set_var("MCP_TOOL_TIMEOUT_MS", "soon");
        }
        let config = Config::from_env();
        assert_eq!(config.tools.timeout(), None);

        unsafe {
            std::env::remove_var("MCP_TOOL_TIMEOUT_MS");
        }
    }
}
