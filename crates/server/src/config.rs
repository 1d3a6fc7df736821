//! Server configuration

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

/// Environment variable overriding the listen address
pub const ENV_ADDR: &str = "SCREENPLAY_SERVER_ADDR";

/// Environment variable toggling the browser UI (`0` disables it)
pub const ENV_UI: &str = "SCREENPLAY_SERVER_UI";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub listen: SocketAddr,

    /// Serve the browser UI under `/ui`
    pub serve_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 8080)),
            serve_ui: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration from file, falling back to defaults when it is absent
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `SCREENPLAY_SERVER_*` environment overrides
    pub fn with_env_overrides(mut self) -> anyhow::Result<Self> {
        if let Some(addr) = std::env::var(ENV_ADDR).ok().filter(|v| !v.trim().is_empty()) {
            self.listen = addr.trim().parse()?;
        }
        if let Ok(ui) = std::env::var(ENV_UI) {
            self.serve_ui = ui.trim() != "0";
        }
        Ok(self)
    }
}
