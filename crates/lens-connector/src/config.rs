//! Connector configuration, loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Sidecar configuration. Every field has a default; a missing config file
/// is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// HTTP/WebSocket bind address.
    pub bind_addr: String,
    /// Ingest flood guard: burst tokens per caller.
    pub rate_limit_burst: u32,
    /// Ingest flood guard: steady-state tokens per second per caller.
    pub rate_limit_per_sec: f64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9180".to_string(),
            rate_limit_burst: 120,
            rate_limit_per_sec: 30.0,
        }
    }
}

impl ConnectorConfig {
    /// Default config path: `<platform config dir>/tasklens/connector.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tasklens").join("connector.toml"))
    }

    /// Load from `path` (or the default path when `None`), falling back to
    /// defaults when no file exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }
}
