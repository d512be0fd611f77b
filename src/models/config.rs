//! Configuration
//!
//! Loaded from `initiatived.toml`; every section falls back to defaults so
//! a missing or partial file still yields a runnable setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_data_file() -> PathBuf {
    PathBuf::from("initiatived/initiatives.json")
}

fn default_port() -> u16 {
    8080
}

fn default_pending_limit() -> usize {
    crate::services::sweep::DEFAULT_PENDING_LIMIT
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

// Digest of the demo password "admin123"
fn default_admin_password_sha256() -> String {
    "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Ceiling on the visible pending backlog
    #[serde(default = "default_pending_limit")]
    pub pending_limit: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            pending_limit: default_pending_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LifecycleConfig {
    /// When true, responding to an already-responded initiative overwrites
    /// the previous response instead of failing with a conflict.
    #[serde(default)]
    pub overwrite_responses: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrgencyConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Bound on the external call; scoring degrades, it never blocks
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for UrgencyConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_username")]
    pub username: String,

    /// Hex SHA-256 digest of the admin password
    #[serde(default = "default_admin_password_sha256")]
    pub password_sha256: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            password_sha256: default_admin_password_sha256(),
        }
    }
}

/// Initiatived configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativedConfig {
    /// JSON store location
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub sweep: SweepConfig,

    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    #[serde(default)]
    pub urgency: UrgencyConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

impl Default for InitiativedConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            server: ServerConfig::default(),
            sweep: SweepConfig::default(),
            lifecycle: LifecycleConfig::default(),
            urgency: UrgencyConfig::default(),
            admin: AdminConfig::default(),
        }
    }
}

impl InitiativedConfig {
    /// Load config from a TOML file; a missing file yields defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: InitiativedConfig = toml::from_str(&content)?;
        Ok(config)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = InitiativedConfig::load(Path::new("/nonexistent/initiatived.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.sweep.pending_limit,
            crate::services::sweep::DEFAULT_PENDING_LIMIT
        );
        assert!(!config.lifecycle.overwrite_responses);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: InitiativedConfig = toml::from_str("[server]\nport = 9999\n").unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.urgency.timeout_secs, 20);
        assert_eq!(config.admin.username, "admin");
    }
}
