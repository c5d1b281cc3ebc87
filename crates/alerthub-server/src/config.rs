use alerthub_ticketing::snow::SnowSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Directory holding the SQLite database.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub ticketing: TicketingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            data_dir: default_data_dir(),
            ticketing: TicketingConfig::default(),
        }
    }
}

/// Ticketing backend selection plus the gateway's static request fields.
/// `backend = "snow"` talks to the live service-management system; any
/// other value gets the no-op stub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketingConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(flatten)]
    pub snow: SnowSettings,
}

impl Default for TicketingConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            snow: SnowSettings::default(),
        }
    }
}

fn default_http_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_backend() -> String {
    "test".to_string()
}

impl ServerConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
