use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/client.json";
pub const SERVER_URL_ENV: &str = "CHAT_SERVER_URL";

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
const DEFAULT_DATA_DIR: &str = "data";
const DB_FILE: &str = "client.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the chat backend; REST and stream endpoints hang off it.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Directory holding the session database.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            data_dir: default_data_dir(),
        }
    }
}

impl AppConfig {
    pub fn db_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(DB_FILE)
    }

    /// Env first, then the command line; later sources win.
    pub fn with_overrides(mut self, env_server: Option<String>, cli_server: Option<String>) -> Self {
        if let Some(server) = env_server.filter(|s| !s.trim().is_empty()) {
            log::info!("Using server URL from {SERVER_URL_ENV}");
            self.server_url = server;
        }
        if let Some(server) = cli_server {
            self.server_url = server;
        }
        self
    }
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}

pub fn save_config(path: &str, config: &AppConfig) -> std::io::Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
}
