use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the movie API backend
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL prefixed onto relative poster paths
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Seconds before an in-flight API request fails closed
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory holding locally persisted state (recent searches)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".cinelog")
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Path of the persisted recent-search history file under `data_dir`.
    pub fn recent_searches_path(&self) -> PathBuf {
        self.data_dir.join("recent_searches.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            image_base_url: default_image_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            data_dir: default_data_dir(),
        }
    }
}
