use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

/// Configuration for the application
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Config {
    /// Root of the invoice backend, e.g. `http://127.0.0.1:8000/api`
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Where exported files are saved
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// Log file used while the terminal UI owns the screen
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000/api".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("invoice_drafter.log")
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            download_dir: default_download_dir(),
            log_file: default_log_file(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from `INVOICE_*` environment variables
    ///
    /// This function will:
    /// 1. Load variables from .env file if it exists
    /// 2. Deserialize the prefixed variables into Config, filling in defaults
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::prefixed("INVOICE_").from_env::<Config>()?;

        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
