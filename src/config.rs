//! Runtime configuration.
//!
//! Settings come from `config.json` in the platform config directory, then
//! environment variables, then command-line flags (applied by the binary).
//! A missing or unreadable file falls back to defaults.
//!
//! Environment overrides:
//! - `DRAGON_SCALES_HOST` - Address the server binds to
//! - `DRAGON_SCALES_PORT` - Port the server listens on
//! - `DRAGON_SCALES_URL` - Base URL the CLI talks to

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::client::DEFAULT_URL;

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server listens on.
    pub port: u16,
    /// API base URL used by the CLI's read commands.
    pub api_url: String,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 17020,
            api_url: DEFAULT_URL.to_string(),
            log_filter: "dragon_scales=debug,tower_http=debug".to_string(),
        }
    }
}

impl Config {
    /// Load from the user's config directory with environment overrides.
    pub fn load() -> Self {
        let mut config = match config_path().and_then(|path| Self::load_from(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.apply_env();
        config
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config = serde_json::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("DRAGON_SCALES_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("DRAGON_SCALES_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.port = port;
        }
        if let Ok(url) = std::env::var("DRAGON_SCALES_URL") {
            self.api_url = url;
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "dragon-scales")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
