//! Desk configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `api_url`
pub const API_URL_ENV: &str = "BLOGDESK_API_URL";

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    // API
    pub api_url: String,
    pub request_timeout_secs: u64,

    // Public site
    pub public_url: String,
    pub uploads_path: String,

    // Session
    pub session_file: String,
    pub login_route: String,
    pub landing_route: String,

    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub reading: ReadingConfig,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3001".to_string(),
            request_timeout_secs: 30,

            public_url: "https://example.com".to_string(),
            uploads_path: "/uploads/".to_string(),

            session_file: ".blogdesk/session.json".to_string(),
            login_route: "/admin/login".to_string(),
            landing_route: "/admin/dashboard".to_string(),

            image: ImageConfig::default(),
            reading: ReadingConfig::default(),
        }
    }
}

impl DeskConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: DeskConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from the environment
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using API url from {}: {}", API_URL_ENV, url);
                self.api_url = url;
            }
        }
    }

    /// Request timeout as a duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Upload image normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub max_bytes: u64,
    pub max_width: u32,
    pub quality: f32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            max_width: 1200,
            quality: 0.85,
        }
    }
}

/// Reading time estimate settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: usize,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
        }
    }
}
