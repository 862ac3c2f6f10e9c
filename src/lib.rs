//! blogdesk: admin client for a content-block blog CMS
//!
//! This crate holds the client-side logic of the blog: the content-block
//! document model and its editor, post validation, slugs, image
//! normalization and upload, the content renderer, the admin session guard
//! and typed calls against the blog's REST API.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod media;
pub mod services;

pub use error::{Error, ErrorKind, Result, ValidationError};

use std::path::{Path, PathBuf};

use api::ApiClient;
use auth::{AuthService, FileStore};
use content::ContentRenderer;
use helpers::MediaUrls;
use media::ImageNormalizer;

/// The main blogdesk application
#[derive(Debug, Clone)]
pub struct Desk {
    /// Desk configuration
    pub config: config::DeskConfig,
    /// Base directory
    pub base_dir: PathBuf,
}

impl Desk {
    /// Create a new desk from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::DeskConfig::load(&config_path)?
        } else {
            config::DeskConfig::default()
        };
        config.apply_env();

        Ok(Self { config, base_dir })
    }

    /// Path of the credential file
    pub fn session_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.session_file)
    }

    pub fn session_store(&self) -> FileStore {
        FileStore::open(self.session_path())
    }

    /// Unauthenticated API client
    pub fn client(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config)
    }

    /// Session service over the on-disk credential store
    pub fn auth(&self) -> Result<AuthService<ApiClient, FileStore>> {
        Ok(AuthService::new(self.client()?, self.session_store()))
    }

    pub fn media_urls(&self) -> MediaUrls {
        MediaUrls::from_config(&self.config)
    }

    pub fn renderer(&self) -> ContentRenderer {
        ContentRenderer::new(self.media_urls())
    }

    pub fn normalizer(&self) -> ImageNormalizer {
        ImageNormalizer::new(self.config.image.clone())
    }
}
