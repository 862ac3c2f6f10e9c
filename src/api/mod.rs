//! REST API access
//!
//! The API itself lives elsewhere. Each resource is reached through a small
//! backend trait so the services above it can be exercised without a
//! server; [`ApiClient`] implements all of them over HTTP.

mod client;
mod models;

use async_trait::async_trait;

pub use client::ApiClient;
pub use models::{
    Category, LoginRequest, LoginResponse, NewsletterStats, RefreshResponse, Subscriber, Tag,
    Term, TermInput, UploadResponse, UploadedImage, User,
};

use crate::content::{Post, PostDraft, PostSummary};
use crate::error::Result;

/// Login, token verification and refresh
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse>;

    /// Succeeds only when the server accepts `token`
    async fn verify_token(&self, token: &str) -> Result<()>;

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse>;
}

/// Blog post CRUD
#[async_trait]
pub trait PostBackend: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<PostSummary>>;
    async fn get_post(&self, id: i64) -> Result<Post>;
    async fn create_post(&self, draft: &PostDraft) -> Result<Post>;
    async fn update_post(&self, id: i64, draft: &PostDraft) -> Result<Post>;
    async fn delete_post(&self, id: i64) -> Result<()>;
}

/// Category and tag CRUD
#[async_trait]
pub trait TaxonomyBackend: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, input: &TermInput) -> Result<Category>;
    async fn update_category(&self, id: i64, input: &TermInput) -> Result<Category>;
    async fn delete_category(&self, id: i64) -> Result<()>;

    async fn list_tags(&self) -> Result<Vec<Tag>>;
    async fn create_tag(&self, input: &TermInput) -> Result<Tag>;
    async fn update_tag(&self, id: i64, input: &TermInput) -> Result<Tag>;
    async fn delete_tag(&self, id: i64) -> Result<()>;
}

/// Newsletter subscriptions
#[async_trait]
pub trait NewsletterBackend: Send + Sync {
    async fn subscribe(&self, email: &str) -> Result<()>;
    async fn unsubscribe(&self, email: &str) -> Result<()>;
    async fn subscribers(&self) -> Result<Vec<Subscriber>>;
    async fn stats(&self) -> Result<NewsletterStats>;
}

/// Image upload
#[async_trait]
pub trait UploadBackend: Send + Sync {
    /// Upload encoded image bytes, returning the server-assigned filename
    async fn upload_image(&self, filename: &str, mime: &str, bytes: Vec<u8>) -> Result<String>;
}
