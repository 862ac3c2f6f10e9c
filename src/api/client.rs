//! HTTP client for the REST API

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::models::{
    Category, Envelope, LoginRequest, LoginResponse, NewsletterStats, RefreshResponse,
    Subscriber, Tag, TermInput, UploadResponse,
};
use super::{AuthBackend, NewsletterBackend, PostBackend, TaxonomyBackend, UploadBackend};
use crate::config::DeskConfig;
use crate::content::{Post, PostDraft, PostSummary};
use crate::error::{Error, Result};

/// REST API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("blogdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::NetworkFailure(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a client from the desk configuration
    pub fn from_config(config: &DeskConfig) -> Result<Self> {
        Self::new(&config.api_url, config.request_timeout())
    }

    /// Attach a bearer token to every request
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        tracing::debug!("{} {}", method, self.url(path));
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let body = self.execute(builder).await?;
        decode_body(&body)
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<()> {
        self.execute(builder).await.map(|_| ())
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::debug!("Request rejected with {}", status);
            return Err(Error::Unauthorized);
        }

        let body = response.bytes().await?;
        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());
            tracing::debug!("Request failed with {}: {}", status, message);
            return Err(Error::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body.to_vec())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, path)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

/// Decode a success body, accepting bare and `{ "data": ... }` shapes
pub(crate) fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| Error::ServerError {
            status: 200,
            message: format!("malformed response: {}", e),
        })
}

/// Pull a human-readable message out of an error body
fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    ["message", "error", "msg"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(String::from)
}

#[async_trait]
impl AuthBackend for ApiClient {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        self.post("/api/auth/login", &LoginRequest { username, password })
            .await
    }

    async fn verify_token(&self, token: &str) -> Result<()> {
        let builder = self
            .client
            .get(self.url("/api/auth/verify-token"))
            .bearer_auth(token);
        self.send_empty(builder).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse> {
        let body = serde_json::json!({ "refreshToken": refresh_token });
        self.post("/api/auth/refresh", &body).await
    }
}

#[async_trait]
impl PostBackend for ApiClient {
    async fn list_posts(&self) -> Result<Vec<PostSummary>> {
        self.get("/api/posts").await
    }

    async fn get_post(&self, id: i64) -> Result<Post> {
        self.get(&format!("/api/posts/{}", id)).await
    }

    async fn create_post(&self, draft: &PostDraft) -> Result<Post> {
        self.post("/api/posts", draft).await
    }

    async fn update_post(&self, id: i64, draft: &PostDraft) -> Result<Post> {
        self.put(&format!("/api/posts/{}", id), draft).await
    }

    async fn delete_post(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/posts/{}", id)).await
    }
}

#[async_trait]
impl TaxonomyBackend for ApiClient {
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get("/api/categories").await
    }

    async fn create_category(&self, input: &TermInput) -> Result<Category> {
        self.post("/api/categories", input).await
    }

    async fn update_category(&self, id: i64, input: &TermInput) -> Result<Category> {
        self.put(&format!("/api/categories/{}", id), input).await
    }

    async fn delete_category(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/categories/{}", id)).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.get("/api/tags").await
    }

    async fn create_tag(&self, input: &TermInput) -> Result<Tag> {
        self.post("/api/tags", input).await
    }

    async fn update_tag(&self, id: i64, input: &TermInput) -> Result<Tag> {
        self.put(&format!("/api/tags/{}", id), input).await
    }

    async fn delete_tag(&self, id: i64) -> Result<()> {
        self.delete(&format!("/api/tags/{}", id)).await
    }
}

#[async_trait]
impl NewsletterBackend for ApiClient {
    async fn subscribe(&self, email: &str) -> Result<()> {
        let builder = self
            .request(Method::POST, "/api/newsletter/subscribe")
            .json(&serde_json::json!({ "email": email }));
        self.send_empty(builder).await
    }

    async fn unsubscribe(&self, email: &str) -> Result<()> {
        let builder = self
            .request(Method::POST, "/api/newsletter/unsubscribe")
            .json(&serde_json::json!({ "email": email }));
        self.send_empty(builder).await
    }

    async fn subscribers(&self) -> Result<Vec<Subscriber>> {
        self.get("/api/newsletter/subscribers").await
    }

    async fn stats(&self) -> Result<NewsletterStats> {
        self.get("/api/newsletter/stats").await
    }
}

#[async_trait]
impl UploadBackend for ApiClient {
    async fn upload_image(&self, filename: &str, mime: &str, bytes: Vec<u8>) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response: UploadResponse = self
            .send(self.request(Method::POST, "/api/upload/image").multipart(form))
            .await?;
        Ok(response.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = ApiClient::new("https://api.example/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("/api/posts"), "https://api.example/api/posts");
        assert_eq!(client.url("api/tags"), "https://api.example/api/tags");
    }

    #[test]
    fn test_decode_body_malformed() {
        let err = decode_body::<Vec<PostSummary>>(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::ServerError { .. }));
    }

    #[test]
    fn test_decode_posts_list() {
        let body = br#"{"data":[{"id":1,"title":"MEI","status":"published"}]}"#;
        let posts: Vec<PostSummary> = decode_body(body).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "MEI");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(br#"{"success":false,"message":"Slug already exists"}"#).as_deref(),
            Some("Slug already exists")
        );
        assert_eq!(error_message(b"not json"), None);
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new("https://api.example", Duration::from_secs(5))
            .unwrap()
            .with_token("secret");
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
    }
}
