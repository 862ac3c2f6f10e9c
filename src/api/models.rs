//! Wire models for the REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body either bare or wrapped as `{ "data": ... }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}

/// An admin user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Credentials sent to the login endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Successful login
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: User,
}

/// Successful token refresh
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// A blog category or tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub posts_count: u32,
}

pub type Category = Term;
pub type Tag = Term;

/// Create/update payload for categories and tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermInput {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A newsletter subscriber
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub subscribed_at: Option<DateTime<Utc>>,
}

/// Newsletter counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsletterStats {
    pub total: u64,
    pub active: u64,
    pub unsubscribed: u64,
}

/// Reply of the image upload endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
}

/// An uploaded image and where the public site serves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub filename: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_wrapped_and_bare() {
        let wrapped: Envelope<Term> =
            serde_json::from_str(r#"{"success":true,"data":{"id":1,"name":"MEI","postsCount":3}}"#)
                .unwrap();
        let term = wrapped.into_inner();
        assert_eq!(term.name, "MEI");
        assert_eq!(term.posts_count, 3);

        let bare: Envelope<Term> =
            serde_json::from_str(r##"{"id":2,"name":"Impostos","color":"#ff0000"}"##).unwrap();
        let term = bare.into_inner();
        assert_eq!(term.color.as_deref(), Some("#ff0000"));
        assert_eq!(term.posts_count, 0);
    }

    #[test]
    fn test_login_response() {
        let json = r#"{"token":"t","refreshToken":"r","user":{"id":1,"username":"admin"}}"#;
        let resp: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.refresh_token.as_deref(), Some("r"));
        assert_eq!(resp.user.username, "admin");
    }
}
