//! URL helper functions for uploaded media

use lazy_static::lazy_static;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::{Captures, Regex};

use crate::config::DeskConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

lazy_static! {
    static ref DEV_ORIGIN: Regex =
        Regex::new(r"^https?://(localhost|127\.0\.0\.1|0\.0\.0\.0)(:\d+)?([/?#]|$)").unwrap();
}

/// Resolves stored image references to public URLs
#[derive(Debug, Clone)]
pub struct MediaUrls {
    base: String,
    uploads: String,
}

impl MediaUrls {
    /// Create a resolver for a public base url and uploads path
    pub fn new(public_url: &str, uploads_path: &str) -> Self {
        let uploads = format!("/{}/", uploads_path.trim_matches('/'));
        Self {
            base: public_url.trim_end_matches('/').to_string(),
            uploads: uploads.replace("//", "/"),
        }
    }

    /// Create a resolver from the desk configuration
    pub fn from_config(config: &DeskConfig) -> Self {
        Self::new(&config.public_url, &config.uploads_path)
    }

    /// Public URL of a server-assigned upload filename
    ///
    /// # Examples
    /// ```ignore
    /// urls.upload_url("a b.jpg") // -> "https://example.com/uploads/a%20b.jpg"
    /// ```
    pub fn upload_url(&self, filename: &str) -> String {
        format!(
            "{}{}{}",
            self.base,
            self.uploads,
            encode_segment(filename.trim_start_matches('/'))
        )
    }

    /// Rewrite an accidentally persisted development origin to the public base
    pub fn sanitize(&self, url: &str) -> String {
        if DEV_ORIGIN.is_match(url) {
            // The host must end at a path, query, fragment or end of string
            let rewritten = DEV_ORIGIN
                .replace(url, |caps: &Captures| {
                    format!("{}{}", self.base, caps.get(3).map_or("", |m| m.as_str()))
                })
                .into_owned();
            tracing::debug!("Rewrote development url {} -> {}", url, rewritten);
            rewritten
        } else {
            url.to_string()
        }
    }

    /// Resolve image block content to something an `<img>` can load
    pub fn resolve(&self, content: &str) -> String {
        let content = content.trim();
        if content.is_empty() || content.starts_with("data:") {
            content.to_string()
        } else if content.starts_with("http://")
            || content.starts_with("https://")
            || content.starts_with("//")
        {
            self.sanitize(content)
        } else if content.starts_with('/') {
            format!("{}{}", self.base, content)
        } else {
            self.upload_url(content)
        }
    }
}

/// Encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
