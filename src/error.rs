//! Error types shared by every service call
//!
//! The library never hands out bare strings for failures: each call returns
//! [`Result<T>`] and the caller decides how to phrase the message.

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Closed classification of failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    NetworkFailure,
    ServerError,
    DecodeFailure,
}

/// Errors returned by services, the editor and the media pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("not authorized, please log in again")]
    Unauthorized,

    #[error("network failure: {0}")]
    NetworkFailure(String),

    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("could not decode image: {0}")]
    DecodeFailure(String),
}

impl Error {
    /// Get the closed kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::Unauthorized => ErrorKind::Unauthorized,
            Error::NetworkFailure(_) => ErrorKind::NetworkFailure,
            Error::ServerError { .. } => ErrorKind::ServerError,
            Error::DecodeFailure(_) => ErrorKind::DecodeFailure,
        }
    }

    /// Whether the failure happened before anything was sent over the wire
    pub fn is_local(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::DecodeFailure(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            if status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN
            {
                return Error::Unauthorized;
            }
            return Error::ServerError {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Error::ServerError {
                status: 200,
                message: format!("malformed response: {}", err),
            };
        }
        Error::NetworkFailure(err.to_string())
    }
}

/// Problems caught before any network call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    EmptyTitle,

    #[error("Add at least one content block")]
    NoContentBlocks,

    #[error("Content block {order} is empty")]
    EmptyBlockContent { order: u32 },

    #[error("Image in block {order} needs alternative text")]
    MissingImageAlt { order: u32 },

    #[error("Unsupported block type: {0}")]
    UnsupportedBlockType(String),

    #[error("Content block not found: {0}")]
    BlockNotFound(String),

    #[error("Unsupported file type: {0}. Use JPEG, PNG, GIF or WebP")]
    InvalidFileType(String),

    #[error("File is too large ({size} bytes, max {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Category \"{name}\" still has {posts} posts")]
    CategoryInUse { name: String, posts: u32 },

    #[error("Tag \"{name}\" still has {posts} posts")]
    TagInUse { name: String, posts: u32 },

    #[error("No {kind} with id {id}")]
    TermNotFound { kind: &'static str, id: i64 },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("{0} is required")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_kind() {
        let err: Error = ValidationError::EmptyTitle.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.is_local());
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn test_server_error_message() {
        let err = Error::ServerError {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(!err.is_local());
        assert_eq!(err.to_string(), "server error (500): boom");
    }

    #[test]
    fn test_file_too_large_message() {
        let err = ValidationError::FileTooLarge {
            size: 6_000_000,
            max: 5_242_880,
        };
        assert!(err.to_string().contains("6000000"));
    }
}
