//! Newsletter subscriptions

use lazy_static::lazy_static;
use regex::Regex;

use crate::api::{NewsletterBackend, NewsletterStats, Subscriber};
use crate::error::{Result, ValidationError};

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Trim `email` and check it looks like an address
pub fn validate_email(email: &str) -> std::result::Result<String, ValidationError> {
    let email = email.trim();
    if EMAIL_RE.is_match(email) {
        Ok(email.to_string())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

pub async fn subscribe<B: NewsletterBackend + ?Sized>(backend: &B, email: &str) -> Result<String> {
    let email = validate_email(email)?;
    backend.subscribe(&email).await?;
    tracing::info!("Subscribed {}", email);
    Ok(email)
}

pub async fn unsubscribe<B: NewsletterBackend + ?Sized>(
    backend: &B,
    email: &str,
) -> Result<String> {
    let email = validate_email(email)?;
    backend.unsubscribe(&email).await?;
    tracing::info!("Unsubscribed {}", email);
    Ok(email)
}

pub async fn subscribers<B: NewsletterBackend + ?Sized>(backend: &B) -> Result<Vec<Subscriber>> {
    backend.subscribers().await
}

pub async fn stats<B: NewsletterBackend + ?Sized>(backend: &B) -> Result<NewsletterStats> {
    backend.stats().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeNewsletter {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NewsletterBackend for FakeNewsletter {
        async fn subscribe(&self, email: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("subscribe {}", email));
            Ok(())
        }

        async fn unsubscribe(&self, email: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("unsubscribe {}", email));
            Ok(())
        }

        async fn subscribers(&self) -> Result<Vec<Subscriber>> {
            Ok(vec![])
        }

        async fn stats(&self) -> Result<NewsletterStats> {
            Ok(NewsletterStats {
                total: 3,
                active: 2,
                unsubscribed: 1,
            })
        }
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email("  contato@escritorio.com.br ").unwrap(),
            "contato@escritorio.com.br"
        );
        assert!(validate_email("contato").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("").is_err());
    }

    #[tokio::test]
    async fn test_subscribe_trims() {
        let backend = FakeNewsletter::default();
        subscribe(&backend, " ana@example.com").await.unwrap();
        unsubscribe(&backend, "ana@example.com").await.unwrap();
        assert_eq!(
            *backend.calls.lock().unwrap(),
            vec!["subscribe ana@example.com", "unsubscribe ana@example.com"]
        );
    }

    #[tokio::test]
    async fn test_invalid_email_never_sent() {
        let backend = FakeNewsletter::default();
        let err = subscribe(&backend, "not-an-email").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidEmail(_))
        ));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_passthrough() {
        let backend = FakeNewsletter::default();
        assert_eq!(stats(&backend).await.unwrap().active, 2);
        assert!(subscribers(&backend).await.unwrap().is_empty());
    }
}
