//! Post submission and batch operations

use futures::future::join_all;

use crate::api::PostBackend;
use crate::content::{Post, PostDraft};
use crate::error::{Error, Result};
use crate::helpers::generate_unique_slug;

/// Outcome of a fan-out over several posts
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: Vec<i64>,
    pub failed: Vec<(i64, Error)>,
}

impl BatchSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Validate and submit a draft, creating a post or updating `existing`
///
/// Nothing is sent when validation fails.
pub async fn submit<B: PostBackend + ?Sized>(
    backend: &B,
    draft: &PostDraft,
    existing: Option<i64>,
) -> Result<Post> {
    let mut draft = draft.clone();
    draft.normalize();
    draft.validate()?;

    match existing {
        Some(id) => {
            tracing::info!("Updating post {} \"{}\"", id, draft.title);
            backend.update_post(id, &draft).await
        }
        None => {
            tracing::info!("Creating post \"{}\"", draft.title);
            backend.create_post(&draft).await
        }
    }
}

/// Delete several posts concurrently, reporting each outcome
pub async fn delete_many<B: PostBackend + ?Sized>(backend: &B, ids: &[i64]) -> BatchSummary {
    let results = join_all(ids.iter().map(|&id| async move {
        let result = backend.delete_post(id).await;
        (id, result)
    }))
    .await;

    let mut summary = BatchSummary::default();
    for (id, result) in results {
        match result {
            Ok(()) => summary.succeeded.push(id),
            Err(e) => {
                tracing::warn!("Failed to delete post {}: {}", id, e);
                summary.failed.push((id, e));
            }
        }
    }
    summary
}

/// Slug for `title` that does not collide with any existing post
pub async fn suggest_slug<B: PostBackend + ?Sized>(backend: &B, title: &str) -> Result<String> {
    let existing: Vec<String> = backend
        .list_posts()
        .await?
        .into_iter()
        .map(|post| post.slug)
        .collect();
    Ok(generate_unique_slug(title, &existing))
}
