//! Category and tag management

use std::fmt;

use crate::api::{Category, Tag, TaxonomyBackend, Term, TermInput};
use crate::error::{Result, ValidationError};
use crate::helpers::generate_slug;

/// Which taxonomy a term belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Category,
    Tag,
}

impl TermKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Category => "category",
            TermKind::Tag => "tag",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TermInput {
    /// Input with a slug derived from `name`
    pub fn named(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            slug: generate_slug(name),
            color: None,
            description: None,
        }
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }
}

/// Refuse to delete a term that still has posts
pub fn ensure_deletable(kind: TermKind, term: &Term) -> std::result::Result<(), ValidationError> {
    if term.posts_count == 0 {
        return Ok(());
    }
    let name = term.name.clone();
    let posts = term.posts_count;
    Err(match kind {
        TermKind::Category => ValidationError::CategoryInUse { name, posts },
        TermKind::Tag => ValidationError::TagInUse { name, posts },
    })
}

pub async fn list<B: TaxonomyBackend + ?Sized>(backend: &B, kind: TermKind) -> Result<Vec<Term>> {
    match kind {
        TermKind::Category => backend.list_categories().await,
        TermKind::Tag => backend.list_tags().await,
    }
}

pub async fn create<B: TaxonomyBackend + ?Sized>(
    backend: &B,
    kind: TermKind,
    input: &TermInput,
) -> Result<Term> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name").into());
    }
    tracing::info!("Creating {} \"{}\"", kind, input.name);
    match kind {
        TermKind::Category => backend.create_category(input).await,
        TermKind::Tag => backend.create_tag(input).await,
    }
}

pub async fn update<B: TaxonomyBackend + ?Sized>(
    backend: &B,
    kind: TermKind,
    id: i64,
    input: &TermInput,
) -> Result<Term> {
    if input.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name").into());
    }
    tracing::info!("Updating {} {}", kind, id);
    match kind {
        TermKind::Category => backend.update_category(id, input).await,
        TermKind::Tag => backend.update_tag(id, input).await,
    }
}

/// Delete `term` unless it still has posts
pub async fn delete<B: TaxonomyBackend + ?Sized>(
    backend: &B,
    kind: TermKind,
    term: &Term,
) -> Result<()> {
    ensure_deletable(kind, term)?;
    tracing::info!("Deleting {} \"{}\"", kind, term.name);
    match kind {
        TermKind::Category => backend.delete_category(term.id).await,
        TermKind::Tag => backend.delete_tag(term.id).await,
    }
}

/// Look a term up by id, then delete it
pub async fn delete_by_id<B: TaxonomyBackend + ?Sized>(
    backend: &B,
    kind: TermKind,
    id: i64,
) -> Result<Term> {
    let term = list(backend, kind)
        .await?
        .into_iter()
        .find(|t| t.id == id)
        .ok_or(ValidationError::TermNotFound {
            kind: kind.as_str(),
            id,
        })?;
    delete(backend, kind, &term).await?;
    Ok(term)
}

pub async fn delete_category<B: TaxonomyBackend + ?Sized>(
    backend: &B,
    category: &Category,
) -> Result<()> {
    delete(backend, TermKind::Category, category).await
}

pub async fn delete_tag<B: TaxonomyBackend + ?Sized>(backend: &B, tag: &Tag) -> Result<()> {
    delete(backend, TermKind::Tag, tag).await
}
