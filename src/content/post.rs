//! Post models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::block::{renumber, BlockType, ContentBlock};
use crate::error::ValidationError;
use crate::helpers::generate_slug;

/// Publication status of a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        };
        f.write_str(s)
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            "archived" => Ok(PostStatus::Archived),
            other => Err(format!("unknown post status '{}'", other)),
        }
    }
}

/// The fields of a post the admin editor owns
///
/// This is the payload submitted atomically on create and update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostDraft {
    /// Post title
    pub title: String,

    /// Short summary shown in listings
    pub excerpt: String,

    /// Cover image URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    pub category_id: Option<i64>,

    pub status: PostStatus,

    pub tag_ids: BTreeSet<i64>,

    /// Ordered body blocks
    pub content_blocks: Vec<ContentBlock>,
}

impl PostDraft {
    /// Create an empty draft
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Slug preview for the current title
    pub fn slug(&self) -> String {
        generate_slug(&self.title)
    }

    /// Normalize block ordering before it leaves the editor
    pub fn normalize(&mut self) {
        let blocks = std::mem::take(&mut self.content_blocks);
        self.content_blocks = renumber(blocks);
    }

    /// Check the draft can be submitted
    ///
    /// Rules are checked in a fixed order and the first violation is
    /// returned: title, at least one block, a known block type, non-empty
    /// block content, image alternative text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }

        if self.content_blocks.is_empty() {
            return Err(ValidationError::NoContentBlocks);
        }

        let mut blocks: Vec<&ContentBlock> = self.content_blocks.iter().collect();
        blocks.sort_by_key(|b| b.order);

        if let Some(block) = blocks
            .iter()
            .find(|b| !BlockType::EDITABLE.contains(&b.block_type))
        {
            return Err(ValidationError::UnsupportedBlockType(
                block.block_type.to_string(),
            ));
        }

        if let Some(block) = blocks.iter().find(|b| b.content.trim().is_empty()) {
            return Err(ValidationError::EmptyBlockContent { order: block.order });
        }

        if let Some(block) = blocks
            .iter()
            .find(|b| b.block_type == BlockType::Image && b.image_alt().trim().is_empty())
        {
            return Err(ValidationError::MissingImageAlt { order: block.order });
        }

        Ok(())
    }
}

/// A post as listed by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub status: PostStatus,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A full post as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(flatten)]
    pub summary: PostSummary,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tag_ids: BTreeSet<i64>,
    #[serde(default)]
    pub content_blocks: Vec<ContentBlock>,
}

impl Post {
    /// Turn a loaded post into an editable draft
    pub fn into_draft(self) -> PostDraft {
        let mut draft = PostDraft {
            title: self.summary.title,
            excerpt: self.summary.excerpt.unwrap_or_default(),
            image: self.image,
            category_id: self.summary.category_id,
            status: self.summary.status,
            tag_ids: self.tag_ids,
            content_blocks: self.content_blocks,
        };
        draft.normalize();
        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::block::MetadataPatch;

    fn valid_draft() -> PostDraft {
        let mut draft = PostDraft::new("Abertura de Empresas");
        draft.content_blocks = vec![
            ContentBlock::with_content(BlockType::Title, 1, "Como abrir sua empresa"),
            ContentBlock::with_content(BlockType::Paragraph, 2, "Passo a passo."),
        ];
        draft
    }

    #[test]
    fn test_valid_draft() {
        assert_eq!(valid_draft().validate(), Ok(()));
        assert_eq!(valid_draft().slug(), "abertura-de-empresas");
    }

    #[test]
    fn test_empty_title_wins_first() {
        let mut draft = valid_draft();
        draft.title = "   ".to_string();
        draft.content_blocks.clear();
        assert_eq!(draft.validate(), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_requires_blocks() {
        let mut draft = valid_draft();
        draft.content_blocks.clear();
        assert_eq!(draft.validate(), Err(ValidationError::NoContentBlocks));
    }

    #[test]
    fn test_empty_block_content() {
        let mut draft = valid_draft();
        draft.content_blocks[1].content = " ".to_string();
        assert_eq!(
            draft.validate(),
            Err(ValidationError::EmptyBlockContent { order: 2 })
        );
    }

    #[test]
    fn test_unknown_block_type_rejected() {
        let mut draft = valid_draft();
        draft.content_blocks[1].block_type = BlockType::Unknown;
        assert_eq!(
            draft.validate(),
            Err(ValidationError::UnsupportedBlockType("unknown".to_string()))
        );
    }

    #[test]
    fn test_image_requires_alt() {
        let mut draft = valid_draft();
        let mut image = ContentBlock::with_content(BlockType::Image, 3, "/uploads/a.jpg");
        draft.content_blocks.push(image.clone());
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingImageAlt { order: 3 })
        );

        image.metadata.merge(&MetadataPatch {
            image_alt: Some("Fachada do escritório".to_string()),
            ..MetadataPatch::default()
        });
        draft.content_blocks[2] = image;
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn test_draft_wire_format() {
        let mut draft = valid_draft();
        draft.category_id = Some(3);
        draft.tag_ids = [2, 1].into_iter().collect();
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["categoryId"], 3);
        assert_eq!(value["tagIds"], serde_json::json!([1, 2]));
        assert_eq!(value["status"], "draft");
        assert_eq!(value["contentBlocks"][0]["type"], "title");
    }

    #[test]
    fn test_post_into_draft() {
        let json = r#"{
            "id": 7,
            "title": "Imposto de Renda",
            "slug": "imposto-de-renda",
            "status": "published",
            "categoryId": 2,
            "tagIds": [4],
            "contentBlocks": [
                {"id": "b", "type": "paragraph", "content": "two", "order": 9},
                {"id": "a", "type": "title", "content": "one", "order": 4}
            ]
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.summary.id, 7);

        let draft = post.into_draft();
        assert_eq!(draft.status, PostStatus::Published);
        assert_eq!(draft.content_blocks[0].id, "a");
        assert_eq!(draft.content_blocks[0].order, 1);
        assert_eq!(draft.content_blocks[1].order, 2);
    }
}
