//! Content block model
//!
//! A post body is a flat, ordered list of typed blocks. The `order` field is
//! the only source of sequence: after every mutation it must hold exactly
//! `1..=N`, which [`renumber`] restores.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a content block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Title,
    Subtitle,
    Paragraph,
    Image,
    List,
    Quote,
    /// Anything the API returns that this client does not know
    #[serde(other)]
    Unknown,
}

impl BlockType {
    /// All types an editor can create
    pub const EDITABLE: [BlockType; 6] = [
        BlockType::Title,
        BlockType::Subtitle,
        BlockType::Paragraph,
        BlockType::Image,
        BlockType::List,
        BlockType::Quote,
    ];

    /// Machine name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Title => "title",
            BlockType::Subtitle => "subtitle",
            BlockType::Paragraph => "paragraph",
            BlockType::Image => "image",
            BlockType::List => "list",
            BlockType::Quote => "quote",
            BlockType::Unknown => "unknown",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            BlockType::Title => "Title",
            BlockType::Subtitle => "Subtitle",
            BlockType::Paragraph => "Paragraph",
            BlockType::Image => "Image",
            BlockType::List => "List",
            BlockType::Quote => "Quote",
            BlockType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::EDITABLE
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown block type '{}'", s))
    }
}

/// Text alignment of headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Ordered or bulleted list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Ordered,
    #[default]
    Unordered,
}

/// Type-specific attributes of a block
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_caption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_type: Option<ListType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_author: Option<String>,
}

impl BlockMetadata {
    /// Default metadata for a freshly created (or retyped) block
    pub fn default_for(block_type: BlockType) -> Self {
        match block_type {
            BlockType::Title => Self {
                level: Some(1),
                alignment: Some(Alignment::Left),
                ..Self::default()
            },
            BlockType::Subtitle => Self {
                level: Some(2),
                alignment: Some(Alignment::Left),
                ..Self::default()
            },
            BlockType::Image => Self {
                image_alt: Some(String::new()),
                image_caption: Some(String::new()),
                ..Self::default()
            },
            BlockType::List => Self {
                list_type: Some(ListType::Unordered),
                ..Self::default()
            },
            BlockType::Quote => Self {
                quote_author: Some(String::new()),
                ..Self::default()
            },
            BlockType::Paragraph | BlockType::Unknown => Self::default(),
        }
    }

    /// Apply the fields set in `patch`, leaving the rest untouched
    pub fn merge(&mut self, patch: &MetadataPatch) {
        if let Some(level) = patch.level {
            self.level = Some(level.clamp(1, 6));
        }
        if let Some(alignment) = patch.alignment {
            self.alignment = Some(alignment);
        }
        if let Some(alt) = &patch.image_alt {
            self.image_alt = Some(alt.clone());
        }
        if let Some(caption) = &patch.image_caption {
            self.image_caption = Some(caption.clone());
        }
        if let Some(list_type) = patch.list_type {
            self.list_type = Some(list_type);
        }
        if let Some(author) = &patch.quote_author {
            self.quote_author = Some(author.clone());
        }
    }
}

/// Partial metadata update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataPatch {
    pub level: Option<u8>,
    pub alignment: Option<Alignment>,
    pub image_alt: Option<String>,
    pub image_caption: Option<String>,
    pub list_type: Option<ListType>,
    pub quote_author: Option<String>,
}

/// Partial block update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlockPatch {
    pub content: Option<String>,
    pub metadata: Option<MetadataPatch>,
}

impl BlockPatch {
    /// Patch that only replaces the content
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            metadata: None,
        }
    }

    /// Patch that only touches metadata
    pub fn metadata(metadata: MetadataPatch) -> Self {
        Self {
            content: None,
            metadata: Some(metadata),
        }
    }
}

/// One typed, ordered unit of post content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    #[serde(default)]
    pub content: String,
    pub order: u32,
    #[serde(default)]
    pub metadata: BlockMetadata,
}

impl ContentBlock {
    /// Create an empty block with default metadata and a fresh id
    pub fn new(block_type: BlockType, order: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            block_type,
            content: String::new(),
            order,
            metadata: BlockMetadata::default_for(block_type),
        }
    }

    /// Create a block with content
    pub fn with_content(block_type: BlockType, order: u32, content: impl Into<String>) -> Self {
        let mut block = Self::new(block_type, order);
        block.content = content.into();
        block
    }

    /// Alternative text of an image block, empty when unset
    pub fn image_alt(&self) -> &str {
        self.metadata.image_alt.as_deref().unwrap_or("")
    }

    /// Non-blank lines of a list block, in order
    pub fn list_items(&self) -> Vec<&str> {
        self.content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Restore the dense ordering invariant
///
/// Blocks are stable-sorted by their current `order` and renumbered `1..=N`,
/// so relative order survives and ties keep their slice position.
pub fn renumber(mut blocks: Vec<ContentBlock>) -> Vec<ContentBlock> {
    blocks.sort_by_key(|b| b.order);
    for (i, block) in blocks.iter_mut().enumerate() {
        block.order = i as u32 + 1;
    }
    blocks
}

/// Whether `blocks` satisfies the dense ordering invariant
pub fn is_dense(blocks: &[ContentBlock]) -> bool {
    let mut orders: Vec<u32> = blocks.iter().map(|b| b.order).collect();
    orders.sort_unstable();
    orders
        .iter()
        .enumerate()
        .all(|(i, order)| *order == i as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metadata() {
        let title = BlockMetadata::default_for(BlockType::Title);
        assert_eq!(title.level, Some(1));
        assert_eq!(title.alignment, Some(Alignment::Left));

        let image = BlockMetadata::default_for(BlockType::Image);
        assert_eq!(image.image_alt.as_deref(), Some(""));

        let list = BlockMetadata::default_for(BlockType::List);
        assert_eq!(list.list_type, Some(ListType::Unordered));

        assert_eq!(
            BlockMetadata::default_for(BlockType::Paragraph),
            BlockMetadata::default()
        );
    }

    #[test]
    fn test_block_wire_format() {
        let json = r#"{
            "id": "b1",
            "type": "image",
            "content": "/uploads/a.jpg",
            "order": 3,
            "metadata": { "imageAlt": "Office", "imageCaption": "HQ" }
        }"#;
        let block: ContentBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, BlockType::Image);
        assert_eq!(block.image_alt(), "Office");

        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(value["type"], "image");
        assert_eq!(value["metadata"]["imageCaption"], "HQ");
        assert!(value["metadata"].get("level").is_none());
    }

    #[test]
    fn test_unknown_type_deserializes() {
        let json = r#"{"id":"x","type":"carousel","content":"hi","order":1}"#;
        let block: ContentBlock = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, BlockType::Unknown);
        assert_eq!(block.metadata, BlockMetadata::default());
    }

    #[test]
    fn test_block_type_from_str() {
        assert_eq!("Quote".parse::<BlockType>().unwrap(), BlockType::Quote);
        assert!("unknown".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_merge_metadata() {
        let mut metadata = BlockMetadata::default_for(BlockType::Title);
        metadata.merge(&MetadataPatch {
            level: Some(9),
            ..MetadataPatch::default()
        });
        assert_eq!(metadata.level, Some(6));
        assert_eq!(metadata.alignment, Some(Alignment::Left));
    }

    #[test]
    fn test_renumber_closes_gaps() {
        let blocks = vec![
            ContentBlock::new(BlockType::Paragraph, 7),
            ContentBlock::new(BlockType::Title, 2),
            ContentBlock::new(BlockType::Quote, 4),
        ];
        let blocks = renumber(blocks);
        let types: Vec<_> = blocks.iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![BlockType::Title, BlockType::Quote, BlockType::Paragraph]
        );
        assert!(is_dense(&blocks));
    }

    #[test]
    fn test_list_items_drop_blank_lines() {
        let block = ContentBlock::with_content(BlockType::List, 1, "a\n\n  b \n   \nc");
        assert_eq!(block.list_items(), vec!["a", "b", "c"]);
    }
}
