//! Content renderer
//!
//! Maps a block list to display nodes and then to HTML. Rendering never
//! fails: blocks of unknown type fall back to plain text.

use super::block::{Alignment, BlockType, ContentBlock, ListType};
use crate::helpers::{self, MediaUrls};

/// Default reading speed
pub const WORDS_PER_MINUTE: usize = 200;

/// One rendered unit of post content
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Heading {
        level: u8,
        alignment: Alignment,
        text: String,
    },
    Paragraph(String),
    Figure {
        src: String,
        alt: String,
        caption: Option<String>,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Quote {
        text: String,
        author: Option<String>,
    },
    Text(String),
}

impl Node {
    /// Render this node as an HTML fragment
    pub fn to_html(&self) -> String {
        match self {
            Node::Heading {
                level,
                alignment,
                text,
            } => helpers::heading(*level, alignment.as_str(), text),
            Node::Paragraph(text) => helpers::paragraph(text),
            Node::Figure { src, alt, caption } => helpers::figure(src, alt, caption.as_deref()),
            Node::List { ordered, items } => helpers::list(*ordered, items),
            Node::Quote { text, author } => helpers::blockquote(text, author.as_deref()),
            Node::Text(text) => helpers::html_escape(text),
        }
    }
}

/// Renders block lists for the public post page
#[derive(Debug, Clone)]
pub struct ContentRenderer {
    urls: MediaUrls,
}

impl ContentRenderer {
    /// Create a renderer resolving image sources through `urls`
    pub fn new(urls: MediaUrls) -> Self {
        Self { urls }
    }

    /// Map blocks to display nodes, in `order` sequence
    pub fn render(&self, blocks: &[ContentBlock]) -> Vec<Node> {
        let mut sorted: Vec<&ContentBlock> = blocks.iter().collect();
        sorted.sort_by_key(|b| b.order);
        sorted.into_iter().map(|b| self.render_block(b)).collect()
    }

    /// Render blocks straight to HTML
    pub fn render_html(&self, blocks: &[ContentBlock]) -> String {
        self.render(blocks)
            .iter()
            .map(Node::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_block(&self, block: &ContentBlock) -> Node {
        let metadata = &block.metadata;
        match block.block_type {
            BlockType::Title | BlockType::Subtitle => {
                let fallback = if block.block_type == BlockType::Title {
                    1
                } else {
                    2
                };
                Node::Heading {
                    level: metadata.level.unwrap_or(fallback).clamp(1, 6),
                    alignment: metadata.alignment.unwrap_or_default(),
                    text: block.content.clone(),
                }
            }
            BlockType::Paragraph => Node::Paragraph(block.content.clone()),
            BlockType::Image => Node::Figure {
                src: self.urls.resolve(&block.content),
                alt: block.image_alt().to_string(),
                caption: non_empty(metadata.image_caption.as_deref()),
            },
            BlockType::List => Node::List {
                ordered: metadata.list_type == Some(ListType::Ordered),
                items: block.list_items().into_iter().map(String::from).collect(),
            },
            BlockType::Quote => Node::Quote {
                text: block.content.clone(),
                author: non_empty(metadata.quote_author.as_deref()),
            },
            BlockType::Unknown => Node::Text(block.content.clone()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Count whitespace-delimited words across all block contents
pub fn word_count(blocks: &[ContentBlock]) -> usize {
    blocks
        .iter()
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .count()
}

/// Estimated reading time in whole minutes, never less than one
pub fn reading_time(blocks: &[ContentBlock], words_per_minute: usize) -> usize {
    let words = word_count(blocks);
    let wpm = words_per_minute.max(1);
    words.div_ceil(wpm).max(1)
}
