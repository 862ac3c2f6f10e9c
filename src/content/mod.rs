//! Content module - content blocks, the block editor, posts and rendering

mod block;
mod editor;
mod post;
mod render;

pub use block::{
    is_dense, renumber, Alignment, BlockMetadata, BlockPatch, BlockType, ContentBlock, ListType,
    MetadataPatch,
};
pub use editor::{BlockEditor, Direction};
pub use post::{Post, PostDraft, PostStatus, PostSummary};
pub use render::{reading_time, word_count, ContentRenderer, Node, WORDS_PER_MINUTE};
