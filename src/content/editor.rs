//! Block editor controller
//!
//! In-memory CRUD over a post's content blocks. Every mutating operation
//! goes through [`renumber`], so callers never see gaps or duplicate orders.

use super::block::{renumber, BlockMetadata, BlockPatch, BlockType, ContentBlock};
use crate::error::{Result, ValidationError};

/// Direction for [`BlockEditor::move_block`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Editor state for one post body
#[derive(Debug, Clone, Default)]
pub struct BlockEditor {
    blocks: Vec<ContentBlock>,
    /// Block currently in edit mode
    editing: Option<String>,
}

impl BlockEditor {
    /// Create an editor for a new, empty post
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate an editor from blocks loaded from the API
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self {
            blocks: renumber(blocks),
            editing: None,
        }
    }

    /// Blocks in render order
    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    /// Consume the editor, yielding the submit payload
    pub fn into_blocks(self) -> Vec<ContentBlock> {
        self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Look up a block by id
    pub fn get(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Id of the block in edit mode, if any
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Enter edit mode on a block
    pub fn start_editing(&mut self, id: &str) -> Result<()> {
        self.position(id)?;
        self.editing = Some(id.to_string());
        Ok(())
    }

    /// Leave edit mode
    pub fn stop_editing(&mut self) {
        self.editing = None;
    }

    /// Insert a new empty block of `block_type`
    ///
    /// With `after_order` the block lands at `after_order + 1` and later
    /// blocks shift down; otherwise it is appended. The new block enters edit
    /// mode and its id is returned. [`BlockType::Unknown`] is refused.
    pub fn add_block(
        &mut self,
        block_type: BlockType,
        after_order: Option<u32>,
    ) -> Result<String> {
        ensure_editable(block_type)?;
        let order = match after_order {
            Some(after) => {
                for block in self.blocks.iter_mut().filter(|b| b.order > after) {
                    block.order += 1;
                }
                after + 1
            }
            None => self.blocks.iter().map(|b| b.order).max().unwrap_or(0) + 1,
        };

        let block = ContentBlock::new(block_type, order);
        let id = block.id.clone();
        tracing::debug!("Adding {} block {} at order {}", block_type, id, order);

        let mut blocks = std::mem::take(&mut self.blocks);
        blocks.push(block);
        self.blocks = renumber(blocks);
        self.editing = Some(id.clone());
        Ok(id)
    }

    /// Switch a block to another type, discarding its content and metadata
    pub fn change_block_type(&mut self, id: &str, new_type: BlockType) -> Result<()> {
        ensure_editable(new_type)?;
        let idx = self.position(id)?;
        let block = &mut self.blocks[idx];
        block.block_type = new_type;
        block.content.clear();
        block.metadata = BlockMetadata::default_for(new_type);
        self.editing = Some(id.to_string());
        Ok(())
    }

    /// Shallow-merge content and metadata changes into a block
    pub fn update_block(&mut self, id: &str, patch: BlockPatch) -> Result<()> {
        let idx = self.position(id)?;
        let block = &mut self.blocks[idx];
        if let Some(content) = patch.content {
            block.content = content;
        }
        if let Some(metadata) = &patch.metadata {
            block.metadata.merge(metadata);
        }
        Ok(())
    }

    /// Delete a block and close the gap it leaves
    pub fn remove_block(&mut self, id: &str) -> Result<ContentBlock> {
        let idx = self.position(id)?;
        let mut blocks = std::mem::take(&mut self.blocks);
        let removed = blocks.remove(idx);
        self.blocks = renumber(blocks);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        Ok(removed)
    }

    /// Swap a block with its neighbour; no-op at either end
    pub fn move_block(&mut self, id: &str, direction: Direction) -> Result<()> {
        let idx = self.position(id)?;
        let neighbour = match direction {
            Direction::Up if idx > 0 => idx - 1,
            Direction::Down if idx + 1 < self.blocks.len() => idx + 1,
            _ => return Ok(()),
        };

        let order = self.blocks[idx].order;
        self.blocks[idx].order = self.blocks[neighbour].order;
        self.blocks[neighbour].order = order;

        let blocks = std::mem::take(&mut self.blocks);
        self.blocks = renumber(blocks);
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.blocks
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| ValidationError::BlockNotFound(id.to_string()).into())
    }
}

fn ensure_editable(block_type: BlockType) -> Result<()> {
    if BlockType::EDITABLE.contains(&block_type) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedBlockType(block_type.to_string()).into())
    }
}
