//! Page-level types.

use super::{BBox, Line, Rotation};
use serde::{Deserialize, Serialize};

/// A block of lines on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Lines in source order
    pub lines: Vec<Line>,

    /// Canonical bounding box
    pub bbox: BBox,

    /// Page index the block was extracted from (0-indexed)
    pub page: usize,
}

impl Block {
    /// Create a new block.
    pub fn new(lines: Vec<Line>, bbox: BBox, page: usize) -> Self {
        Self { lines, bbox, page }
    }

    /// Lines joined with newlines.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if this block holds a single image span.
    pub fn is_image(&self) -> bool {
        matches!(self.lines.as_slice(), [line] if matches!(line.spans.as_slice(), [span] if span.is_image()))
    }

    /// Iterate over all spans of the block.
    pub fn spans(&self) -> impl Iterator<Item = &super::Span> {
        self.lines.iter().flat_map(|line| line.spans.iter())
    }
}

/// A single page of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page index (0-indexed)
    pub number: usize,

    /// Displayed page rectangle
    pub bbox: BBox,

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: Rotation,

    /// Content blocks on the page
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(number: usize, bbox: BBox, rotation: Rotation) -> Self {
        Self {
            number,
            bbox,
            rotation,
            blocks: Vec::new(),
        }
    }

    /// Create a page with the given blocks.
    pub fn with_blocks(number: usize, bbox: BBox, rotation: Rotation, blocks: Vec<Block>) -> Self {
        Self {
            number,
            bbox,
            rotation,
            blocks,
        }
    }

    /// Text used to judge whether native extraction is usable.
    ///
    /// Blocks are joined with newlines; image spans contribute nothing.
    pub fn prelim_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the page is empty (no content blocks).
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of image blocks on the page.
    pub fn image_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_image()).count()
    }
}
