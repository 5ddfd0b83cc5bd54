//! Document-level types.

use super::Page;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Result of converting a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversion {
    /// Pages, in page-index order
    pub pages: Vec<Page>,

    /// Document outline (table of contents)
    pub toc: Outline,

    /// Aggregate recognition statistics
    pub ocr_stats: OcrStats,
}

impl Conversion {
    /// Get the number of converted pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by index.
    pub fn get_page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    /// Check if the conversion produced any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// OCR counters for one page or a whole document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrStats {
    /// Pages that were sent to the recognition engine
    pub pages_ocr_attempted: u32,

    /// Recognized pages that produced at least one block
    pub ocr_success: u32,

    /// Recognized pages that produced nothing
    pub ocr_failed: u32,
}

impl OcrStats {
    /// Delta for a page that was not recognized.
    pub fn none() -> Self {
        Self::default()
    }

    /// Delta for a recognized page that produced `block_count` blocks.
    pub fn attempted(block_count: usize) -> Self {
        let success = block_count > 0;
        Self {
            pages_ocr_attempted: 1,
            ocr_success: u32::from(success),
            ocr_failed: u32::from(!success),
        }
    }
}

impl Add for OcrStats {
    type Output = OcrStats;

    fn add(self, rhs: OcrStats) -> OcrStats {
        OcrStats {
            pages_ocr_attempted: self.pages_ocr_attempted + rhs.pages_ocr_attempted,
            ocr_success: self.ocr_success + rhs.ocr_success,
            ocr_failed: self.ocr_failed + rhs.ocr_failed,
        }
    }
}

impl AddAssign for OcrStats {
    fn add_assign(&mut self, rhs: OcrStats) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for OcrStats {
    fn sum<I: Iterator<Item = OcrStats>>(iter: I) -> Self {
        iter.fold(OcrStats::default(), Add::add)
    }
}

/// Document outline (bookmarks/table of contents).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Top-level outline items
    pub items: Vec<OutlineItem>,
}

impl Outline {
    /// Create a new empty outline.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add an item to the outline.
    pub fn add_item(&mut self, item: OutlineItem) {
        self.items.push(item);
    }

    /// Check if the outline is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the total number of items (including nested).
    pub fn total_items(&self) -> usize {
        fn count_items(items: &[OutlineItem]) -> usize {
            items
                .iter()
                .map(|item| 1 + count_items(&item.children))
                .sum()
        }
        count_items(&self.items)
    }
}

/// A single outline item (bookmark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineItem {
    /// Item title
    pub title: String,

    /// Target page index (0-indexed)
    pub page: Option<usize>,

    /// Nesting level (0 = top level)
    pub level: u8,

    /// Child items
    #[serde(default)]
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    /// Create a new outline item.
    pub fn new(title: impl Into<String>, page: Option<usize>, level: u8) -> Self {
        Self {
            title: title.into(),
            page,
            level,
            children: Vec::new(),
        }
    }

    /// Add a child item.
    pub fn add_child(&mut self, child: OutlineItem) {
        self.children.push(child);
    }
}
