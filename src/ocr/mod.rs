//! Optical recognition support.
//!
//! Decides whether a page's native text layer is usable and, when it is
//! not, replaces the page content with the output of a [`RecognitionEngine`].

mod detect;
mod dictionary;

pub use detect::{
    alphanumeric_ratio, bad_text_reason, detect_bad_text, BadTextReason, BadTextThresholds,
    OcrPolicy,
};
pub use dictionary::{
    normalize_word, DictionaryProvider, SpellDictionary, WordList, WordListProvider,
};

use crate::error::Result;
use crate::model::{Block, OcrStats};
use crate::parser::{build_blocks, ImageBlockBuilder, PageRef, RawBlock};

/// An optical recognition engine.
pub trait RecognitionEngine: Send + Sync {
    /// Recognize the whole page, returning blocks in unrotated page space.
    fn recognize(
        &self,
        page: &PageRef<'_>,
        language: &str,
        dictionary: Option<&dyn SpellDictionary>,
    ) -> Result<Vec<RawBlock>>;
}

/// Engine that never recognizes anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEngine;

impl RecognitionEngine for NullEngine {
    fn recognize(
        &self,
        _page: &PageRef<'_>,
        _language: &str,
        _dictionary: Option<&dyn SpellDictionary>,
    ) -> Result<Vec<RawBlock>> {
        Ok(Vec::new())
    }
}

/// Recognize a page and build its replacement blocks.
///
/// An engine error is logged and counts as an empty result. The result is
/// kept even when empty. Storage failures while building image blocks are
/// returned.
pub fn recognize_page(
    engine: &dyn RecognitionEngine,
    page: &PageRef<'_>,
    language: &str,
    dictionary: Option<&dyn SpellDictionary>,
    images: &ImageBlockBuilder<'_>,
) -> Result<(Vec<Block>, OcrStats)> {
    let raw = match engine.recognize(page, language, dictionary) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Recognition failed on page {}: {}", page.index, e);
            Vec::new()
        }
    };

    let blocks = build_blocks(&raw, &page.info, page.index, images)?;
    if blocks.is_empty() {
        log::warn!("Recognition produced no blocks on page {}", page.index);
    }
    let stats = OcrStats::attempted(blocks.len());
    Ok((blocks, stats))
}
