//! Conversion options and configuration.

use crate::error::{Error, Result};
use crate::ocr::BadTextThresholds;

/// Default vertical band tolerance for rotated-page reflow.
pub const DEFAULT_REFLOW_TOLERANCE: f32 = 1.25;

/// Options for converting a document.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Recognition language (Tesseract code, e.g. "eng")
    pub ocr_language: String,

    /// Spelling dictionary language (e.g. "en"); `None` disables the
    /// dictionary check of the bad-text heuristic
    pub spell_language: Option<String>,

    /// Convert at most this many pages
    pub max_pages: Option<usize>,

    /// Page worker count (1 = sequential)
    pub parallel: usize,

    /// Pages at or below this index are never recognized
    pub min_ocr_page: usize,

    /// Recognize every page, bypassing the heuristic and page gate
    pub ocr_all_pages: bool,

    /// Never recognize (the all-pages override still wins)
    pub disable_ocr: bool,

    /// Band tolerance for rotated-page reflow
    pub reflow_tolerance: f32,

    /// Thresholds of the bad-text heuristic
    pub heuristics: BadTextThresholds,
}

impl ConvertOptions {
    /// Create new conversion options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set recognition language.
    pub fn with_ocr_language(mut self, language: impl Into<String>) -> Self {
        self.ocr_language = language.into();
        self
    }

    /// Set spelling dictionary language.
    pub fn with_spell_language(mut self, language: impl Into<String>) -> Self {
        self.spell_language = Some(language.into());
        self
    }

    /// Limit the number of converted pages.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Set page worker count.
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.parallel = parallel;
        self
    }

    /// Process pages on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.parallel = 1;
        self
    }

    /// Set the minimum page index eligible for recognition (exclusive).
    pub fn with_min_ocr_page(mut self, page: usize) -> Self {
        self.min_ocr_page = page;
        self
    }

    /// Force recognition of every page.
    pub fn with_ocr_all_pages(mut self, all: bool) -> Self {
        self.ocr_all_pages = all;
        self
    }

    /// Disable recognition.
    pub fn without_ocr(mut self) -> Self {
        self.disable_ocr = true;
        self
    }

    /// Set reflow band tolerance.
    pub fn with_reflow_tolerance(mut self, tolerance: f32) -> Self {
        self.reflow_tolerance = tolerance;
        self
    }

    /// Set bad-text heuristic thresholds.
    pub fn with_heuristics(mut self, heuristics: BadTextThresholds) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Number of pages to convert for a document of `page_count` pages.
    pub fn page_limit(&self, page_count: usize) -> usize {
        match self.max_pages {
            Some(max) => max.min(page_count),
            None => page_count,
        }
    }

    /// Check option values.
    pub fn validate(&self) -> Result<()> {
        if self.parallel == 0 {
            return Err(Error::Config("parallel must be at least 1".to_string()));
        }
        if !(self.reflow_tolerance.is_finite() && self.reflow_tolerance > 0.0) {
            return Err(Error::Config(format!(
                "reflow tolerance must be positive, got {}",
                self.reflow_tolerance
            )));
        }
        if self.ocr_language.trim().is_empty() {
            return Err(Error::Config("OCR language must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            ocr_language: "eng".to_string(),
            spell_language: None,
            max_pages: None,
            parallel: 2,
            min_ocr_page: 2,
            ocr_all_pages: false,
            disable_ocr: false,
            reflow_tolerance: DEFAULT_REFLOW_TOLERANCE,
            heuristics: BadTextThresholds::default(),
        }
    }
}
