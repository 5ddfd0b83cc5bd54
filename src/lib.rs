//! # unscan
//!
//! Page pipeline for turning PDF pages into structured text and image
//! blocks, with adaptive optical recognition.
//!
//! Native page content comes from a [`parser::PdfSource`]. For every page the
//! pipeline decides whether the native text layer is trustworthy; when it
//! is not, the page content is replaced by the output of a
//! [`ocr::RecognitionEngine`]. Page rotation is normalized, hyperlinks are
//! anchored to the spans they cover and rotated pages are put back into
//! reading order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use unscan::storage::DirectoryStore;
//! use unscan::Unscan;
//!
//! fn main() -> unscan::Result<()> {
//!     let store = Arc::new(DirectoryStore::new("./assets"));
//!     let result = Unscan::new()
//!         .with_parallel(4)
//!         .with_min_ocr_page(0)
//!         .convert_dump("document.json", store)?;
//!
//!     println!("{}", result.to_text()?);
//!     println!("{:?}", result.ocr_stats());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Rotation handling**: rectangles mapped into the displayed page frame
//! - **OCR decision**: bad-text heuristic with optional spelling dictionary
//! - **Image upload**: embedded images persisted through an object store
//! - **Link anchoring**: link annotations attached to the covered spans
//! - **Parallel processing**: pages converted on a Rayon worker pool

pub mod convert;
pub mod error;
pub mod model;
pub mod ocr;
pub mod parser;
pub mod render;
pub mod storage;

// Re-export commonly used types
pub use convert::{Converter, ConverterBuilder, PagePipeline};
pub use error::{Error, Result};
pub use model::{
    AssetRef, BBox, Block, Conversion, Font, FontStyle, Line, OcrStats, Outline, OutlineItem,
    Page, Rotation, Span, SpanContent,
};
pub use ocr::{
    BadTextThresholds, DictionaryProvider, NullEngine, RecognitionEngine, SpellDictionary,
    WordListProvider,
};
pub use parser::{ConvertOptions, DumpDocument, PdfSource, ReplayEngine};
pub use render::{JsonFormat, PageSelection, RenderOptions};
pub use storage::{DirectoryStore, MemoryStore, ObjectStore};

use std::path::Path;
use std::sync::Arc;

/// Load a JSON document dump.
///
/// # Example
///
/// ```no_run
/// use unscan::{load_dump, PdfSource};
///
/// let dump = load_dump("document.json").unwrap();
/// println!("Pages: {}", dump.page_count());
/// ```
pub fn load_dump<P: AsRef<Path>>(path: P) -> Result<DumpDocument> {
    DumpDocument::from_path(path)
}

/// Convert a document with explicit collaborators.
///
/// # Arguments
///
/// * `source` - The document
/// * `engine` - Recognition engine for pages whose text layer is unusable
/// * `store` - Object store receiving embedded images
/// * `options` - Conversion options
pub fn convert_document<E>(
    source: &dyn PdfSource,
    engine: E,
    store: Arc<dyn ObjectStore>,
    options: ConvertOptions,
) -> Result<Conversion>
where
    E: RecognitionEngine + 'static,
{
    Converter::builder()
        .engine(engine)
        .shared_store(store)
        .options(options)
        .build()?
        .convert(source)
}

/// Builder-style API for conversion.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use unscan::{MemoryStore, Unscan};
///
/// let text = Unscan::new()
///     .sequential()
///     .with_max_pages(10)
///     .without_ocr()
///     .convert_dump("document.json", Arc::new(MemoryStore::new()))?
///     .to_text()?;
/// # Ok::<(), unscan::Error>(())
/// ```
pub struct Unscan {
    convert_options: ConvertOptions,
    render_options: RenderOptions,
    dictionaries: Option<Arc<dyn DictionaryProvider>>,
}

impl Unscan {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            convert_options: ConvertOptions::default(),
            render_options: RenderOptions::default(),
            dictionaries: None,
        }
    }

    /// Set the page worker count.
    pub fn with_parallel(mut self, parallel: usize) -> Self {
        self.convert_options = self.convert_options.with_parallel(parallel);
        self
    }

    /// Convert pages on the calling thread.
    pub fn sequential(mut self) -> Self {
        self.convert_options = self.convert_options.sequential();
        self
    }

    /// Convert at most `max_pages` pages.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.convert_options = self.convert_options.with_max_pages(max_pages);
        self
    }

    /// Set the recognition language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.convert_options = self.convert_options.with_ocr_language(language);
        self
    }

    /// Check native text against word lists of `language` found in `dir`.
    pub fn with_word_lists(
        mut self,
        dir: impl Into<std::path::PathBuf>,
        language: impl Into<String>,
    ) -> Self {
        self.dictionaries = Some(Arc::new(WordListProvider::new(dir)));
        self.convert_options = self.convert_options.with_spell_language(language);
        self
    }

    /// Never recognize pages at or below this index.
    pub fn with_min_ocr_page(mut self, page: usize) -> Self {
        self.convert_options = self.convert_options.with_min_ocr_page(page);
        self
    }

    /// Recognize every page.
    pub fn ocr_all_pages(mut self) -> Self {
        self.convert_options = self.convert_options.with_ocr_all_pages(true);
        self
    }

    /// Keep native text on every page.
    pub fn without_ocr(mut self) -> Self {
        self.convert_options = self.convert_options.without_ocr();
        self
    }

    /// Set page selection for rendering.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.render_options = self.render_options.with_pages(pages);
        self
    }

    /// Set all conversion options at once.
    pub fn with_options(mut self, options: ConvertOptions) -> Self {
        self.convert_options = options;
        self
    }

    /// Convert `source`, recognizing pages with `engine`.
    pub fn convert<E>(
        self,
        source: &dyn PdfSource,
        engine: E,
        store: Arc<dyn ObjectStore>,
    ) -> Result<UnscanResult>
    where
        E: RecognitionEngine + 'static,
    {
        let mut builder = Converter::builder()
            .engine(engine)
            .shared_store(Arc::clone(&store))
            .options(self.convert_options);
        if let Some(dictionaries) = self.dictionaries {
            builder = builder.shared_dictionaries(dictionaries);
        }

        let conversion = builder.build()?.convert(source)?;
        Ok(UnscanResult {
            conversion,
            store,
            render_options: self.render_options,
        })
    }

    /// Convert a dump file, replaying its recorded recognition output.
    pub fn convert_dump<P: AsRef<Path>>(
        self,
        path: P,
        store: Arc<dyn ObjectStore>,
    ) -> Result<UnscanResult> {
        let dump = load_dump(path)?;
        let engine = ReplayEngine::from_dump(&dump);
        self.convert(&dump, engine, store)
    }
}

impl Default for Unscan {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a conversion, with the store holding its images.
pub struct UnscanResult {
    /// The converted pages
    pub conversion: Conversion,
    store: Arc<dyn ObjectStore>,
    render_options: RenderOptions,
}

impl UnscanResult {
    /// Render as text with links and image references.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.conversion, self.store.as_ref(), &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.conversion, format)
    }

    pub fn ocr_stats(&self) -> OcrStats {
        self.conversion.ocr_stats
    }

    /// Get the conversion.
    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{DumpPage, PageInfo};

    #[test]
    fn test_unscan_builder() {
        let unscan = Unscan::new()
            .sequential()
            .with_max_pages(3)
            .with_language("deu")
            .with_word_lists("/usr/share/unscan", "de")
            .without_ocr();

        assert_eq!(unscan.convert_options.parallel, 1);
        assert_eq!(unscan.convert_options.max_pages, Some(3));
        assert_eq!(unscan.convert_options.ocr_language, "deu");
        assert_eq!(unscan.convert_options.spell_language.as_deref(), Some("de"));
        assert!(unscan.convert_options.disable_ocr);
        assert!(unscan.dictionaries.is_some());
    }

    #[test]
    fn test_load_dump_missing_file() {
        assert!(matches!(
            load_dump("/nonexistent/unscan/dump.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_convert_dump_file() {
        let mut dump = DumpDocument::new("empty.pdf");
        dump.add_page(DumpPage::new(PageInfo::default()));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        dump.save(&path).unwrap();

        let result = Unscan::new()
            .sequential()
            .convert_dump(&path, Arc::new(MemoryStore::new()))
            .unwrap();
        assert_eq!(result.conversion().page_count(), 1);
        assert_eq!(result.ocr_stats(), OcrStats::none());
        assert_eq!(result.to_text().unwrap(), "");
    }

    #[test]
    fn test_convert_document_zero_parallel() {
        let dump = DumpDocument::new("empty.pdf");
        let options = ConvertOptions::default().with_parallel(0);
        let result = convert_document(&dump, NullEngine, Arc::new(MemoryStore::new()), options);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
