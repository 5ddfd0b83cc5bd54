//! Document conversion driver.
//!
//! A [`Converter`] owns the collaborators of a conversion (recognition
//! engine, object store, optional dictionaries) and runs the page pipeline
//! over a document, sequentially or on a dedicated worker pool.
//!
//! # Example
//!
//! ```no_run
//! use unscan::convert::Converter;
//! use unscan::ocr::NullEngine;
//! use unscan::parser::{ConvertOptions, DumpDocument};
//! use unscan::storage::DirectoryStore;
//!
//! fn main() -> unscan::Result<()> {
//!     let dump = DumpDocument::from_path("document.json")?;
//!     let converter = Converter::builder()
//!         .engine(NullEngine)
//!         .store(DirectoryStore::new("assets"))
//!         .options(ConvertOptions::default().with_parallel(4))
//!         .build()?;
//!
//!     let conversion = converter.convert(&dump)?;
//!     println!("{} pages, {:?}", conversion.page_count(), conversion.ocr_stats);
//!     Ok(())
//! }
//! ```

mod page;

pub use page::PagePipeline;

use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Conversion, OcrStats, Page};
use crate::ocr::{DictionaryProvider, OcrPolicy, RecognitionEngine};
use crate::parser::{ConvertOptions, PdfSource};
use crate::storage::ObjectStore;

/// Builder for [`Converter`].
#[derive(Default)]
pub struct ConverterBuilder {
    engine: Option<Arc<dyn RecognitionEngine>>,
    store: Option<Arc<dyn ObjectStore>>,
    dictionaries: Option<Arc<dyn DictionaryProvider>>,
    options: ConvertOptions,
}

impl ConverterBuilder {
    /// Set the recognition engine.
    pub fn engine<E: RecognitionEngine + 'static>(self, engine: E) -> Self {
        self.shared_engine(Arc::new(engine))
    }

    /// Set a recognition engine shared with other owners.
    pub fn shared_engine(mut self, engine: Arc<dyn RecognitionEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Set the object store receiving images.
    pub fn store<S: ObjectStore + 'static>(self, store: S) -> Self {
        self.shared_store(Arc::new(store))
    }

    /// Set an object store shared with other owners.
    pub fn shared_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the spelling dictionary provider.
    pub fn dictionaries<P: DictionaryProvider + 'static>(self, provider: P) -> Self {
        self.shared_dictionaries(Arc::new(provider))
    }

    pub fn shared_dictionaries(mut self, provider: Arc<dyn DictionaryProvider>) -> Self {
        self.dictionaries = Some(provider);
        self
    }

    pub fn options(mut self, options: ConvertOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the converter.
    ///
    /// Fails with [`Error::NotReady`] when the engine or the store is
    /// missing and with [`Error::Config`] for invalid options.
    pub fn build(self) -> Result<Converter> {
        let engine = self.engine.ok_or(Error::NotReady("recognition engine"))?;
        let store = self.store.ok_or(Error::NotReady("object store"))?;
        self.options.validate()?;
        if self.options.spell_language.is_some() && self.dictionaries.is_none() {
            log::warn!("Spell language set without a dictionary provider; dictionary check disabled");
        }

        Ok(Converter {
            engine,
            store,
            dictionaries: self.dictionaries,
            options: self.options,
        })
    }
}

/// Converts documents into pages of structured blocks.
pub struct Converter {
    engine: Arc<dyn RecognitionEngine>,
    store: Arc<dyn ObjectStore>,
    dictionaries: Option<Arc<dyn DictionaryProvider>>,
    options: ConvertOptions,
}

impl Converter {
    pub fn builder() -> ConverterBuilder {
        ConverterBuilder::default()
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// The store holding the images of converted documents.
    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    /// Convert a document.
    ///
    /// Pages `[0, min(max_pages, page_count))` are converted and returned in
    /// page order. With `parallel == 1` pages run on the calling thread,
    /// otherwise on a pool of `parallel` workers. Every page runs to
    /// completion; the first failing page (in page order) fails the whole
    /// conversion.
    pub fn convert(&self, source: &dyn PdfSource) -> Result<Conversion> {
        let options = &self.options;
        options.validate()?;

        let page_count = source.page_count();
        let limit = options.page_limit(page_count);
        let no_text = source.naive_text()?.trim().is_empty();
        if no_text {
            log::debug!("{}: no extractable text", source.name());
        }

        let policy = OcrPolicy {
            document_has_no_text: no_text,
            min_ocr_page: options.min_ocr_page,
            total_pages: page_count,
            ocr_all_pages: options.ocr_all_pages,
            disable_ocr: options.disable_ocr,
        };
        let pipeline = PagePipeline::new(
            source,
            self.engine.as_ref(),
            self.store.as_ref(),
            options,
            policy,
        )
        .with_dictionaries(self.dictionaries.as_deref());

        let results: Vec<Result<(Page, OcrStats)>> = if options.parallel == 1 {
            (0..limit).map(|index| pipeline.run(index)).collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.parallel)
                .build()
                .map_err(|e| Error::Other(format!("Failed to create thread pool: {}", e)))?;
            pool.install(|| {
                (0..limit)
                    .into_par_iter()
                    .map(|index| pipeline.run(index))
                    .collect::<Vec<_>>()
            })
        };

        let mut pages = Vec::with_capacity(limit);
        let mut ocr_stats = OcrStats::none();
        for result in results {
            let (page, stats) = result?;
            pages.push(page);
            ocr_stats += stats;
        }

        let toc = source.outline()?;
        log::info!(
            "{}: converted {} of {} pages (OCR attempted {}, succeeded {}, failed {})",
            source.name(),
            pages.len(),
            page_count,
            ocr_stats.pages_ocr_attempted,
            ocr_stats.ocr_success,
            ocr_stats.ocr_failed
        );

        Ok(Conversion {
            pages,
            toc,
            ocr_stats,
        })
    }
}
