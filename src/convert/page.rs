//! Per-page conversion pipeline.

use crate::error::Result;
use crate::model::{OcrStats, Page};
use crate::ocr::{recognize_page, DictionaryProvider, OcrPolicy, RecognitionEngine, SpellDictionary};
use crate::parser::{
    attach_links, build_blocks, document_token, reflow_blocks, ConvertOptions, ImageBlockBuilder,
    PageRef, PdfSource,
};
use crate::storage::ObjectStore;

/// Converts single pages of one document.
///
/// Stages run in a fixed order: native extraction, the OCR decision,
/// optional recognition, link attachment, reflow of rotated pages.
pub struct PagePipeline<'a> {
    source: &'a dyn PdfSource,
    engine: &'a dyn RecognitionEngine,
    store: &'a dyn ObjectStore,
    dictionaries: Option<&'a dyn DictionaryProvider>,
    options: &'a ConvertOptions,
    policy: OcrPolicy,
    document_token: String,
}

impl<'a> PagePipeline<'a> {
    /// Create a pipeline. Every page it runs stores its images under the
    /// same freshly generated document token.
    pub fn new(
        source: &'a dyn PdfSource,
        engine: &'a dyn RecognitionEngine,
        store: &'a dyn ObjectStore,
        options: &'a ConvertOptions,
        policy: OcrPolicy,
    ) -> Self {
        Self {
            source,
            engine,
            store,
            dictionaries: None,
            options,
            policy,
            document_token: document_token(source.name()),
        }
    }

    pub fn with_dictionaries(mut self, provider: Option<&'a dyn DictionaryProvider>) -> Self {
        self.dictionaries = provider;
        self
    }

    /// Storage prefix of this conversion's images.
    pub fn document_token(&self) -> &str {
        &self.document_token
    }

    /// Convert page `index`, returning the page and its OCR counters.
    pub fn run(&self, index: usize) -> Result<(Page, OcrStats)> {
        let page_ref = PageRef::new(self.source, index)?;
        let info = page_ref.info;
        let images = ImageBlockBuilder::new(self.store, self.document_token.as_str());
        let dictionary = self.load_dictionary()?;
        let dictionary = dictionary.as_deref();

        let raw = self.source.page_content(index)?;
        let blocks = build_blocks(&raw, &info, index, &images)?;
        let mut page = Page::with_blocks(index, info.bbox(), info.rotation, blocks);

        let prelim_text = page.prelim_text();
        let mut stats = OcrStats::none();
        if self
            .policy
            .should_ocr(index, &prelim_text, dictionary, &self.options.heuristics)
        {
            log::debug!(
                "Page {}: recognizing ({} native blocks discarded)",
                index,
                page.block_count()
            );
            let (blocks, delta) = recognize_page(
                self.engine,
                &page_ref,
                &self.options.ocr_language,
                dictionary,
                &images,
            )?;
            page.blocks = blocks;
            stats = delta;
        } else {
            log::debug!("Page {}: keeping {} native blocks", index, page.block_count());
        }

        let links = self.source.page_links(index)?;
        let attached = attach_links(
            &mut page.blocks,
            links
                .iter()
                .map(|link| (info.correct(link.rect), link.uri.as_str())),
        );
        if attached < links.len() {
            log::debug!(
                "Page {}: {} of {} links had no target span",
                index,
                links.len() - attached,
                links.len()
            );
        }

        if info.rotation.is_rotated() {
            let blocks = std::mem::take(&mut page.blocks);
            page.blocks = reflow_blocks(blocks, self.options.reflow_tolerance);
        }

        Ok((page, stats))
    }

    fn load_dictionary(&self) -> Result<Option<Box<dyn SpellDictionary>>> {
        match (self.dictionaries, self.options.spell_language.as_deref()) {
            (Some(provider), Some(language)) => provider.load(language).map(Some),
            _ => Ok(None),
        }
    }
}
