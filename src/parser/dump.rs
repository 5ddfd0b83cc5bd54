//! JSON document dumps.
//!
//! A dump is the raw per-page content of a document as produced by an
//! external PDF extractor, optionally with the recognizer's output for each
//! page. Dumps make a document convertible without linking a PDF library.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Outline, Rotation};
use crate::ocr::{RecognitionEngine, SpellDictionary};

use super::backend::{LinkAnnotation, PageInfo, PageRef, PdfSource, RawBlock};

/// One page of a dump.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DumpPage {
    /// Unrotated page width in points
    pub width: f32,
    /// Unrotated page height in points
    pub height: f32,
    #[serde(default)]
    pub rotation: Rotation,
    /// Native content in unrotated page space
    #[serde(default)]
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub links: Vec<LinkAnnotation>,
    /// Pre-recognized content, served by [`ReplayEngine`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<Vec<RawBlock>>,
}

impl DumpPage {
    pub fn new(info: PageInfo) -> Self {
        Self {
            width: info.width,
            height: info.height,
            rotation: info.rotation,
            blocks: Vec::new(),
            links: Vec::new(),
            ocr: None,
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<RawBlock>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn with_links(mut self, links: Vec<LinkAnnotation>) -> Self {
        self.links = links;
        self
    }

    pub fn with_ocr(mut self, blocks: Vec<RawBlock>) -> Self {
        self.ocr = Some(blocks);
        self
    }

    pub fn info(&self) -> PageInfo {
        PageInfo::new(self.width, self.height, self.rotation)
    }
}

/// A whole document dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DumpDocument {
    /// Source file name
    pub name: String,
    #[serde(default)]
    pub pages: Vec<DumpPage>,
    #[serde(default)]
    pub outline: Outline,
}

impl DumpDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_page(&mut self, page: DumpPage) {
        self.pages.push(page);
    }

    /// Parse a dump from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let dump: Self = serde_json::from_str(json)?;
        dump.validate()?;
        Ok(dump)
    }

    /// Parse a dump from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let dump: Self = serde_json::from_reader(reader)?;
        dump.validate()?;
        Ok(dump)
    }

    /// Read a dump file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the dump to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        for (index, page) in self.pages.iter().enumerate() {
            let valid = page.width.is_finite()
                && page.height.is_finite()
                && page.width > 0.0
                && page.height > 0.0;
            if !valid {
                return Err(Error::Config(format!(
                    "page {} has invalid size {}x{}",
                    index, page.width, page.height
                )));
            }
        }
        Ok(())
    }

    fn page(&self, index: usize) -> Result<&DumpPage> {
        self.pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }
}

impl PdfSource for DumpDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_info(&self, index: usize) -> Result<PageInfo> {
        Ok(self.page(index)?.info())
    }

    fn page_content(&self, index: usize) -> Result<Vec<RawBlock>> {
        Ok(self.page(index)?.blocks.clone())
    }

    fn page_links(&self, index: usize) -> Result<Vec<LinkAnnotation>> {
        Ok(self.page(index)?.links.clone())
    }

    fn outline(&self) -> Result<Outline> {
        Ok(self.outline.clone())
    }
}

/// Recognition engine that replays the `ocr` blocks stored in a dump.
///
/// Pages without stored blocks fail recognition.
#[derive(Debug, Clone, Default)]
pub struct ReplayEngine {
    pages: Vec<Option<Vec<RawBlock>>>,
}

impl ReplayEngine {
    pub fn from_dump(dump: &DumpDocument) -> Self {
        Self {
            pages: dump.pages.iter().map(|p| p.ocr.clone()).collect(),
        }
    }

    /// Number of pages with stored recognition output.
    pub fn recorded_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }
}

impl RecognitionEngine for ReplayEngine {
    fn recognize(
        &self,
        page: &PageRef<'_>,
        _language: &str,
        _dictionary: Option<&dyn SpellDictionary>,
    ) -> Result<Vec<RawBlock>> {
        self.pages
            .get(page.index)
            .and_then(Option::clone)
            .ok_or_else(|| {
                Error::Recognition(format!("no recorded output for page {}", page.index))
            })
    }
}
