//! Document backend abstraction layer.
//!
//! Provides a trait-based interface for the document being converted,
//! isolating the concrete PDF library from the page pipeline. Content is
//! delivered as raw blocks/lines/spans in unrotated page space.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{BBox, Outline, Rotation};

/// Geometry of a page as stored in the file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Unrotated page width in points
    pub width: f32,
    /// Unrotated page height in points
    pub height: f32,
    /// Page `/Rotate` value
    #[serde(default)]
    pub rotation: Rotation,
}

impl PageInfo {
    pub fn new(width: f32, height: f32, rotation: Rotation) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    /// Map a raw rectangle into the displayed page frame.
    pub fn correct(&self, bbox: BBox) -> BBox {
        self.rotation.apply(bbox, self.width, self.height)
    }

    /// The displayed page rectangle.
    pub fn bbox(&self) -> BBox {
        self.rotation.page_bbox(self.width, self.height)
    }
}

impl Default for PageInfo {
    /// US Letter, unrotated.
    fn default() -> Self {
        Self::new(612.0, 792.0, Rotation::None)
    }
}

/// A span as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    pub text: String,
    pub bbox: BBox,
    /// Base font name
    pub font: String,
    /// Font flag bits (see [`crate::model::FontStyle::from_flags`])
    #[serde(default)]
    pub flags: u32,
    /// Packed sRGB color
    #[serde(default)]
    pub color: u32,
    #[serde(default)]
    pub ascender: f32,
    #[serde(default)]
    pub descender: f32,
}

/// A line as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    pub bbox: BBox,
    pub spans: Vec<RawSpan>,
}

/// A block as reported by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RawBlock {
    /// Text block
    Text { bbox: BBox, lines: Vec<RawLine> },
    /// Embedded image
    Image {
        bbox: BBox,
        /// Image format extension (e.g., "png")
        ext: String,
        /// Encoded image bytes
        #[serde(with = "base64_bytes")]
        image: Vec<u8>,
    },
}

impl RawBlock {
    pub fn bbox(&self) -> BBox {
        match self {
            RawBlock::Text { bbox, .. } | RawBlock::Image { bbox, .. } => *bbox,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, RawBlock::Image { .. })
    }

    /// Span texts of a text block, concatenated per line.
    pub fn plain_text(&self) -> String {
        match self {
            RawBlock::Text { lines, .. } => lines
                .iter()
                .map(|l| l.spans.iter().map(|s| s.text.as_str()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n"),
            RawBlock::Image { .. } => String::new(),
        }
    }
}

/// A hyperlink annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAnnotation {
    /// Active area in unrotated page space
    pub rect: BBox,
    /// Target URI
    pub uri: String,
}

impl LinkAnnotation {
    pub fn new(rect: BBox, uri: impl Into<String>) -> Self {
        Self {
            rect,
            uri: uri.into(),
        }
    }
}

/// Abstract interface for document access.
///
/// Implementations must be shareable across the page worker pool; every
/// method takes `&self` and is expected to be read-only.
pub trait PdfSource: Sync {
    /// Document name, used as the prefix of storage keys.
    fn name(&self) -> &str;

    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Page geometry and rotation.
    fn page_info(&self, index: usize) -> Result<PageInfo>;

    /// Structured page content in reading order.
    fn page_content(&self, index: usize) -> Result<Vec<RawBlock>>;

    /// Hyperlink annotations of a page.
    fn page_links(&self, index: usize) -> Result<Vec<LinkAnnotation>>;

    /// Naive full-document text, one page per line group.
    fn naive_text(&self) -> Result<String> {
        let mut text = String::new();
        for index in 0..self.page_count() {
            for block in self.page_content(index)? {
                let block_text = block.plain_text();
                if !block_text.is_empty() {
                    text.push_str(&block_text);
                    text.push('\n');
                }
            }
            text.push('\n');
        }
        Ok(text)
    }

    /// Table of contents.
    fn outline(&self) -> Result<Outline> {
        Ok(Outline::new())
    }
}

/// Handle to one page of a source, passed to the recognition engine.
#[derive(Clone, Copy)]
pub struct PageRef<'a> {
    pub source: &'a dyn PdfSource,
    pub index: usize,
    pub info: PageInfo,
}

impl<'a> PageRef<'a> {
    /// Resolve a page of `source`.
    pub fn new(source: &'a dyn PdfSource, index: usize) -> Result<Self> {
        let count = source.page_count();
        if index >= count {
            return Err(Error::PageOutOfRange(index, count));
        }
        let info = source.page_info(index)?;
        Ok(Self {
            source,
            index,
            info,
        })
    }
}

impl std::fmt::Debug for PageRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRef")
            .field("source", &self.source.name())
            .field("index", &self.index)
            .field("info", &self.info)
            .finish()
    }
}

/// Base64 (de)serialization for image payloads.
mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
