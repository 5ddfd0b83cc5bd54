//! Span and line types.

use serde::{Deserialize, Serialize};

use super::{AssetRef, BBox};

/// Decomposed font style flags.
///
/// Built from the flag bits reported by the extraction backend:
/// bit 0 superscript, bit 1 italic, bit 2 serifed, bit 3 monospaced,
/// bit 4 bold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FontStyle {
    pub superscript: bool,
    pub italic: bool,
    pub serifed: bool,
    pub monospaced: bool,
    pub bold: bool,
}

impl FontStyle {
    const SUPERSCRIPT: u32 = 1 << 0;
    const ITALIC: u32 = 1 << 1;
    const SERIFED: u32 = 1 << 2;
    const MONOSPACED: u32 = 1 << 3;
    const BOLD: u32 = 1 << 4;

    /// Decompose backend flag bits.
    pub fn from_flags(flags: u32) -> Self {
        Self {
            superscript: flags & Self::SUPERSCRIPT != 0,
            italic: flags & Self::ITALIC != 0,
            serifed: flags & Self::SERIFED != 0,
            monospaced: flags & Self::MONOSPACED != 0,
            bold: flags & Self::BOLD != 0,
        }
    }

    /// Recompose the flag bits.
    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.superscript {
            flags |= Self::SUPERSCRIPT;
        }
        if self.italic {
            flags |= Self::ITALIC;
        }
        if self.serifed {
            flags |= Self::SERIFED;
        }
        if self.monospaced {
            flags |= Self::MONOSPACED;
        }
        if self.bold {
            flags |= Self::BOLD;
        }
        flags
    }
}

impl std::fmt::Display for FontStyle {
    /// Underscore-joined form, e.g. `italic_serifed_proportional_bold`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::with_capacity(5);
        if self.superscript {
            parts.push("superscript");
        }
        if self.italic {
            parts.push("italic");
        }
        parts.push(if self.serifed { "serifed" } else { "sans" });
        parts.push(if self.monospaced {
            "monospaced"
        } else {
            "proportional"
        });
        if self.bold {
            parts.push("bold");
        }
        write!(f, "{}", parts.join("_"))
    }
}

/// Font family plus decomposed style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Font {
    /// Font family / base font name (e.g., "Helvetica-Bold")
    pub family: String,
    /// Style flags
    pub style: FontStyle,
}

impl Font {
    pub fn new(family: impl Into<String>, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            style,
        }
    }
}

/// What a span carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpanContent {
    /// Extracted or recognized text
    Text { text: String },
    /// A stored image, rendered as a Markdown image reference
    Image { asset: AssetRef },
}

/// A run of text (or an image placeholder) with uniform style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Id, unique within the page
    pub id: String,
    pub content: SpanContent,
    /// Canonical bounding box
    pub bbox: BBox,
    pub font: Font,
    /// Packed sRGB color
    pub color: u32,
    pub ascender: f32,
    pub descender: f32,
    /// Hyperlink target attached by the link pass
    pub link: Option<String>,
}

impl Span {
    /// Create a text span.
    pub fn text(id: impl Into<String>, text: impl Into<String>, bbox: BBox, font: Font) -> Self {
        Self {
            id: id.into(),
            content: SpanContent::Text { text: text.into() },
            bbox,
            font,
            color: 0,
            ascender: 0.0,
            descender: 0.0,
            link: None,
        }
    }

    /// Create an image span.
    pub fn image(id: impl Into<String>, asset: AssetRef, bbox: BBox, font: Font) -> Self {
        Self {
            id: id.into(),
            content: SpanContent::Image { asset },
            bbox,
            font,
            color: 0,
            ascender: 0.0,
            descender: 0.0,
            link: None,
        }
    }

    /// Text content; empty for image spans.
    pub fn plain_text(&self) -> &str {
        match &self.content {
            SpanContent::Text { text } => text,
            SpanContent::Image { .. } => "",
        }
    }

    pub fn asset(&self) -> Option<&AssetRef> {
        match &self.content {
            SpanContent::Image { asset } => Some(asset),
            SpanContent::Text { .. } => None,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self.content, SpanContent::Image { .. })
    }
}

/// A line of spans, left to right as extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub spans: Vec<Span>,
    pub bbox: BBox,
}

impl Line {
    pub fn new(spans: Vec<Span>, bbox: BBox) -> Self {
        Self { spans, bbox }
    }

    /// Area of the line's bounding box.
    pub fn area(&self) -> f32 {
        self.bbox.area()
    }

    /// Concatenated span text.
    pub fn plain_text(&self) -> String {
        self.spans.iter().map(Span::plain_text).collect()
    }
}
