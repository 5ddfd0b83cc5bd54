//! Page model produced by the conversion pipeline.
//!
//! Spans are owned by lines, lines by blocks, blocks by pages. All
//! geometry is stored in the canonical (rotation-corrected) frame.

mod document;
mod geometry;
mod page;
mod resource;
mod span;

pub use document::{Conversion, OcrStats, Outline, OutlineItem};
pub use geometry::{BBox, Rotation};
pub use page::{Block, Page};
pub use resource::{detect_content_type, AssetRef, OCTET_STREAM};
pub use span::{Font, FontStyle, Line, Span, SpanContent};
