//! References to assets (embedded images) persisted outside the page tree.

use serde::{Deserialize, Serialize};

/// Fallback content type when the magic bytes are not recognized.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// A stored asset, identified by its storage key.
///
/// The key is resolved to a URL only when the page is rendered, so the page
/// tree does not depend on how (or for how long) the store exposes objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Storage key (e.g., `report.pdf-<uuid>/image_3_1.png`)
    pub key: String,

    /// MIME type detected from the asset bytes
    pub content_type: String,
}

impl AssetRef {
    /// Create a new asset reference.
    pub fn new(key: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content_type: content_type.into(),
        }
    }

    /// Create a reference whose content type is sniffed from `data`.
    pub fn for_bytes(key: impl Into<String>, data: &[u8]) -> Self {
        Self::new(key, detect_content_type(data).unwrap_or(OCTET_STREAM))
    }
}

/// Detect a MIME type from data magic bytes.
pub fn detect_content_type(data: &[u8]) -> Option<&'static str> {
    if data.len() < 8 {
        return None;
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }

    // GIF: GIF87a or GIF89a
    if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
        return Some("image/gif");
    }

    // TIFF: 49 49 2A 00 (little-endian) or 4D 4D 00 2A (big-endian)
    if data.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
    {
        return Some("image/tiff");
    }

    // BMP: BM
    if data.starts_with(b"BM") {
        return Some("image/bmp");
    }

    // WEBP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }

    // JPEG 2000: 00 00 00 0C 6A 50 20 20
    if data.starts_with(&[0x00, 0x00, 0x00, 0x0C, 0x6A, 0x50, 0x20, 0x20]) {
        return Some("image/jp2");
    }

    None
}
