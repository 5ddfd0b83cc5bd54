//! Image blocks.
//!
//! An embedded image becomes a block with one line and one span whose
//! content references the uploaded image.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{AssetRef, Block, Font, FontStyle, Line, Span};
use crate::storage::{image_key, ObjectStore};

use super::backend::{PageInfo, RawBlock};

/// Font family given to image placeholder spans.
pub const IMAGE_SPAN_FONT: &str = "Arial";

/// Per-conversion unique storage prefix: `{file name}-{uuid}`.
pub fn document_token(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    format!("{}-{}", base, Uuid::new_v4())
}

/// Uploads images and builds their placeholder blocks.
pub struct ImageBlockBuilder<'a> {
    store: &'a dyn ObjectStore,
    document_token: String,
}

impl<'a> ImageBlockBuilder<'a> {
    pub fn new(store: &'a dyn ObjectStore, document_token: impl Into<String>) -> Self {
        Self {
            store,
            document_token: document_token.into(),
        }
    }

    pub fn document_token(&self) -> &str {
        &self.document_token
    }

    /// Upload the image of `block` and build its block.
    ///
    /// Fails with [`Error::InvalidBlock`] for text blocks and with the
    /// store's error when the upload fails.
    pub fn build(
        &self,
        block: &RawBlock,
        info: &PageInfo,
        page: usize,
        block_index: usize,
    ) -> Result<Block> {
        let RawBlock::Image { bbox, ext, image } = block else {
            return Err(Error::InvalidBlock(format!(
                "block {} on page {} is not an image block",
                block_index, page
            )));
        };

        let image_id = format!("image_{}_{}", page, block_index);
        let key = image_key(&self.document_token, page, block_index, ext);
        let asset = AssetRef::for_bytes(key, image);
        self.store.put(&asset.key, image, &asset.content_type)?;
        log::debug!(
            "Uploaded {} ({}, {} bytes)",
            asset.key,
            asset.content_type,
            image.len()
        );

        let bbox = info.correct(*bbox);
        let span = Span::image(
            image_id,
            asset,
            bbox,
            Font::new(IMAGE_SPAN_FONT, FontStyle::default()),
        );
        Ok(Block::new(vec![Line::new(vec![span], bbox)], bbox, page))
    }
}
