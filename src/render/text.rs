//! Text rendering for converted pages.
//!
//! Spans are concatenated per line, lines are separated by newlines and
//! blocks by blank lines. Links become `[text](uri)`; image spans become
//! `![alt](url)` with the URL resolved through the object store, wrapped as
//! `[![alt](url)](uri)` when linked.

use crate::error::Result;
use crate::model::{Block, Conversion, Page, Span, SpanContent};
use crate::storage::ObjectStore;

use super::RenderOptions;

/// Wrap `text` as a markdown link, keeping surrounding whitespace outside
/// the brackets.
pub fn wrap_link(text: &str, uri: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return text.to_string();
    }
    let start = text.len() - text.trim_start().len();
    let end = start + trimmed.len();
    format!("{}[{}]({}){}", &text[..start], trimmed, uri, &text[end..])
}

/// Render one span.
pub fn span_text(span: &Span, store: &dyn ObjectStore, options: &RenderOptions) -> Result<String> {
    match &span.content {
        SpanContent::Text { text } => match &span.link {
            Some(uri) if options.wrap_links => Ok(wrap_link(text, uri)),
            _ => Ok(text.clone()),
        },
        SpanContent::Image { asset } => {
            if !options.include_images {
                return Ok(String::new());
            }
            let url = store.url(&asset.key)?;
            let image = format!("![{}]({})", options.image_alt, url);
            match &span.link {
                Some(uri) if options.wrap_links => Ok(format!("[{}]({})", image, uri)),
                _ => Ok(image),
            }
        }
    }
}

fn block_text(block: &Block, store: &dyn ObjectStore, options: &RenderOptions) -> Result<String> {
    let mut lines = Vec::with_capacity(block.lines.len());
    for line in &block.lines {
        let mut text = String::new();
        for span in &line.spans {
            text.push_str(&span_text(span, store, options)?);
        }
        lines.push(text);
    }
    Ok(lines.join("\n"))
}

/// Render one page.
pub fn page_text(page: &Page, store: &dyn ObjectStore, options: &RenderOptions) -> Result<String> {
    let mut blocks = Vec::with_capacity(page.blocks.len());
    for block in &page.blocks {
        let text = block_text(block, store, options)?;
        if !text.trim().is_empty() {
            blocks.push(text);
        }
    }
    Ok(blocks.join("\n\n"))
}

/// Render the selected pages of a conversion.
pub fn to_text(
    conversion: &Conversion,
    store: &dyn ObjectStore,
    options: &RenderOptions,
) -> Result<String> {
    let mut pages = Vec::new();
    for page in &conversion.pages {
        if options.page_selection.includes(page.number) {
            pages.push(page_text(page, store, options)?);
        }
    }
    Ok(pages.join(&options.page_separator).trim().to_string())
}
