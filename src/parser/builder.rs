//! Builds the page block tree from raw backend content.

use crate::error::Result;
use crate::model::{Block, Font, FontStyle, Line, Span};

use super::backend::{PageInfo, RawBlock, RawLine, RawSpan};
use super::image::ImageBlockBuilder;

/// Turn raw page content into blocks.
///
/// Rectangles are rotation-corrected, lines without positive area are
/// dropped, and blocks left without lines are dropped. Image blocks are
/// uploaded through `images`. Source order is preserved.
pub fn build_blocks(
    raw_blocks: &[RawBlock],
    info: &PageInfo,
    page: usize,
    images: &ImageBlockBuilder<'_>,
) -> Result<Vec<Block>> {
    let mut blocks = Vec::with_capacity(raw_blocks.len());
    let mut span_counter = 0usize;

    for (block_index, raw) in raw_blocks.iter().enumerate() {
        match raw {
            RawBlock::Image { .. } => {
                blocks.push(images.build(raw, info, page, block_index)?);
            }
            RawBlock::Text { bbox, lines } => {
                let lines: Vec<Line> = lines
                    .iter()
                    .map(|line| build_line(line, info, page, &mut span_counter))
                    .filter(|line| line.area() > 0.0)
                    .collect();

                if lines.is_empty() {
                    continue;
                }
                blocks.push(Block::new(lines, info.correct(*bbox), page));
            }
        }
    }

    Ok(blocks)
}

fn build_line(raw: &RawLine, info: &PageInfo, page: usize, counter: &mut usize) -> Line {
    let spans = raw
        .spans
        .iter()
        .map(|span| {
            let span = build_span(span, info, page, *counter);
            *counter += 1;
            span
        })
        .collect();
    Line::new(spans, info.correct(raw.bbox))
}

fn build_span(raw: &RawSpan, info: &PageInfo, page: usize, id: usize) -> Span {
    let mut span = Span::text(
        format!("{}_{}", page, id),
        raw.text.clone(),
        info.correct(raw.bbox),
        Font::new(raw.font.clone(), FontStyle::from_flags(raw.flags)),
    );
    span.color = raw.color;
    span.ascender = raw.ascender;
    span.descender = raw.descender;
    span
}
