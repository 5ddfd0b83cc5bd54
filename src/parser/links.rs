//! Hyperlink anchoring.

use crate::model::{BBox, Block};

/// Attach each link to the span it overlaps most.
///
/// `links` are `(rect, uri)` pairs in canonical page space. Blocks are
/// scanned in page order; the first block that overlaps the link and holds a
/// span with positive overlap receives the link on that span. Links that
/// overlap no span are dropped. Returns the number of attached links.
pub fn attach_links<'a, I>(blocks: &mut [Block], links: I) -> usize
where
    I: IntoIterator<Item = (BBox, &'a str)>,
{
    let mut attached = 0;

    for (rect, uri) in links {
        for block in blocks.iter_mut() {
            if !block.bbox.intersects(&rect) {
                continue;
            }

            let mut best: Option<(f32, (usize, usize))> = None;
            for (line_index, line) in block.lines.iter().enumerate() {
                for (span_index, span) in line.spans.iter().enumerate() {
                    let area = span.bbox.intersection_area(&rect);
                    if area > 0.0 && best.map_or(true, |(max, _)| area > max) {
                        best = Some((area, (line_index, span_index)));
                    }
                }
            }

            if let Some((_, (line_index, span_index))) = best {
                block.lines[line_index].spans[span_index].link = Some(uri.to_string());
                attached += 1;
                break;
            }
        }
    }

    attached
}
