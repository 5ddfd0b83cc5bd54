//! Reading-order reflow for rotated pages.
//!
//! Native content order on a rotated page follows the unrotated layout.
//! Blocks are regrouped into horizontal bands by their top edge and read
//! left to right, band by band.

use std::collections::BTreeMap;

use crate::model::Block;

/// Grid cell of a vertical origin.
fn bucket(y: f32, tolerance: f32) -> i64 {
    (y / tolerance).floor() as i64
}

/// Reorder blocks into band-then-column order.
///
/// Vertical origins are quantized on a grid of `tolerance`. Sweeping the
/// occupied cells top to bottom, a cell joins the current band when it is
/// adjacent to the band's first cell, so a band covers at most two cells.
/// Within a band blocks are stably sorted by their left edge.
///
/// Bands are anchored at their first cell, not chained: two blocks less
/// than `tolerance` apart can land in different bands when a third block
/// sits just above them (origins 99.9, 101.2 and 102.4 at tolerance 1.25
/// give the bands `{99.9, 101.2}` and `{102.4}`).
pub fn reflow_blocks(blocks: Vec<Block>, tolerance: f32) -> Vec<Block> {
    let mut cells: BTreeMap<i64, Vec<Block>> = BTreeMap::new();
    for block in blocks {
        cells
            .entry(bucket(block.bbox.y0, tolerance))
            .or_default()
            .push(block);
    }

    let mut bands: Vec<Vec<Block>> = Vec::new();
    let mut band_start: Option<i64> = None;
    for (cell, blocks) in cells {
        let joins = band_start.is_some_and(|start| cell - start <= 1);
        match bands.last_mut() {
            Some(band) if joins => band.extend(blocks),
            _ => {
                band_start = Some(cell);
                bands.push(blocks);
            }
        }
    }

    bands
        .into_iter()
        .flat_map(|mut band| {
            band.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
            band
        })
        .collect()
}
