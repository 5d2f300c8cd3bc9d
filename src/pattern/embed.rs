// src/pattern/embed.rs

//! Layer 4: stamps every non-blank character of the source text into the
//! grid at full brightness.
//!
//! Rows are jittered around the vertical center by hash bytes; columns ride
//! the motif sinusoid, alternating sides. A character whose target cell is
//! already taken by an earlier embedded character moves right, continuing on
//! the following content rows and wrapping back to row 0. It is dropped only
//! when every content cell already holds an embedded character.

use super::params::{HashBytes, PatternParams};
use crate::glyph::{Cell, LayerFlags};
use crate::grid::Grid;
use log::{debug, trace};
use std::f64::consts::PI;

const EMBED_BRIGHTNESS: f32 = 1.0;
/// Fraction of the content height the jitter may span.
const VERTICAL_SPREAD: f64 = 0.9;
/// Per-character angle advance along the sinusoid.
const CHAR_ANGLE_STEP: f64 = 0.7;

/// Grid position for the `index`-th non-blank source character.
pub fn position(
    params: &PatternParams,
    hash: &HashBytes,
    index: usize,
    cols: usize,
    rows: usize,
) -> (usize, usize) {
    let center_row = (rows as f64 - 1.0) / 2.0;
    let jitter = hash.unit(index + params.embed_shift) - 0.5;
    let row = (center_row + jitter * rows as f64 * VERTICAL_SPREAD)
        .round()
        .clamp(0.0, rows as f64 - 1.0) as usize;

    let s = &params.sinusoid;
    let angle = s.direction * (row as f64 * s.frequency * PI + index as f64 * CHAR_ANGLE_STEP);
    let side = if index % 2 == 0 { 1.0 } else { -1.0 };
    let center_col = (cols as f64 - 1.0) / 2.0;
    let col = (center_col + side * s.amplitude * angle.sin())
        .round()
        .clamp(0.0, cols as f64 - 1.0) as usize;
    (col, row)
}

/// Returns the number of characters that found a cell.
pub fn paint(grid: &mut Grid, params: &PatternParams, hash: &HashBytes, source: &[char]) -> usize {
    let rows = grid.content_rows();
    let cols = grid.cols();
    if rows == 0 || cols == 0 {
        return 0;
    }
    let mut placed = 0;
    for (index, &ch) in source.iter().filter(|c| !c.is_whitespace()).enumerate() {
        let (col, row) = position(params, hash, index, cols, rows);
        let content_cells = rows * cols;
        let start = row * cols + col;
        let free = (0..content_cells)
            .map(|step| (start + step) % content_cells)
            .map(|i| (i % cols, i / cols))
            .find(|&(c, r)| {
                grid.get(c, r)
                    .map(|cell| !cell.layers.contains(LayerFlags::EMBEDDED))
                    .unwrap_or(false)
            });
        match free {
            Some((c, r)) => {
                if r != row {
                    trace!("Embed: '{}' spilled from row {} to row {}", ch, row, r);
                }
                grid.set(c, r, Cell::new(ch, EMBED_BRIGHTNESS, LayerFlags::EMBEDDED));
                placed += 1;
            }
            None => debug!("Embed: content area is full, dropping '{}'", ch),
        }
    }
    placed
}
