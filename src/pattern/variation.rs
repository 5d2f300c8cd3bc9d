// src/pattern/variation.rs

//! Layer 3: one decorative variation per visualization.
//!
//! Variation cells only replace cells that are dimmer than themselves, so the
//! helix keeps its shape under every variant.

use super::helix::BASES;
use super::params::{PatternParams, Variation};
use crate::animation::AnimationState;
use crate::glyph::{Cell, LayerFlags};
use crate::grid::Grid;
use crate::prng::SeededRandom;

const STRIATION_SYMBOL: char = '~';
const STRIATION_BRIGHTNESS: f64 = 0.5;
const STREAM_BRIGHTNESS: (f64, f64) = (0.45, 0.7);
const STREAM_CYCLE: usize = 8;
const ACCENT_BRIGHTNESS: f64 = 0.55;
const HIGHLIGHT_BRIGHTNESS: f64 = 0.75;
const HIGHLIGHT_LEN: (usize, usize) = (4, 12);

pub fn paint(
    grid: &mut Grid,
    params: &PatternParams,
    state: &AnimationState,
    pulse: f64,
    rng: &mut SeededRandom,
) {
    if grid.content_rows() == 0 || grid.cols() == 0 {
        return;
    }
    match params.variation {
        Variation::Striations => striations(grid, params, pulse),
        Variation::DataStreams => data_streams(grid, params, state, pulse, rng),
        Variation::DiagonalAccents => diagonal_accents(grid, params, pulse, rng),
        Variation::SequenceHighlights => sequence_highlights(grid, params, pulse, rng),
    }
}

/// Writes `cell` unless the target is already at least as bright.
fn overlay(grid: &mut Grid, col: usize, row: usize, cell: Cell) {
    let dimmer = grid
        .get(col, row)
        .map(|existing| existing.brightness < cell.brightness)
        .unwrap_or(false);
    if dimmer {
        grid.set(col, row, cell);
    }
}

fn variation_cell(symbol: char, brightness: f64, pulse: f64) -> Cell {
    Cell::new(symbol, (brightness * pulse) as f32, LayerFlags::VARIATION)
}

/// Horizontal bands every 6–11 rows, every third column.
fn striations(grid: &mut Grid, params: &PatternParams, pulse: f64) {
    let spacing = 6 + (params.variation_spacing % 6) as usize;
    let first = params.variation_offset as usize % spacing;
    for row in (first..grid.content_rows()).step_by(spacing) {
        for col in (0..grid.cols()).filter(|c| (c + row) % 3 == 0) {
            overlay(grid, col, row, variation_cell(STRIATION_SYMBOL, STRIATION_BRIGHTNESS, pulse));
        }
    }
}

/// Vertical columns of binary digits every 8–15 columns, their brightness
/// cycling down the column and shifting with the flow offset.
fn data_streams(
    grid: &mut Grid,
    params: &PatternParams,
    state: &AnimationState,
    pulse: f64,
    rng: &mut SeededRandom,
) {
    let spacing = 8 + (params.variation_spacing % 8) as usize;
    let first = params.variation_offset as usize % spacing;
    // only the position within one cycle matters; flow_offset is unbounded
    let shift = state.flow_offset.rem_euclid(STREAM_CYCLE as f64).floor() as usize % STREAM_CYCLE;
    let (low, high) = STREAM_BRIGHTNESS;
    for col in (first..grid.cols()).step_by(spacing) {
        for row in 0..grid.content_rows() {
            if !rng.chance(params.variation_density) {
                continue;
            }
            let symbol = if rng.chance(0.5) { '1' } else { '0' };
            let step = (row + shift) % STREAM_CYCLE;
            let brightness = low + (high - low) * step as f64 / (STREAM_CYCLE - 1) as f64;
            overlay(grid, col, row, variation_cell(symbol, brightness, pulse));
        }
    }
}

/// Diagonal lines every 10–19 cells, leaning with the helix direction.
fn diagonal_accents(grid: &mut Grid, params: &PatternParams, pulse: f64, rng: &mut SeededRandom) {
    let spacing = 10 + (params.variation_spacing % 10) as usize;
    let offset = params.variation_offset as usize;
    let rows = grid.content_rows();
    let rising = params.sinusoid.direction > 0.0;
    for row in 0..rows {
        for col in 0..grid.cols() {
            let diagonal = if rising { col + row } else { col + rows - row };
            if (diagonal + offset) % spacing != 0 || !rng.chance(params.variation_density) {
                continue;
            }
            let symbol = if rising { '/' } else { '\\' };
            overlay(grid, col, row, variation_cell(symbol, ACCENT_BRIGHTNESS, pulse));
        }
    }
}

/// 3–8 short runs of 4–12 bases at random positions.
fn sequence_highlights(grid: &mut Grid, params: &PatternParams, pulse: f64, rng: &mut SeededRandom) {
    let count = 3 + (params.variation_spacing % 6) as usize;
    let rows = grid.content_rows();
    let cols = grid.cols();
    for _ in 0..count {
        let len = rng.range_usize(HIGHLIGHT_LEN.0, HIGHLIGHT_LEN.1 + 1).min(cols);
        let row = rng.range_usize(0, rows);
        let start = rng.range_usize(0, cols - len + 1);
        for col in start..start + len {
            let base = rng.pick(&BASES).copied().unwrap_or('A');
            overlay(grid, col, row, variation_cell(base, HIGHLIGHT_BRIGHTNESS, pulse));
        }
    }
}
