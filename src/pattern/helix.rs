// src/pattern/helix.rs

//! Layer 2: the DNA double helix.
//!
//! Two strands are mirrored about the grid's center column. Each strand is
//! `2 * half_width + 1` cells thick, brightest on its centerline. Every
//! `base_pair_interval` rows a connector spans the gap between the strands,
//! brightest at its midpoint.

use super::params::PatternParams;
use crate::animation::{AnimationState, AnimationStyle};
use crate::glyph::{Cell, LayerFlags};
use crate::grid::Grid;
use crate::prng::SeededRandom;

pub const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

const STRAND_CENTER_BRIGHTNESS: f64 = 1.0;
const STRAND_EDGE_BRIGHTNESS: f64 = 0.8;
const CONNECTOR_MIN_BRIGHTNESS: f64 = 0.4;
const CONNECTOR_SYMBOL: char = '-';

/// Watson-Crick complement; non-bases map to themselves.
pub fn complement(base: char) -> char {
    match base {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        other => other,
    }
}

/// Strand alphabet: the four bases, binary digits, and primary-hash characters.
pub fn alphabet(primary_hash: &str) -> Vec<char> {
    let mut symbols: Vec<char> = BASES.to_vec();
    symbols.extend(['0', '1']);
    for c in primary_hash.chars().take(16) {
        if !c.is_whitespace() && !symbols.contains(&c) {
            symbols.push(c);
        }
    }
    symbols
}

/// Column positions of both strand centerlines for `row`.
pub fn strand_positions(
    params: &PatternParams,
    style: AnimationStyle,
    state: &AnimationState,
    row: usize,
    row_count: usize,
    cols: usize,
) -> (f64, f64) {
    let center = (cols as f64 - 1.0) / 2.0;
    let offset = params.sinusoid.strand_offset(style, state, row, row_count);
    (center + offset, center - offset)
}

#[allow(clippy::too_many_arguments)]
pub fn paint(
    grid: &mut Grid,
    params: &PatternParams,
    style: AnimationStyle,
    state: &AnimationState,
    pulse: f64,
    rng: &mut SeededRandom,
    alphabet: &[char],
) {
    let rows = grid.content_rows();
    let cols = grid.cols();
    if rows == 0 || cols == 0 {
        return;
    }
    let half_width = params.strand_half_width;
    let interval = params.base_pair_interval.max(1);

    for row in 0..rows {
        let (first, second) = strand_positions(params, style, state, row, rows, cols);
        if row % interval == 0 {
            draw_connector(grid, row, first, second, half_width, pulse, rng);
        }
        draw_strand_row(grid, row, first, half_width, pulse, rng, alphabet);
        draw_strand_row(grid, row, second, half_width, pulse, rng, alphabet);
    }
}

fn draw_strand_row(
    grid: &mut Grid,
    row: usize,
    centerline: f64,
    half_width: usize,
    pulse: f64,
    rng: &mut SeededRandom,
    alphabet: &[char],
) {
    let center_col = centerline.round() as i64;
    let reach = half_width as f64 + 0.5;
    for dx in -(half_width as i64)..=(half_width as i64) {
        let col = center_col + dx;
        let falloff = ((col as f64 - centerline).abs() / reach).min(1.0);
        let brightness = STRAND_CENTER_BRIGHTNESS
            - (STRAND_CENTER_BRIGHTNESS - STRAND_EDGE_BRIGHTNESS) * falloff;
        let symbol = rng.pick(alphabet).copied().unwrap_or('|');
        grid.set_signed(
            col,
            row as i64,
            Cell::new(symbol, (brightness * pulse) as f32, LayerFlags::MOTIF),
        );
    }
}

/// Base-pair connector between the inner edges of the two strands.
fn draw_connector(
    grid: &mut Grid,
    row: usize,
    first: f64,
    second: f64,
    half_width: usize,
    pulse: f64,
    rng: &mut SeededRandom,
) {
    let inset = half_width as i64 + 1;
    let left = first.min(second).round() as i64 + inset;
    let right = first.max(second).round() as i64 - inset;
    if left > right {
        // Strands are crossing; no room for a connector.
        return;
    }
    let base = rng.pick(&BASES).copied().unwrap_or('A');
    let span = (right - left) as f64;
    for col in left..=right {
        let t = if span > 0.0 { (col - left) as f64 / span } else { 0.5 };
        let parabola = 1.0 - (2.0 * t - 1.0).powi(2);
        let brightness = CONNECTOR_MIN_BRIGHTNESS + (1.0 - CONNECTOR_MIN_BRIGHTNESS) * parabola;
        let symbol = if t < 1.0 / 3.0 {
            base
        } else if t > 2.0 / 3.0 {
            complement(base)
        } else {
            CONNECTOR_SYMBOL
        };
        grid.set_signed(
            col,
            row as i64,
            Cell::new(symbol, (brightness * pulse) as f32, LayerFlags::MOTIF),
        );
    }
}
