// src/pattern/background.rs

//! Layer 1: low-brightness noise drawn from the secondary hash stream.

use crate::glyph::{Cell, LayerFlags};
use crate::grid::Grid;
use crate::prng::SeededRandom;

const MIN_BRIGHTNESS: f64 = 0.2;
const MAX_BRIGHTNESS: f64 = 0.4;

/// Characters taken from each hash to form the background alphabet.
const SECONDARY_FRAGMENT: usize = 12;
const PRIMARY_FRAGMENT: std::ops::Range<usize> = 16..24;

/// Builds the background alphabet from fragments of both hashes.
pub fn alphabet(primary_hash: &str, secondary_hash: &str) -> Vec<char> {
    let mut symbols: Vec<char> = Vec::new();
    let fragments = secondary_hash
        .chars()
        .take(SECONDARY_FRAGMENT)
        .chain(
            primary_hash
                .chars()
                .skip(PRIMARY_FRAGMENT.start)
                .take(PRIMARY_FRAGMENT.len()),
        );
    for c in fragments {
        if !c.is_whitespace() && !symbols.contains(&c) {
            symbols.push(c);
        }
    }
    if symbols.is_empty() {
        symbols.push('.');
    }
    symbols
}

pub fn paint(grid: &mut Grid, rng: &mut SeededRandom, alphabet: &[char], density: f64) {
    let cols = grid.cols();
    for row in 0..grid.content_rows() {
        for col in 0..cols {
            if !rng.chance(density) {
                continue;
            }
            let symbol = rng.pick(alphabet).copied().unwrap_or('.');
            let brightness = rng.range_f64(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
            grid.set(col, row, Cell::new(symbol, brightness as f32, LayerFlags::BACKGROUND));
        }
    }
}
