// src/pattern/mod.rs

//! The helix pattern compositor.
//!
//! A frame is painted by four layers in a fixed order, each free to overwrite
//! what came before:
//!
//! ```text
//! background noise → helix motif → decorative variation → source-text embedding
//! ```
//!
//! Every random stream is re-derived from the input hashes at the start of a
//! frame, so a frame is a pure function of the input, the grid size, the
//! style, and the animation state.

pub mod background;
pub mod embed;
pub mod helix;
pub mod params;
pub mod variation;

#[cfg(test)]
mod tests;

use crate::animation::{pulse_factor, AnimationState, AnimationStyle};
use crate::grid::Grid;
use crate::input::PatternInput;
use crate::prng::SeededRandom;
use log::trace;
use params::{HashBytes, PatternParams};

/// Anything that can paint a frame into a grid.
///
/// Sessions drive their visualization through this trait, one call per frame.
pub trait Visualization {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Paints the frame for `state` into `grid`, replacing its contents.
    fn paint(&mut self, grid: &mut Grid, style: AnimationStyle, state: &AnimationState);
}

/// Paints the DNA helix visualization for one validated input.
#[derive(Debug, Clone)]
pub struct HelixCompositor {
    input: PatternInput,
    hash: HashBytes,
    strand_alphabet: Vec<char>,
    background_alphabet: Vec<char>,
    source: Vec<char>,
}

impl HelixCompositor {
    pub fn new(input: PatternInput) -> Self {
        let hash = HashBytes::from_hex(&input.primary_hash);
        let strand_alphabet = helix::alphabet(&input.primary_hash);
        let background_alphabet = background::alphabet(&input.primary_hash, &input.secondary_hash);
        let source = input.source_text().chars().collect();
        HelixCompositor {
            input,
            hash,
            strand_alphabet,
            background_alphabet,
            source,
        }
    }

    pub fn input(&self) -> &PatternInput {
        &self.input
    }

    /// Layer parameters for a grid `cols` wide.
    pub fn params(&self, cols: usize) -> PatternParams {
        PatternParams::derive(&self.hash, cols)
    }

    /// Paints one complete frame.
    pub fn compose(&self, grid: &mut Grid, style: AnimationStyle, state: &AnimationState) {
        grid.clear();
        let params = self.params(grid.cols());
        let pulse = pulse_factor(style, state);
        trace!(
            "HelixCompositor: {:?} frame phase={:.3} flow={:.3} pulse={:.3}",
            style,
            state.phase,
            state.flow_offset,
            pulse
        );

        let mut noise = SeededRandom::new(&self.input.secondary_hash);
        background::paint(grid, &mut noise, &self.background_alphabet, params.background_density);

        let mut motif = SeededRandom::new(&self.input.primary_hash);
        helix::paint(grid, &params, style, state, pulse, &mut motif, &self.strand_alphabet);
        variation::paint(grid, &params, state, pulse, &mut motif);

        embed::paint(grid, &params, &self.hash, &self.source);
    }
}

impl Visualization for HelixCompositor {
    fn name(&self) -> &str {
        "helix"
    }

    fn paint(&mut self, grid: &mut Grid, style: AnimationStyle, state: &AnimationState) {
        self.compose(grid, style, state);
    }
}
