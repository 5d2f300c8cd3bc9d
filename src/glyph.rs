// src/glyph.rs

//! Defines the `Cell` type and its layer provenance flags (`LayerFlags`).
//!
//! A `Cell` is one character position of a pattern grid: the symbol drawn
//! there and its brightness. The flags record which compositor layers have
//! written the cell during the current frame.

use bitflags::bitflags;
use std::fmt;

/// Symbol of an unpainted cell.
pub const BLANK_SYMBOL: char = ' ';

bitflags! {
    /// Compositor layers that have written a cell.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayerFlags: u8 {
        const BACKGROUND = 1 << 0;
        const MOTIF      = 1 << 1;
        const VARIATION  = 1 << 2;
        const EMBEDDED   = 1 << 3;
        const MATRIX     = 1 << 4; // word-matrix cube
    }
}

/// A single cell of the pattern grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// The symbol displayed in the cell, `' '` when blank.
    pub c: char,
    /// Brightness in `[0, 1]`.
    pub brightness: f32,
    /// Every layer that has written this cell since it was last cleared.
    pub layers: LayerFlags,
}

/// Blank cell used to initialize and clear grids.
pub const BLANK_CELL: Cell = Cell {
    c: BLANK_SYMBOL,
    brightness: 0.0,
    layers: LayerFlags::empty(),
};

impl Default for Cell {
    fn default() -> Self {
        BLANK_CELL
    }
}

impl Cell {
    /// A painted cell; brightness is clamped into `[0, 1]`.
    pub fn new(c: char, brightness: f32, layer: LayerFlags) -> Self {
        Cell {
            c,
            brightness: clamp_brightness(brightness),
            layers: layer,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.c == BLANK_SYMBOL || self.c.is_whitespace()
    }
}

/// Clamps to `[0, 1]`, mapping NaN to 0.
pub fn clamp_brightness(b: f32) -> f32 {
    if b.is_nan() {
        0.0
    } else {
        b.clamp(0.0, 1.0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.c)
    }
}
