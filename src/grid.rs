// src/grid.rs

//! The fixed-size cell grid every compositor layer paints into.
//!
//! Cells are stored row-major in a flat buffer. Dimensions are fixed at
//! construction. Writes outside the grid are dropped silently: the pattern
//! layers compute positions from sinusoids and hash bytes and are allowed to
//! aim off-grid.

use crate::glyph::{Cell, LayerFlags, BLANK_CELL};
use log::trace;
use std::fmt;

/// Number of bottom rows reserved for the footer label.
pub const FOOTER_ROWS: usize = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocates a `cols × rows` grid of blank cells.
    pub fn new(cols: usize, rows: usize) -> Self {
        Grid {
            cols,
            rows,
            cells: vec![BLANK_CELL; cols * rows],
        }
    }

    /// `(cols, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Rows available to the compositor layers (everything above the footer).
    pub fn content_rows(&self) -> usize {
        self.rows.saturating_sub(FOOTER_ROWS)
    }

    /// First row of the footer band.
    pub fn footer_start(&self) -> usize {
        self.content_rows()
    }

    pub fn is_footer_row(&self, row: usize) -> bool {
        row >= self.footer_start() && row < self.rows
    }

    fn index(&self, col: usize, row: usize) -> Option<usize> {
        if col < self.cols && row < self.rows {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn get(&self, col: usize, row: usize) -> Option<&Cell> {
        self.index(col, row).map(|i| &self.cells[i])
    }

    /// Writes a cell, merging its layer flag into the cell's provenance.
    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, col: usize, row: usize, cell: Cell) {
        match self.index(col, row) {
            Some(i) => {
                let prior = self.cells[i].layers;
                self.cells[i] = Cell {
                    layers: prior | cell.layers,
                    ..Cell::new(cell.c, cell.brightness, cell.layers)
                };
            }
            None => trace!(
                "Grid: dropped write at ({}, {}) outside {}x{}",
                col,
                row,
                self.cols,
                self.rows
            ),
        }
    }

    /// Signed-coordinate variant of `set` for layers that compute positions
    /// from signed offsets.
    pub fn set_signed(&mut self, col: i64, row: i64, cell: Cell) {
        if col >= 0 && row >= 0 {
            self.set(col as usize, row as usize, cell);
        }
    }

    /// Resets every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(BLANK_CELL);
    }

    /// Row slice, or `None` when out of range.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row < self.rows {
            let start = row * self.cols;
            Some(&self.cells[start..start + self.cols])
        } else {
            None
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates `(col, row, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % cols, i / cols, cell))
    }

    /// True if any cell in `row` was written by one of `layers`.
    pub fn row_touched_by(&self, row: usize, layers: LayerFlags) -> bool {
        self.row(row)
            .map(|cells| cells.iter().any(|c| c.layers.intersects(layers)))
            .unwrap_or(false)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if let Some(cells) = self.row(row) {
                let line: String = cells.iter().map(|c| c.c).collect();
                writeln!(f, "{}", line.trim_end())?;
            }
        }
        Ok(())
    }
}
