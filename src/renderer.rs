// src/renderer.rs

//! This module defines the `Renderer`.
//!
//! The `Renderer` translates a composed `Grid` into a list of abstract
//! `RenderCommand`s. It knows nothing about pixels: the rasterizer compiles
//! the commands into a framebuffer afterwards.
//!
//! ```text
//! Grid  →  [Renderer]  →  RenderCommand[]  →  [Rasterizer]  →  RGBA framebuffer
//! ```
//!
//! Each non-blank cell becomes one `DrawGlyph` whose foreground is the
//! background color pushed toward black (light backgrounds) or white (dark
//! backgrounds) in proportion to the cell's brightness. The optional footer
//! label is emitted last so it is drawn over the grid.

use crate::color::{blend_for_brightness, Color};
use crate::grid::Grid;
use log::trace;


/// Commands for the rasterizer to execute, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Fills the whole frame with the background color.
    ClearAll { bg: Color },
    /// Draws one character in the cell at column `x`, row `y`.
    DrawGlyph {
        x: usize,
        y: usize,
        c: char,
        fg: Color,
        bg: Color,
    },
    /// Draws `text` centered in the footer band spanning `band_rows` rows from
    /// `band_top`.
    DrawLabel {
        text: String,
        band_top: usize,
        band_rows: usize,
        fg: Color,
        bg: Color,
    },
    /// Marks the frame as complete.
    PresentFrame,
}

/// Stateless apart from the background the frame is drawn over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    background: Color,
}

impl Renderer {
    pub fn new(background: Color) -> Self {
        Renderer { background }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Foreground color for a cell of `brightness`.
    pub fn glyph_color(&self, brightness: f32) -> Color {
        blend_for_brightness(self.background, brightness)
    }

    /// Builds the command list for one frame.
    ///
    /// A blank or whitespace `label` is skipped, as is a grid with no rows.
    pub fn prepare_frame(&self, grid: &Grid, label: Option<&str>) -> Vec<RenderCommand> {
        let mut commands = vec![RenderCommand::ClearAll {
            bg: self.background,
        }];

        for (x, y, cell) in grid.iter() {
            if cell.is_blank() {
                continue;
            }
            commands.push(RenderCommand::DrawGlyph {
                x,
                y,
                c: cell.c,
                fg: self.glyph_color(cell.brightness),
                bg: self.background,
            });
        }

        if let Some(text) = label.map(str::trim).filter(|t| !t.is_empty()) {
            let band_top = grid.footer_start();
            let band_rows = grid.rows() - band_top;
            if band_rows > 0 {
                commands.push(RenderCommand::DrawLabel {
                    text: text.to_string(),
                    band_top,
                    band_rows,
                    fg: self.background.contrasting(),
                    bg: self.background,
                });
            }
        }

        commands.push(RenderCommand::PresentFrame);
        trace!(
            "Renderer: prepared {} commands for {}x{} grid",
            commands.len(),
            grid.cols(),
            grid.rows()
        );
        commands
    }
}
