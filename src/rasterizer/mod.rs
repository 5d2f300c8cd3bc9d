//! Render command compiler.
//!
//! This module acts as a **compiler** that turns the `Renderer`'s
//! `RenderCommand`s into pixels in an RGBA framebuffer:
//!
//! ```text
//! RenderCommand[]  →  [Rasterizer/Compiler]  →  framebuffer + FrameSummary
//!   ClearAll                                      fill
//!   DrawGlyph                                     blit cached glyph
//!   DrawLabel                                     blit centered run
//!   PresentFrame                                  present flag
//! ```
//!
//! Output is a pure function of the commands and the cell size: the same
//! command list always compiles to the same bytes.

pub mod bitmap_font_driver;
pub mod font_driver;

use crate::color::Color;
use crate::rasterizer::bitmap_font_driver::BitmapFontDriver;
use crate::rasterizer::font_driver::FontDriver;
use crate::renderer::RenderCommand;
use log::{debug, trace};
use std::collections::HashMap;

/// RGBA color in 32-bit format (8 bits per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Convert to RGBA byte array
    pub fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let (r, g, b) = color.to_rgb();
        Rgba::opaque(r, g, b)
    }
}

/// A key for caching rendered glyphs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GlyphKey {
    codepoint: char,
    fg: Rgba,
    bg: Rgba,
}

/// A pre-rendered glyph as RGBA pixel data
#[derive(Debug, Clone)]
pub struct RenderedGlyph {
    pub width_px: usize,
    pub height_px: usize,
    pub rgba_data: Vec<u8>, // width * height * 4 bytes
}

/// What a compile pass did, for logging and for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    pub glyphs_drawn: usize,
    pub label_drawn: bool,
    pub present: bool,
}

/// Software text rasterizer.
///
/// Each instance owns its glyph cache; nothing is shared between sessions
/// except the font's read-only glyph table.
pub struct SoftwareRasterizer<F: FontDriver = BitmapFontDriver> {
    /// Glyph cache: codepoint + colors -> rendered pixels
    glyph_cache: HashMap<GlyphKey, RenderedGlyph>,
    cell_width_px: usize,
    cell_height_px: usize,
    font: F,
}

impl SoftwareRasterizer<BitmapFontDriver> {
    /// Create a new rasterizer using the built-in bitmap font.
    pub fn new(cell_width_px: usize, cell_height_px: usize) -> Self {
        Self::with_font(BitmapFontDriver::new(), cell_width_px, cell_height_px)
    }
}

impl<F: FontDriver> SoftwareRasterizer<F> {
    pub fn with_font(font: F, cell_width_px: usize, cell_height_px: usize) -> Self {
        debug!(
            "SoftwareRasterizer: {}x{} px cells",
            cell_width_px, cell_height_px
        );
        Self {
            glyph_cache: HashMap::new(),
            cell_width_px,
            cell_height_px,
            font,
        }
    }

    /// Render a single character cell to RGBA pixels
    pub fn render_cell(&mut self, ch: char, fg: Color, bg: Color) -> &RenderedGlyph {
        let key = GlyphKey {
            codepoint: ch,
            fg: fg.into(),
            bg: bg.into(),
        };
        let font = &self.font;
        let (width, height) = (self.cell_width_px, self.cell_height_px);
        self.glyph_cache.entry(key).or_insert_with_key(|key| {
            trace!("SoftwareRasterizer: cache miss for '{}'", key.codepoint);
            let glyph_id = font
                .find_glyph(key.codepoint)
                .unwrap_or_else(|| font.fallback_glyph());
            let coverage = font.rasterize_glyph(glyph_id, width, height);
            RenderedGlyph {
                width_px: width,
                height_px: height,
                rgba_data: colorize_glyph(&coverage, key.fg, key.bg),
            }
        })
    }

    /// Get cell dimensions
    pub fn cell_size(&self) -> (usize, usize) {
        (self.cell_width_px, self.cell_height_px)
    }

    pub fn cached_glyphs(&self) -> usize {
        self.glyph_cache.len()
    }

    /// Clear the glyph cache (e.g., when the cell size changes)
    pub fn clear_cache(&mut self) {
        self.glyph_cache.clear();
    }
}

/// Colorize a white-on-transparent glyph with fg/bg colors.
///
/// The alpha channel of the input is the glyph's coverage at each pixel.
fn colorize_glyph(white_glyph: &[u8], fg: Rgba, bg: Rgba) -> Vec<u8> {
    let mut result = Vec::with_capacity(white_glyph.len());
    for pixel in white_glyph.chunks_exact(4) {
        let alpha = pixel[3] as f32 / 255.0;

        // Blend foreground and background based on glyph alpha
        let r = (fg.r as f32 * alpha + bg.r as f32 * (1.0 - alpha)).round() as u8;
        let g = (fg.g as f32 * alpha + bg.g as f32 * (1.0 - alpha)).round() as u8;
        let b = (fg.b as f32 * alpha + bg.b as f32 * (1.0 - alpha)).round() as u8;

        result.extend_from_slice(&[r, g, b, 255]);
    }
    result
}

/// Compile RenderCommands into a framebuffer.
///
/// # Arguments
/// * `rasterizer` - The software rasterizer (owns the font and glyph cache)
/// * `commands` - Render commands from the Renderer
/// * `framebuffer` - The target RGBA pixel buffer (row-major, 4 bytes/pixel)
/// * `buffer_width_px` - Width of the framebuffer in pixels
/// * `buffer_height_px` - Height of the framebuffer in pixels
pub fn compile_into_buffer<F: FontDriver>(
    rasterizer: &mut SoftwareRasterizer<F>,
    commands: &[RenderCommand],
    framebuffer: &mut [u8],
    buffer_width_px: usize,
    buffer_height_px: usize,
) -> FrameSummary {
    let (cell_width_px, cell_height_px) = rasterizer.cell_size();
    let mut summary = FrameSummary::default();

    for cmd in commands {
        match cmd {
            RenderCommand::ClearAll { bg } => {
                let color_bytes = Rgba::from(*bg).to_bytes();
                trace!("rasterizer: ClearAll with bg={:?}", bg);
                for pixel in framebuffer.chunks_exact_mut(4) {
                    pixel.copy_from_slice(&color_bytes);
                }
            }
            RenderCommand::DrawGlyph { x, y, c, fg, bg } => {
                let glyph = rasterizer.render_cell(*c, *fg, *bg);
                blit_to_framebuffer(
                    framebuffer,
                    buffer_width_px,
                    buffer_height_px,
                    &glyph.rgba_data,
                    x * cell_width_px,
                    y * cell_height_px,
                    glyph.width_px,
                    glyph.height_px,
                );
                summary.glyphs_drawn += 1;
            }
            RenderCommand::DrawLabel {
                text,
                band_top,
                band_rows,
                fg,
                bg,
            } => {
                let text_width_px = text.chars().count() * cell_width_px;
                let band_height_px = band_rows * cell_height_px;
                let x0 = buffer_width_px.saturating_sub(text_width_px) / 2;
                let y0 = band_top * cell_height_px + band_height_px.saturating_sub(cell_height_px) / 2;
                debug!(
                    "rasterizer: DrawLabel '{}' at px ({}, {}) fg={:?}",
                    text, x0, y0, fg
                );
                for (i, ch) in text.chars().enumerate() {
                    let glyph = rasterizer.render_cell(ch, *fg, *bg);
                    blit_to_framebuffer(
                        framebuffer,
                        buffer_width_px,
                        buffer_height_px,
                        &glyph.rgba_data,
                        x0 + i * cell_width_px,
                        y0,
                        glyph.width_px,
                        glyph.height_px,
                    );
                }
                summary.label_drawn = true;
            }
            RenderCommand::PresentFrame => {
                summary.present = true;
            }
        }
    }

    debug!(
        "rasterizer: Compilation complete - {} commands, {} glyphs, {} cached",
        commands.len(),
        summary.glyphs_drawn,
        rasterizer.cached_glyphs()
    );
    summary
}

/// Helper function to blit a source buffer into a destination framebuffer
#[allow(clippy::too_many_arguments)]
fn blit_to_framebuffer(
    dest: &mut [u8],
    dest_width_px: usize,
    dest_height_px: usize,
    src: &[u8],
    dest_x_px: usize,
    dest_y_px: usize,
    src_width_px: usize,
    src_height_px: usize,
) {
    if dest_x_px >= dest_width_px {
        return;
    }
    for row in 0..src_height_px {
        let dest_y = dest_y_px + row;
        if dest_y >= dest_height_px {
            break;
        }

        let src_row_start = row * src_width_px * 4;
        let dest_row_start = (dest_y * dest_width_px + dest_x_px) * 4;
        let copy_width = src_width_px.min(dest_width_px - dest_x_px);

        if dest_row_start + copy_width * 4 <= dest.len()
            && src_row_start + copy_width * 4 <= src.len()
        {
            dest[dest_row_start..dest_row_start + copy_width * 4]
                .copy_from_slice(&src[src_row_start..src_row_start + copy_width * 4]);
        }
    }
}
