//! Glyph lookup and rasterization primitives.
//!
//! This module defines the `FontDriver` trait, the seam between the
//! `SoftwareRasterizer` and wherever glyph shapes come from.

/// Source of glyph coverage masks.
///
/// Implementors handle:
/// - Glyph lookup for characters
/// - A fallback glyph for characters they cannot draw
/// - Glyph rasterization to RGBA coverage
pub trait FontDriver {
    /// Driver-specific glyph handle.
    type GlyphId: Copy;

    /// Find a glyph for the given character.
    ///
    /// # Returns
    /// Some(glyph_id) if the font contains this character, None otherwise
    fn find_glyph(&self, ch: char) -> Option<Self::GlyphId>;

    /// Glyph drawn for characters `find_glyph` does not know.
    fn fallback_glyph(&self) -> Self::GlyphId;

    /// Rasterize a glyph to RGBA pixel data.
    ///
    /// # Arguments
    /// * `glyph_id` - Glyph to rasterize
    /// * `cell_width_px` - Target cell width in pixels
    /// * `cell_height_px` - Target cell height in pixels
    ///
    /// # Returns
    /// RGBA pixel data (4 bytes per pixel, row-major layout) with **straight (non-premultiplied) alpha**.
    /// The glyph should be rendered as white (255,255,255) on transparent background,
    /// with the alpha channel representing coverage.
    /// Length must be `cell_width_px * cell_height_px * 4`
    fn rasterize_glyph(
        &self,
        glyph_id: Self::GlyphId,
        cell_width_px: usize,
        cell_height_px: usize,
    ) -> Vec<u8>;
}
