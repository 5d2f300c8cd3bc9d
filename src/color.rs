// src/color.rs

//! Defines the background palette (`NamedColor`), the `Color` value type, and
//! the brightness-to-foreground blending used by the renderer.

use log::warn;
use serde::{Deserialize, Serialize};

/// The closed set of background color names a visualization may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Purple,
    Pink,
    Brown,
    Black,
    White,
    Gray,
}

/// Name used when a requested background is unknown.
pub const FALLBACK_BACKGROUND: NamedColor = NamedColor::Gray;

impl NamedColor {
    pub const ALL: [NamedColor; 12] = [
        NamedColor::Red,
        NamedColor::Orange,
        NamedColor::Yellow,
        NamedColor::Green,
        NamedColor::Teal,
        NamedColor::Blue,
        NamedColor::Purple,
        NamedColor::Pink,
        NamedColor::Brown,
        NamedColor::Black,
        NamedColor::White,
        NamedColor::Gray,
    ];

    /// Looks up a palette entry by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "red" => Some(NamedColor::Red),
            "orange" => Some(NamedColor::Orange),
            "yellow" => Some(NamedColor::Yellow),
            "green" => Some(NamedColor::Green),
            "teal" | "cyan" => Some(NamedColor::Teal),
            "blue" => Some(NamedColor::Blue),
            "purple" | "violet" => Some(NamedColor::Purple),
            "pink" => Some(NamedColor::Pink),
            "brown" => Some(NamedColor::Brown),
            "black" => Some(NamedColor::Black),
            "white" => Some(NamedColor::White),
            "gray" | "grey" => Some(NamedColor::Gray),
            _ => None,
        }
    }

    /// Like `from_name`, but unknown names resolve to the gray fallback.
    pub fn from_name_or_fallback(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(
                "Unknown background color '{}'. Falling back to {:?}.",
                name, FALLBACK_BACKGROUND
            );
            FALLBACK_BACKGROUND
        })
    }

    /// Returns the RGB representation of this palette entry.
    pub fn to_rgb_color(&self) -> Color {
        match self {
            NamedColor::Red => Color::Rgb(0xE5, 0x39, 0x35),
            NamedColor::Orange => Color::Rgb(0xFB, 0x8C, 0x00),
            NamedColor::Yellow => Color::Rgb(0xFD, 0xD8, 0x35),
            NamedColor::Green => Color::Rgb(0x43, 0xA0, 0x47),
            NamedColor::Teal => Color::Rgb(0x00, 0x89, 0x7B),
            NamedColor::Blue => Color::Rgb(0x1E, 0x88, 0xE5),
            NamedColor::Purple => Color::Rgb(0x8E, 0x24, 0xAA),
            NamedColor::Pink => Color::Rgb(0xF4, 0x8F, 0xB1),
            NamedColor::Brown => Color::Rgb(0x6D, 0x4C, 0x41),
            NamedColor::Black => Color::Rgb(0x12, 0x12, 0x12),
            NamedColor::White => Color::Rgb(0xF5, 0xF5, 0xF5),
            NamedColor::Gray => Color::Rgb(0x75, 0x75, 0x75),
        }
    }
}

/// A concrete color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// A palette entry, resolved through `NamedColor::to_rgb_color`.
    Named(NamedColor),
    /// An RGB true color, with each component from 0 to 255.
    Rgb(u8, u8, u8),
}

impl Default for Color {
    fn default() -> Self {
        FALLBACK_BACKGROUND.to_rgb_color()
    }
}

const BLACK: (u8, u8, u8) = (0, 0, 0);
const WHITE: (u8, u8, u8) = (255, 255, 255);

/// Backgrounds above this relative luminance count as light.
const LIGHT_LUMINANCE_THRESHOLD: f32 = 0.5;

impl Color {
    /// Resolves to an `(r, g, b)` triple.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        match self {
            Color::Named(named) => named.to_rgb_color().to_rgb(),
            Color::Rgb(r, g, b) => (*r, *g, *b),
        }
    }

    /// Perceived luminance in `[0, 1]` (Rec. 601 weights).
    pub fn luminance(&self) -> f32 {
        let (r, g, b) = self.to_rgb();
        (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
    }

    pub fn is_light(&self) -> bool {
        self.luminance() > LIGHT_LUMINANCE_THRESHOLD
    }

    /// The solid contrasting color used for labels drawn over this background.
    pub fn contrasting(&self) -> Color {
        if self.is_light() {
            Color::Rgb(BLACK.0, BLACK.1, BLACK.2)
        } else {
            Color::Rgb(WHITE.0, WHITE.1, WHITE.2)
        }
    }
}

/// Foreground color for a cell of the given brightness over `background`.
///
/// Light backgrounds are darkened toward black, dark backgrounds brightened
/// toward white, linearly in `brightness` (clamped to `[0, 1]`).
pub fn blend_for_brightness(background: Color, brightness: f32) -> Color {
    let t = brightness.clamp(0.0, 1.0);
    let target = if background.is_light() { BLACK } else { WHITE };
    let (r, g, b) = background.to_rgb();
    Color::Rgb(lerp_u8(r, target.0, t), lerp_u8(g, target.1, t), lerp_u8(b, target.2, t))
}

fn lerp_u8(from: u8, to: u8, t: f32) -> u8 {
    let v = from as f32 + (to as f32 - from as f32) * t;
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_palette_name_resolves() {
        for named in NamedColor::ALL {
            let name = format!("{:?}", named).to_lowercase();
            assert_eq!(NamedColor::from_name(&name), Some(named));
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(NamedColor::from_name(" RED "), Some(NamedColor::Red));
        assert_eq!(NamedColor::from_name("Grey"), Some(NamedColor::Gray));
    }

    #[test]
    fn unknown_name_falls_back_to_gray() {
        assert_eq!(NamedColor::from_name("chartreuse"), None);
        assert_eq!(
            NamedColor::from_name_or_fallback("chartreuse"),
            NamedColor::Gray
        );
    }

    #[test]
    fn light_and_dark_classification() {
        assert!(Color::Named(NamedColor::White).is_light());
        assert!(Color::Named(NamedColor::Yellow).is_light());
        assert!(!Color::Named(NamedColor::Black).is_light());
        assert!(!Color::Named(NamedColor::Red).is_light());
    }

    #[test]
    fn blend_zero_brightness_is_background() {
        let bg = Color::Named(NamedColor::Blue);
        assert_eq!(blend_for_brightness(bg, 0.0).to_rgb(), bg.to_rgb());
    }

    #[test]
    fn blend_full_brightness_hits_target() {
        assert_eq!(
            blend_for_brightness(Color::Named(NamedColor::Black), 1.0).to_rgb(),
            WHITE
        );
        assert_eq!(
            blend_for_brightness(Color::Named(NamedColor::White), 1.0).to_rgb(),
            BLACK
        );
    }

    #[test]
    fn blend_is_monotonic_on_dark_background() {
        let bg = Color::Named(NamedColor::Purple);
        let mut last = 0u32;
        for step in 0..=10 {
            let (r, g, b) = blend_for_brightness(bg, step as f32 / 10.0).to_rgb();
            let sum = r as u32 + g as u32 + b as u32;
            assert!(sum >= last);
            last = sum;
        }
    }

    #[test]
    fn blend_clamps_out_of_range_brightness() {
        let bg = Color::Named(NamedColor::Green);
        assert_eq!(blend_for_brightness(bg, 7.0), blend_for_brightness(bg, 1.0));
        assert_eq!(blend_for_brightness(bg, -1.0), blend_for_brightness(bg, 0.0));
    }

    #[test]
    fn contrasting_label_color() {
        assert_eq!(Color::Named(NamedColor::White).contrasting().to_rgb(), BLACK);
        assert_eq!(Color::Named(NamedColor::Red).contrasting().to_rgb(), WHITE);
    }
}
