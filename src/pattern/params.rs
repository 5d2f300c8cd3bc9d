// src/pattern/params.rs

//! Layer parameters derived from the primary hash.

use crate::animation::Sinusoid;

/// Byte view of a hex string, cycled so any index is valid.
///
/// Pairs of hex digits form one byte. A non-hex character contributes the low
/// nibble of its code point, so arbitrary strings still derive parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBytes {
    bytes: Vec<u8>,
}

impl HashBytes {
    pub fn from_hex(text: &str) -> Self {
        let nibbles: Vec<u8> = text.chars().map(nibble).collect();
        let mut bytes: Vec<u8> = nibbles
            .chunks(2)
            .map(|pair| match pair {
                [hi, lo] => (*hi << 4) | *lo,
                [single] => (*single << 4) | *single,
                _ => 0,
            })
            .collect();
        if bytes.is_empty() {
            bytes.push(0);
        }
        HashBytes { bytes }
    }

    pub fn byte(&self, index: usize) -> u8 {
        self.bytes[index % self.bytes.len()]
    }

    /// `byte(index)` scaled into `[0, 1]`.
    pub fn unit(&self, index: usize) -> f64 {
        self.byte(index) as f64 / 255.0
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn nibble(c: char) -> u8 {
    match c.to_digit(16) {
        Some(d) => d as u8,
        None => (c as u32 & 0xF) as u8,
    }
}

/// The decorative variation layer, one per visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variation {
    Striations,
    DataStreams,
    DiagonalAccents,
    SequenceHighlights,
}

impl Variation {
    pub fn from_byte(byte: u8) -> Self {
        match byte % 4 {
            0 => Variation::Striations,
            1 => Variation::DataStreams,
            2 => Variation::DiagonalAccents,
            _ => Variation::SequenceHighlights,
        }
    }
}

// Byte slots of the primary hash.
const FREQUENCY_BYTE: usize = 0;
const AMPLITUDE_BYTE: usize = 1;
const DIRECTION_BYTE: usize = 2;
const THICKNESS_BYTE: usize = 3;
const BASE_PAIR_BYTE: usize = 4;
const VARIATION_BYTE: usize = 5;
const SPACING_BYTE: usize = 6;
const OFFSET_BYTE: usize = 7;
const DENSITY_BYTE: usize = 8;
const BACKGROUND_BYTE: usize = 9;
const EMBED_BYTE: usize = 10;

/// Every tunable the layers read, fixed for a given primary hash and width.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternParams {
    pub sinusoid: Sinusoid,
    /// Strand half-thickness in cells, 1 or 2.
    pub strand_half_width: usize,
    /// Rows between base-pair connectors, 3 to 6.
    pub base_pair_interval: usize,
    pub variation: Variation,
    /// Raw byte the variation derives its spacing from.
    pub variation_spacing: u8,
    /// Raw byte the variation derives its phase/offset from.
    pub variation_offset: u8,
    /// Probability a variation cell is painted, 0.3 to 0.7.
    pub variation_density: f64,
    /// Probability a background cell is painted, 0.15 to 0.35.
    pub background_density: f64,
    /// Index shift into the hash for embedding jitter.
    pub embed_shift: usize,
}

impl PatternParams {
    pub fn derive(hash: &HashBytes, cols: usize) -> Self {
        let sinusoid = Sinusoid {
            frequency: 0.02 + hash.unit(FREQUENCY_BYTE) * 0.06,
            amplitude: cols as f64 * (0.12 + hash.unit(AMPLITUDE_BYTE) * 0.13),
            direction: if hash.byte(DIRECTION_BYTE) % 2 == 0 { 1.0 } else { -1.0 },
        };
        PatternParams {
            sinusoid,
            strand_half_width: 1 + (hash.byte(THICKNESS_BYTE) % 2) as usize,
            base_pair_interval: 3 + (hash.byte(BASE_PAIR_BYTE) % 4) as usize,
            variation: Variation::from_byte(hash.byte(VARIATION_BYTE)),
            variation_spacing: hash.byte(SPACING_BYTE),
            variation_offset: hash.byte(OFFSET_BYTE),
            variation_density: 0.3 + hash.unit(DENSITY_BYTE) * 0.4,
            background_density: 0.15 + hash.unit(BACKGROUND_BYTE) * 0.2,
            embed_shift: hash.byte(EMBED_BYTE) as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_pairs_become_bytes() {
        let hash = HashBytes::from_hex("2d9df1");
        assert_eq!(hash.len(), 3);
        assert_eq!(hash.byte(0), 0x2d);
        assert_eq!(hash.byte(1), 0x9d);
        assert_eq!(hash.byte(2), 0xf1);
        assert_eq!(hash.byte(3), 0x2d);
    }

    #[test]
    fn empty_and_odd_inputs_never_panic() {
        assert_eq!(HashBytes::from_hex("").byte(7), 0);
        assert_eq!(HashBytes::from_hex("a").byte(0), 0xaa);
        let _ = HashBytes::from_hex("zz-not-hex").byte(99);
    }

    #[test]
    fn params_stay_in_documented_ranges() {
        for seed in ["", "00", "ff", "2d9df1a1efb7b791ed7a621a2ac81ce4", "0123456789abcdef"] {
            let params = PatternParams::derive(&HashBytes::from_hex(seed), 120);
            let eps = 1e-9;
            assert!((0.02 - eps..=0.08 + eps).contains(&params.sinusoid.frequency));
            assert!((14.4 - eps..=30.0 + eps).contains(&params.sinusoid.amplitude));
            assert!(params.sinusoid.direction.abs() == 1.0);
            assert!((1..=2).contains(&params.strand_half_width));
            assert!((3..=6).contains(&params.base_pair_interval));
            assert!((0.3 - eps..=0.7 + eps).contains(&params.variation_density));
            assert!((0.15 - eps..=0.35 + eps).contains(&params.background_density));
        }
    }

    #[test]
    fn variation_selected_by_byte_mod_four() {
        assert_eq!(Variation::from_byte(4), Variation::Striations);
        assert_eq!(Variation::from_byte(5), Variation::DataStreams);
        assert_eq!(Variation::from_byte(6), Variation::DiagonalAccents);
        assert_eq!(Variation::from_byte(7), Variation::SequenceHighlights);
    }
}
