// src/prng.rs

//! String-seeded pseudo-random number generator.
//!
//! Two 32-bit multiply-with-carry words are initialized from fixed constants,
//! have every UTF-16 code unit of the seed folded in with shift-and-XOR mixing,
//! and are then stepped independently. Their combination is normalized to
//! `[0, 1)` through a signed reinterpretation plus a `0.5` bias.
//!
//! **Determinism is the only contract.** The same seed string always yields
//! the same sequence on every platform. The stepping uses integer arithmetic
//! only; the single float operation is the final normalization.

use serde::{Deserialize, Serialize};

const INITIAL_W: u32 = 123_456_789;
const INITIAL_Z: u32 = 987_654_321;

/// Normalization divisor: 2^32.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic generator derived from a string seed.
///
/// Each visualization owns its own instance. To replay a sequence, derive a
/// fresh generator from the same seed; there is no reseed-in-place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededRandom {
    m_w: u32,
    m_z: u32,
}

impl SeededRandom {
    /// Derive a generator from `seed`. An empty seed folds as a single NUL.
    pub fn new(seed: &str) -> Self {
        let mut m_w = INITIAL_W;
        let mut m_z = INITIAL_Z;

        let mut fold = |unit: u32| {
            m_w = (m_w << 5) ^ (m_w >> 27) ^ unit;
            m_z = (m_z << 7) ^ (m_z >> 25) ^ unit;
        };

        if seed.is_empty() {
            fold(0);
        } else {
            for unit in seed.encode_utf16() {
                fold(unit as u32);
            }
        }

        // A zero word never leaves zero under multiply-with-carry.
        Self {
            m_w: if m_w == 0 { INITIAL_W } else { m_w },
            m_z: if m_z == 0 { INITIAL_Z } else { m_z },
        }
    }

    /// Advance both words and return the combined 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.m_z = 36969u32
            .wrapping_mul(self.m_z & 0xFFFF)
            .wrapping_add(self.m_z >> 16);
        self.m_w = 18000u32
            .wrapping_mul(self.m_w & 0xFFFF)
            .wrapping_add(self.m_w >> 16);
        (self.m_z << 16).wrapping_add(self.m_w)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let signed = self.next_u32() as i32;
        signed as f64 / TWO_POW_32 + 0.5
    }

    /// Uniform value in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_f64(&mut self, low: f64, high: f64) -> f64 {
        assert!(low < high, "range_f64: low must be less than high");
        low + self.next_f64() * (high - low)
    }

    /// Uniform index in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        assert!(low < high, "range_usize: low must be less than high");
        let span = high - low;
        // next_f64 < 1.0, but guard the float edge anyway.
        low + ((self.next_f64() * span as f64) as usize).min(span - 1)
    }

    /// `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Pick one element of a non-empty slice. Returns `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.range_usize(0, items.len()))
    }
}
