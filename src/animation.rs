// src/animation.rs

//! Animation styles and per-session animation state.
//!
//! A style decides how `phase` and `flow_offset` displace the helix strands
//! (or, for `Pulse`, the global brightness). The compositor asks this module
//! for the strand angle of each row; the session asks it to advance state
//! once per frame.

use crate::config::AnimationConfig;
use crate::prng::SeededRandom;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Fixed phase shift used by `Pulse`, whose strands do not move.
pub const PULSE_PHASE_SHIFT: f64 = PI / 4.0;

/// Base brightness fed into the pulse formula.
pub const PULSE_BASE_BRIGHTNESS: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStyle {
    /// Helix turns about its vertical axis; only `phase` advances.
    Rotate,
    /// Pattern scrolls downward; only `flow_offset` advances.
    Flow,
    /// Rotation and flow together.
    Combined,
    /// Static strands, breathing brightness driven by `phase`.
    Pulse,
}

impl AnimationStyle {
    pub const ALL: [AnimationStyle; 4] = [
        AnimationStyle::Rotate,
        AnimationStyle::Flow,
        AnimationStyle::Combined,
        AnimationStyle::Pulse,
    ];

    /// Picks a style from a random stream.
    pub fn pick(rng: &mut SeededRandom) -> Self {
        Self::ALL[rng.range_usize(0, Self::ALL.len())]
    }

    fn uses_flow(&self) -> bool {
        matches!(self, AnimationStyle::Flow | AnimationStyle::Combined)
    }

    fn uses_phase_angle(&self) -> bool {
        matches!(self, AnimationStyle::Rotate | AnimationStyle::Combined)
    }
}

impl fmt::Display for AnimationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnimationStyle::Rotate => "rotate",
            AnimationStyle::Flow => "flow",
            AnimationStyle::Combined => "combined",
            AnimationStyle::Pulse => "pulse",
        };
        f.write_str(name)
    }
}

impl FromStr for AnimationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rotate" => Ok(AnimationStyle::Rotate),
            "flow" => Ok(AnimationStyle::Flow),
            "combined" => Ok(AnimationStyle::Combined),
            "pulse" => Ok(AnimationStyle::Pulse),
            other => Err(format!("unknown animation style '{}'", other)),
        }
    }
}

/// The two unbounded counters of a running animation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    /// Radians.
    pub phase: f64,
    pub flow_offset: f64,
}

impl AnimationState {
    pub fn new(phase: f64, flow_offset: f64) -> Self {
        AnimationState { phase, flow_offset }
    }

    /// Advances the counters the style animates.
    pub fn advance(&mut self, style: AnimationStyle, steps: &AnimationConfig) {
        match style {
            AnimationStyle::Rotate => self.phase += steps.phase_step,
            AnimationStyle::Flow => self.flow_offset += steps.flow_step,
            AnimationStyle::Combined => {
                self.phase += steps.phase_step;
                self.flow_offset += steps.flow_step;
            }
            AnimationStyle::Pulse => self.phase += steps.pulse_step,
        }
    }

    pub fn reset(&mut self) {
        *self = AnimationState::default();
    }
}

/// Sinusoid shape shared by the helix and the source-text embedding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sinusoid {
    /// Row frequency; a row contributes `row * frequency * π` radians.
    pub frequency: f64,
    /// Horizontal strand excursion in cells.
    pub amplitude: f64,
    /// `1.0` or `-1.0`.
    pub direction: f64,
}

impl Sinusoid {
    /// Strand angle for `row` under `style` at `state`.
    pub fn angle(
        &self,
        style: AnimationStyle,
        state: &AnimationState,
        row: usize,
        row_count: usize,
    ) -> f64 {
        let effective_row = if style.uses_flow() {
            let period = (2 * row_count.max(1)) as f64;
            (row as f64 + state.flow_offset).rem_euclid(period)
        } else {
            row as f64
        };
        let base = if style.uses_phase_angle() {
            state.phase
        } else if style == AnimationStyle::Pulse {
            PULSE_PHASE_SHIFT
        } else {
            0.0
        };
        self.direction * (base + effective_row * self.frequency * PI)
    }

    /// Horizontal offset of the first strand from the grid's center column.
    /// The second strand sits at the mirrored offset.
    pub fn strand_offset(
        &self,
        style: AnimationStyle,
        state: &AnimationState,
        row: usize,
        row_count: usize,
    ) -> f64 {
        self.amplitude * self.angle(style, state, row, row_count).sin()
    }
}

/// Global brightness multiplier applied to the motif and variation layers.
pub fn pulse_factor(style: AnimationStyle, state: &AnimationState) -> f64 {
    match style {
        AnimationStyle::Pulse => {
            0.5 + 0.5 * PULSE_BASE_BRIGHTNESS * ((state.phase.sin() + 1.0) / 2.0)
        }
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sinusoid() -> Sinusoid {
        Sinusoid {
            frequency: 0.043,
            amplitude: 20.0,
            direction: 1.0,
        }
    }

    #[test]
    fn style_names_roundtrip() {
        for style in AnimationStyle::ALL {
            assert_eq!(style.to_string().parse::<AnimationStyle>(), Ok(style));
        }
        assert!("spin".parse::<AnimationStyle>().is_err());
    }

    #[test]
    fn advance_touches_only_the_animated_counters() {
        let steps = AnimationConfig::default();

        let mut rotate = AnimationState::default();
        rotate.advance(AnimationStyle::Rotate, &steps);
        assert!(rotate.phase > 0.0);
        assert_eq!(rotate.flow_offset, 0.0);

        let mut flow = AnimationState::default();
        flow.advance(AnimationStyle::Flow, &steps);
        assert_eq!(flow.phase, 0.0);
        assert!(flow.flow_offset > 0.0);

        let mut combined = AnimationState::default();
        combined.advance(AnimationStyle::Combined, &steps);
        assert!(combined.phase > 0.0 && combined.flow_offset > 0.0);

        let mut pulse = AnimationState::default();
        pulse.advance(AnimationStyle::Pulse, &steps);
        assert!(pulse.phase > 0.0);
        assert_eq!(pulse.flow_offset, 0.0);
    }

    #[test]
    fn pulse_strands_ignore_phase() {
        let s = sinusoid();
        let a = s.strand_offset(AnimationStyle::Pulse, &AnimationState::new(0.0, 0.0), 10, 53);
        let b = s.strand_offset(AnimationStyle::Pulse, &AnimationState::new(2.7, 9.0), 10, 53);
        assert_eq!(a, b);
    }

    #[test]
    fn pulse_factor_worked_values() {
        let at = |phase: f64| pulse_factor(AnimationStyle::Pulse, &AnimationState::new(phase, 0.0));
        assert!((at(PI) - 0.75).abs() < 1e-9);
        assert!((at(PI / 2.0) - 1.0).abs() < 1e-9);
        assert!((at(3.0 * PI / 2.0) - 0.5).abs() < 1e-9);
        assert_eq!(
            pulse_factor(AnimationStyle::Rotate, &AnimationState::new(PI, 0.0)),
            1.0
        );
    }

    #[test]
    fn flow_wraps_with_period_twice_row_count() {
        let s = sinusoid();
        let rows = 20;
        let a = s.angle(AnimationStyle::Flow, &AnimationState::new(0.0, 3.0), 5, rows);
        let b = s.angle(AnimationStyle::Flow, &AnimationState::new(0.0, 43.0), 5, rows);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn rotate_matches_formula() {
        let s = sinusoid();
        let state = AnimationState::new(0.3, 0.0);
        let expected = 20.0 * (0.3 + 7.0 * 0.043 * PI).sin();
        let got = s.strand_offset(AnimationStyle::Rotate, &state, 7, 53);
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn styles_are_pairwise_distinct() {
        let s = sinusoid();
        let state = AnimationState::new(1.0, 5.0);
        let rows = 53;
        let sequences: Vec<Vec<f64>> = AnimationStyle::ALL
            .iter()
            .map(|style| (0..rows).map(|r| s.strand_offset(*style, &state, r, rows)).collect())
            .collect();
        for i in 0..sequences.len() {
            for j in (i + 1)..sequences.len() {
                assert_ne!(sequences[i], sequences[j], "styles {} and {}", i, j);
            }
        }
    }

    #[test]
    fn pick_is_deterministic_per_seed() {
        let a = AnimationStyle::pick(&mut SeededRandom::new("style"));
        let b = AnimationStyle::pick(&mut SeededRandom::new("style"));
        assert_eq!(a, b);
    }
}
