// src/pattern/tests.rs

use super::*;
use crate::glyph::{Cell, LayerFlags};
use crate::input::VisualizationInput;

fn reference() -> HelixCompositor {
    HelixCompositor::new(VisualizationInput::reference().validate().unwrap())
}

fn frame(compositor: &HelixCompositor, cols: usize, rows: usize, style: AnimationStyle, state: AnimationState) -> Grid {
    let mut grid = Grid::new(cols, rows);
    compositor.compose(&mut grid, style, &state);
    grid
}

#[test_log::test]
fn same_input_and_state_gives_identical_grids() {
    let compositor = reference();
    let state = AnimationState::new(1.3, 7.5);
    for style in AnimationStyle::ALL {
        let a = frame(&compositor, 64, 32, style, state);
        let b = frame(&reference(), 64, 32, style, state);
        assert_eq!(a, b, "{style} is not deterministic");
    }
}

#[test_log::test]
fn recomposing_into_a_dirty_grid_matches_a_fresh_one() {
    let compositor = reference();
    let mut grid = Grid::new(64, 32);
    compositor.compose(&mut grid, AnimationStyle::Flow, &AnimationState::new(0.0, 99.0));
    compositor.compose(&mut grid, AnimationStyle::Rotate, &AnimationState::new(0.4, 0.0));
    let fresh = frame(&compositor, 64, 32, AnimationStyle::Rotate, AnimationState::new(0.4, 0.0));
    assert_eq!(grid, fresh);
}

#[test_log::test]
fn brightness_stays_in_unit_interval() {
    let compositor = reference();
    for style in AnimationStyle::ALL {
        for step in 0..12 {
            let state = AnimationState::new(step as f64 * 0.9, step as f64 * 3.25);
            let grid = frame(&compositor, 120, 60, style, state);
            assert!(grid
                .cells()
                .iter()
                .all(|c| (0.0..=1.0).contains(&c.brightness)));
        }
    }
}

#[test_log::test]
fn footer_rows_are_left_blank_by_every_layer() {
    let compositor = reference();
    let layers = LayerFlags::BACKGROUND | LayerFlags::MOTIF | LayerFlags::VARIATION | LayerFlags::EMBEDDED;
    for style in AnimationStyle::ALL {
        let grid = frame(&compositor, 64, 32, style, AnimationState::new(2.0, 11.0));
        for row in grid.footer_start()..grid.rows() {
            assert!(!grid.row_touched_by(row, layers), "{style} wrote footer row {row}");
            assert!(grid.row(row).unwrap().iter().all(Cell::is_blank));
        }
    }
}

#[test_log::test]
fn full_preset_combined_example() {
    let compositor = reference();
    let grid = frame(&compositor, 120, 60, AnimationStyle::Combined, AnimationState::new(0.6, 4.0));
    assert_eq!(grid.content_rows(), 53);
    for row in 53..60 {
        assert!(!grid.row_touched_by(row, LayerFlags::MOTIF | LayerFlags::VARIATION));
    }
    let bright_motif = grid
        .iter()
        .any(|(_, _, c)| c.layers.contains(LayerFlags::MOTIF) && c.brightness >= 0.9);
    assert!(bright_motif);
}

#[test_log::test]
fn every_source_character_is_visible() {
    let compositor = reference();
    let grid = frame(&compositor, 120, 60, AnimationStyle::Rotate, AnimationState::default());
    let expected = compositor
        .input()
        .source_text()
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();
    let embedded: Vec<&Cell> = grid
        .cells()
        .iter()
        .filter(|c| c.layers.contains(LayerFlags::EMBEDDED))
        .collect();
    assert_eq!(embedded.len(), expected);
    assert!(embedded.iter().all(|c| c.brightness == 1.0));
}

#[test_log::test]
fn clustered_hash_still_shows_every_source_character() {
    let mut raw = VisualizationInput::reference();
    raw.primary_hash = Some("0000000000000000".into());
    let compositor = HelixCompositor::new(raw.validate().unwrap());
    let grid = frame(&compositor, 64, 32, AnimationStyle::Rotate, AnimationState::default());
    let expected = compositor
        .input()
        .source_text()
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();
    let embedded = grid
        .cells()
        .iter()
        .filter(|c| c.layers.contains(LayerFlags::EMBEDDED))
        .count();
    assert_eq!(embedded, expected);
}

#[test_log::test]
fn small_grids_do_not_panic() {
    let compositor = reference();
    for (cols, rows) in [(0, 0), (1, 1), (1, 8), (3, 7), (5, 9), (2, 40)] {
        let grid = frame(&compositor, cols, rows, AnimationStyle::Combined, AnimationState::new(1.0, 1.0));
        assert_eq!(grid.dimensions(), (cols, rows));
    }
}

#[test_log::test]
fn styles_move_the_strands_differently() {
    let compositor = reference();
    let params = compositor.params(120);
    let state = AnimationState::new(1.0, 5.0);
    let rows = 53;
    let tracks: Vec<Vec<(f64, f64)>> = AnimationStyle::ALL
        .iter()
        .map(|&style| {
            (0..rows)
                .map(|row| helix::strand_positions(&params, style, &state, row, rows, 120))
                .collect()
        })
        .collect();
    for i in 0..tracks.len() {
        for j in (i + 1)..tracks.len() {
            assert_ne!(tracks[i], tracks[j]);
        }
    }
}

#[test_log::test]
fn pulse_dims_the_motif_but_not_the_embedding() {
    let compositor = reference();
    let full = frame(&compositor, 120, 60, AnimationStyle::Pulse, AnimationState::new(std::f64::consts::FRAC_PI_2, 0.0));
    let dim = frame(&compositor, 120, 60, AnimationStyle::Pulse, AnimationState::new(3.0 * std::f64::consts::FRAC_PI_2, 0.0));

    let brightest_motif = |grid: &Grid| {
        grid.cells()
            .iter()
            .filter(|c| c.layers.contains(LayerFlags::MOTIF) && !c.layers.contains(LayerFlags::EMBEDDED))
            .map(|c| c.brightness)
            .fold(0.0f32, f32::max)
    };
    assert!(brightest_motif(&full) > 0.95);
    assert!(brightest_motif(&dim) <= 0.5 + 1e-6);
    assert!(dim
        .cells()
        .iter()
        .filter(|c| c.layers.contains(LayerFlags::EMBEDDED))
        .all(|c| c.brightness == 1.0));
}

#[test_log::test]
fn different_hashes_give_different_frames() {
    let mut raw = VisualizationInput::reference();
    raw.primary_hash = Some("00112233445566778899aabbccddeeff".into());
    let other = HelixCompositor::new(raw.validate().unwrap());
    let state = AnimationState::default();
    assert_ne!(
        frame(&reference(), 64, 32, AnimationStyle::Rotate, state),
        frame(&other, 64, 32, AnimationStyle::Rotate, state)
    );
}

#[test_log::test]
fn visualization_trait_delegates_to_compose() {
    let mut compositor = reference();
    let mut via_trait = Grid::new(64, 32);
    let state = AnimationState::new(0.25, 2.0);
    Visualization::paint(&mut compositor, &mut via_trait, AnimationStyle::Combined, &state);
    assert_eq!(via_trait, frame(&compositor, 64, 32, AnimationStyle::Combined, state));
    assert_eq!(compositor.name(), "helix");
}
