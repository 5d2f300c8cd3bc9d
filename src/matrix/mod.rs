// src/matrix/mod.rs

//! The word-matrix cube.
//!
//! Seed words sit on the 26 surface positions of a 3×3×3 lattice. The cube
//! spins slowly with `phase` while seed-driven layer turns play one after
//! another: the turning layer's words move into a turn group, the group
//! rotates through a quarter turn, and the words move back to the root group
//! with their positions snapped to the lattice.
//!
//! The frame is a function of `phase`: painting an earlier phase than the
//! last one rebuilds the cube from scratch and replays the turns.

pub mod scene;

use crate::animation::{AnimationState, AnimationStyle};
use crate::glyph::{Cell, LayerFlags};
use crate::grid::Grid;
use crate::pattern::Visualization;
use crate::prng::SeededRandom;
use glam::{Mat3, Vec3};
use log::{debug, trace};
use scene::{EntityId, GroupId, Scene, SceneError};
use std::f32::consts::FRAC_PI_2;

/// Phase (radians) spent on one quarter turn.
pub const TURN_PHASE: f64 = 1.5;
/// Root spin per radian of phase.
const SPIN_RATE: f32 = 0.35;
const TILT: f32 = -0.45;
const NEAR_BRIGHTNESS: f32 = 1.0;
const FAR_BRIGHTNESS: f32 = 0.35;
/// Largest distance of a lattice corner from the center.
const CUBE_RADIUS: f32 = 1.732_050_8;
const FALLBACK_WORD: &str = "seed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn component(self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    fn rotation(self, angle: f32) -> Mat3 {
        match self {
            Axis::X => Mat3::from_rotation_x(angle),
            Axis::Y => Mat3::from_rotation_y(angle),
            Axis::Z => Mat3::from_rotation_z(angle),
        }
    }
}

/// One quarter turn of a lattice layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub axis: Axis,
    /// -1, 0 or 1.
    pub layer: i32,
    /// +1 or -1.
    pub direction: i32,
}

impl Turn {
    fn pick(rng: &mut SeededRandom) -> Self {
        let axis = [Axis::X, Axis::Y, Axis::Z][rng.range_usize(0, 3)];
        let layer = rng.range_usize(0, 3) as i32 - 1;
        let direction = if rng.chance(0.5) { 1 } else { -1 };
        Turn {
            axis,
            layer,
            direction,
        }
    }

    fn rotation(&self, progress: f32) -> Mat3 {
        self.axis
            .rotation(self.direction as f32 * FRAC_PI_2 * progress.clamp(0.0, 1.0))
    }
}

/// The 26 surface positions of a 3×3×3 lattice, in a fixed order.
pub fn lattice_positions() -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(26);
    for x in -1..=1 {
        for y in -1..=1 {
            for z in -1..=1 {
                if (x, y, z) != (0, 0, 0) {
                    positions.push(Vec3::new(x as f32, y as f32, z as f32));
                }
            }
        }
    }
    positions
}

fn snap(v: Vec3) -> Vec3 {
    Vec3::new(v.x.round(), v.y.round(), v.z.round())
}

pub struct WordCube {
    seed: String,
    words: Vec<String>,
    scene: Scene,
    turn_group: GroupId,
    rng: SeededRandom,
    active: Option<Turn>,
    turns_completed: u64,
}

impl WordCube {
    /// Builds the cube from the words of `seed_phrase`, cycled over the 26
    /// lattice positions.
    pub fn new(seed_phrase: &str) -> Result<Self, SceneError> {
        let mut words: Vec<String> = seed_phrase.split_whitespace().map(str::to_string).collect();
        if words.is_empty() {
            words.push(FALLBACK_WORD.to_string());
        }
        let mut scene = Scene::new();
        let turn_group = scene.add_group(Mat3::IDENTITY);
        let mut cube = WordCube {
            seed: seed_phrase.to_string(),
            words,
            scene,
            turn_group,
            rng: SeededRandom::new(seed_phrase),
            active: None,
            turns_completed: 0,
        };
        cube.populate()?;
        Ok(cube)
    }

    fn populate(&mut self) -> Result<(), SceneError> {
        let root = self.scene.root();
        for (i, position) in lattice_positions().into_iter().enumerate() {
            let word = &self.words[i % self.words.len()];
            self.scene.add_entity(root, word.clone(), position)?;
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SceneError> {
        debug!("WordCube: phase moved backward, rebuilding");
        *self = WordCube::new(&self.seed.clone())?;
        Ok(())
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn turns_completed(&self) -> u64 {
        self.turns_completed
    }

    pub fn active_turn(&self) -> Option<Turn> {
        self.active
    }

    fn root_rotation(phase: f64) -> Mat3 {
        Mat3::from_rotation_x(TILT) * Mat3::from_rotation_y(phase as f32 * SPIN_RATE)
    }

    /// Picks the next turn and moves its layer into the turn group.
    fn begin_turn(&mut self, root_rotation: Mat3) -> Result<Turn, SceneError> {
        let turn = Turn::pick(&mut self.rng);
        let root = self.scene.root();
        self.scene.set_rotation(root, root_rotation)?;
        self.scene.set_rotation(self.turn_group, root_rotation)?;
        let layer: Vec<EntityId> = self
            .scene
            .group(root)?
            .members()
            .iter()
            .copied()
            .filter(|&e| {
                self.scene
                    .entity(e)
                    .map(|ent| turn.axis.component(ent.local).round() as i32 == turn.layer)
                    .unwrap_or(false)
            })
            .collect();
        for &e in &layer {
            self.scene.reparent(e, self.turn_group)?;
            // both groups share a rotation here, so the lattice point is unchanged
            let entity = self.scene.entity_mut(e)?;
            entity.local = snap(entity.local);
        }
        trace!("WordCube: turn {:?} moves {} words", turn, layer.len());
        self.active = Some(turn);
        Ok(turn)
    }

    /// Completes the active turn and returns its words to the root, snapped.
    fn finish_turn(&mut self, root_rotation: Mat3) -> Result<(), SceneError> {
        let Some(turn) = self.active.take() else {
            return Ok(());
        };
        let root = self.scene.root();
        self.scene.set_rotation(root, root_rotation)?;
        self.scene
            .set_rotation(self.turn_group, root_rotation * turn.rotation(1.0))?;
        let members = self.scene.group(self.turn_group)?.members().to_vec();
        for e in members {
            self.scene.reparent(e, root)?;
            let entity = self.scene.entity_mut(e)?;
            entity.local = snap(entity.local);
        }
        self.turns_completed += 1;
        Ok(())
    }

    /// Brings the scene to `phase`.
    pub fn advance_to(&mut self, phase: f64) -> Result<(), SceneError> {
        let position = phase.max(0.0) / TURN_PHASE;
        let target = position.floor() as u64;
        let progress = position.fract() as f32;
        if target < self.turns_completed {
            self.reset()?;
        }
        let root_rotation = Self::root_rotation(phase);

        while self.turns_completed < target {
            if self.active.is_none() {
                self.begin_turn(root_rotation)?;
            }
            self.finish_turn(root_rotation)?;
        }

        let turn = match self.active {
            Some(turn) => turn,
            None => self.begin_turn(root_rotation)?,
        };
        let root = self.scene.root();
        self.scene.set_rotation(root, root_rotation)?;
        self.scene
            .set_rotation(self.turn_group, root_rotation * turn.rotation(progress))?;
        Ok(())
    }

    /// Projects every word onto the grid's content rows, far words first.
    fn draw(&self, grid: &mut Grid) {
        let cols = grid.cols();
        let rows = grid.content_rows();
        if cols == 0 || rows == 0 {
            return;
        }
        let longest = self.words.iter().map(|w| w.chars().count()).max().unwrap_or(0) as f32;
        let scale = ((cols as f32 - longest) / 3.6).min(rows as f32 / 2.0).max(0.0);
        let cx = (cols as f32 - 1.0) / 2.0;
        let cy = (rows as f32 - 1.0) / 2.0;

        let mut placed: Vec<(Vec3, &str)> = self
            .scene
            .entity_ids()
            .filter_map(|e| {
                let world = self.scene.world_position(e).ok()?;
                let label = self.scene.entity(e).ok()?.label.as_str();
                Some((world, label))
            })
            .collect();
        placed.sort_by(|a, b| a.0.z.total_cmp(&b.0.z));

        for (world, label) in placed {
            let depth = ((world.z + CUBE_RADIUS) / (2.0 * CUBE_RADIUS)).clamp(0.0, 1.0);
            let brightness = FAR_BRIGHTNESS + (NEAR_BRIGHTNESS - FAR_BRIGHTNESS) * depth;
            let row = (cy - world.y * scale * 0.5).round() as i64;
            if row < 0 || row >= rows as i64 {
                continue;
            }
            let len = label.chars().count() as f32;
            let start = (cx + world.x * scale - (len - 1.0) / 2.0).round() as i64;
            for (i, c) in label.chars().enumerate() {
                grid.set_signed(start + i as i64, row, Cell::new(c, brightness, LayerFlags::MATRIX));
            }
        }
    }
}

impl Visualization for WordCube {
    fn name(&self) -> &str {
        "word-cube"
    }

    fn paint(&mut self, grid: &mut Grid, _style: AnimationStyle, state: &AnimationState) {
        grid.clear();
        if let Err(e) = self.advance_to(state.phase) {
            log::error!("WordCube: {}", e);
            return;
        }
        self.draw(grid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "rotate trumpet metal tape detect suffer invest unusual rather sound hip execute";

    fn root_positions(cube: &WordCube) -> Vec<(i32, i32, i32)> {
        let scene = cube.scene();
        let mut v: Vec<(i32, i32, i32)> = scene
            .group(scene.root())
            .unwrap()
            .members()
            .iter()
            .map(|&e| {
                let p = scene.entity(e).unwrap().local;
                (p.x as i32, p.y as i32, p.z as i32)
            })
            .collect();
        v.sort();
        v
    }

    #[test]
    fn twenty_six_words_cycle_the_seed() {
        let cube = WordCube::new(SEED).unwrap();
        let scene = cube.scene();
        assert_eq!(scene.entity_ids().count(), 26);
        let labels: Vec<&str> = scene
            .entity_ids()
            .map(|e| scene.entity(e).unwrap().label.as_str())
            .collect();
        assert_eq!(labels[0], "rotate");
        assert_eq!(labels[12], "rotate");
        assert_eq!(lattice_positions().len(), 26);
    }

    #[test]
    fn completed_turns_keep_the_lattice() {
        let mut cube = WordCube::new(SEED).unwrap();
        let expected: Vec<(i32, i32, i32)> = {
            let mut v: Vec<_> = lattice_positions()
                .iter()
                .map(|p| (p.x as i32, p.y as i32, p.z as i32))
                .collect();
            v.sort();
            v
        };
        // exactly on a turn boundary: five turns done, the sixth just begun
        cube.advance_to(5.0 * TURN_PHASE).unwrap();
        assert_eq!(cube.turns_completed(), 5);
        cube.finish_turn(WordCube::root_rotation(5.0 * TURN_PHASE)).unwrap();
        assert_eq!(root_positions(&cube), expected);
        assert!(cube.scene().is_consistent());
    }

    #[test]
    fn turn_moves_one_layer() {
        let mut cube = WordCube::new(SEED).unwrap();
        cube.advance_to(0.4).unwrap();
        let scene = cube.scene();
        let turning = scene.group(cube.turn_group).unwrap().members().len();
        // a middle layer has 8 surface positions, an outer layer 9
        assert!(turning == 8 || turning == 9, "{turning}");
        assert!(scene.is_consistent());
    }

    #[test]
    fn painting_is_a_function_of_phase() {
        let style = AnimationStyle::Rotate;
        let mut a = WordCube::new(SEED).unwrap();
        let mut grid_a = Grid::new(80, 40);
        for step in 0..20 {
            a.paint(&mut grid_a, style, &AnimationState::new(step as f64 * 0.3, 0.0));
        }
        let mut fresh = WordCube::new(SEED).unwrap();
        let mut grid_b = Grid::new(80, 40);
        fresh.paint(&mut grid_b, style, &AnimationState::new(19.0 * 0.3, 0.0));
        assert_eq!(grid_a, grid_b);

        // going backward rebuilds
        a.paint(&mut grid_a, style, &AnimationState::new(0.3, 0.0));
        let mut early = WordCube::new(SEED).unwrap();
        early.paint(&mut grid_b, style, &AnimationState::new(0.3, 0.0));
        assert_eq!(grid_a, grid_b);
    }

    #[test]
    fn words_stay_above_footer_within_depth_brightness() {
        let mut cube = WordCube::new(SEED).unwrap();
        let mut grid = Grid::new(64, 32);
        cube.paint(&mut grid, AnimationStyle::Combined, &AnimationState::new(2.2, 0.0));
        let mut drawn = 0;
        for (_, row, cell) in grid.iter() {
            if cell.layers.contains(LayerFlags::MATRIX) {
                drawn += 1;
                assert!(row < grid.content_rows());
                assert!(cell.brightness >= 0.35 - 1e-6 && cell.brightness <= 1.0);
            }
        }
        assert!(drawn > 0);
    }

    #[test]
    fn empty_seed_uses_fallback_word() {
        let cube = WordCube::new("   ").unwrap();
        let scene = cube.scene();
        assert!(scene
            .entity_ids()
            .all(|e| scene.entity(e).unwrap().label == FALLBACK_WORD));
    }

    #[test]
    fn construction_reports_no_scene_errors() {
        for seed in [SEED, "", "one", "a b c d e f g h i j k l m n o p q r s t u v w x y z extra"] {
            let cube = WordCube::new(seed).unwrap();
            assert_eq!(cube.scene().entity_ids().count(), 26);
            assert!(cube.scene().is_consistent());
        }
    }

    #[test]
    fn tiny_grid_does_not_panic() {
        let mut cube = WordCube::new(SEED).unwrap();
        for (cols, rows) in [(0, 0), (1, 8), (4, 9)] {
            let mut grid = Grid::new(cols, rows);
            cube.paint(&mut grid, AnimationStyle::Rotate, &AnimationState::new(1.0, 0.0));
        }
    }
}
