// src/lib.rs

//! `seedglyph` turns a seed phrase, a key, and two hex hashes into a
//! deterministic animated character-grid visualization, then rasterizes it.
//!
//! The pieces, in frame order:
//!
//! - [`pattern`] paints a [`grid::Grid`] (or [`matrix`] does, for the word cube)
//! - [`renderer`] turns the grid into render commands
//! - [`rasterizer`] compiles the commands into an RGBA framebuffer
//! - [`display`] presents the framebuffer (headless or PNG)
//! - [`session`] ties one visualization to one surface; [`orchestrator`]
//!   runs many sessions from [`scheduler`] frame ticks

pub mod animation;
pub mod color;
pub mod config;
pub mod display;
pub mod glyph;
pub mod grid;
pub mod input;
pub mod matrix;
pub mod orchestrator;
pub mod pattern;
pub mod prng;
pub mod rasterizer;
pub mod renderer;
pub mod scheduler;
pub mod session;
