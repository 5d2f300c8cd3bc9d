// src/config.rs

//! Defines the configuration structures for `seedglyph`.
//!
//! The configuration is deserialized from a JSON file. Every section carries
//! `#[serde(default)]`, so a file only needs to mention the values it changes.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted when no `--config` flag is given.
pub const CONFIG_ENV_VAR: &str = "SEEDGLYPH_CONFIG";

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Grid size presets.
    pub grid: GridConfig,
    /// Pixel geometry of rasterized frames.
    pub raster: RasterConfig,
    /// Frame pacing and per-frame step sizes.
    pub animation: AnimationConfig,
}

impl Config {
    /// Loads a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Loads from `path`, else from `$SEEDGLYPH_CONFIG`, else defaults.
    /// A file that cannot be loaded is reported and replaced by defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(path) => Config::load(&path).unwrap_or_else(|e| {
                warn!("{:#}. Using default configuration.", e);
                Config::default()
            }),
            None => {
                info!("Configuration loaded (using default).");
                Config::default()
            }
        }
    }
}

// --- Grid Configuration ---

/// Character grid dimensions for the two presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub preview: GridSize,
    pub full: GridSize,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            preview: GridSize { cols: 64, rows: 32 },
            full: GridSize { cols: 120, rows: 60 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: usize,
    pub rows: usize,
}

/// The two supported grid size presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GridPreset {
    Preview,
    Full,
}

impl GridConfig {
    pub fn size(&self, preset: GridPreset) -> GridSize {
        match preset {
            GridPreset::Preview => self.preview,
            GridPreset::Full => self.full,
        }
    }
}

// --- Raster Configuration ---

/// Pixel geometry of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterConfig {
    pub cell_width_px: usize,
    pub cell_height_px: usize,
}

impl Default for RasterConfig {
    fn default() -> Self {
        RasterConfig {
            cell_width_px: 8,
            cell_height_px: 12,
        }
    }
}

// --- Animation Configuration ---

/// Frame pacing and step sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Frame ticks per second emitted by the vsync actor.
    pub target_fps: u32,
    /// Radians added to `phase` per frame by Rotate and Combined.
    pub phase_step: f64,
    /// Rows added to `flow_offset` per frame by Flow and Combined.
    pub flow_step: f64,
    /// Radians added to `phase` per frame by Pulse.
    pub pulse_step: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            target_fps: 30,
            phase_step: 0.05,
            flow_step: 0.25,
            pulse_step: 0.08,
        }
    }
}
