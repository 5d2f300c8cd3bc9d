// src/input.rs

//! The structured record a visualization is generated from, and its
//! validation into a `PatternInput`.
//!
//! All fields are optional at the wire level so that a record with gaps can
//! be reported as a whole ("missing: private_key, secondary_hash") instead of
//! failing on the first absent key.

use crate::color::NamedColor;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Primary hashes shorter than this are cycled to source all derived parameters.
pub const MIN_PRIMARY_HASH_LEN: usize = 16;

/// Why a generation request was refused. Nothing is drawn in either case.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("missing required attribute(s): {}", .0.join(", "))]
    MissingAttributes(Vec<&'static str>),
    #[error("malformed visualization input: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("could not read visualization input: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw input record as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VisualizationInput {
    pub seed_phrase: Option<String>,
    pub private_key: Option<String>,
    pub background: Option<String>,
    pub primary_hash: Option<String>,
    pub secondary_hash: Option<String>,
}

/// A validated input: every attribute present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternInput {
    pub seed_phrase: String,
    pub private_key: String,
    pub background: NamedColor,
    pub primary_hash: String,
    pub secondary_hash: String,
}

impl VisualizationInput {
    /// Parses a JSON record.
    pub fn from_json(text: &str) -> Result<Self, GenerateError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON record from disk.
    pub fn from_path(path: &Path) -> Result<Self, GenerateError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The built-in reference example shown next to user-supplied inputs.
    pub fn reference() -> Self {
        VisualizationInput {
            seed_phrase: Some(
                "rotate trumpet metal tape detect suffer invest unusual rather sound hip execute"
                    .to_string(),
            ),
            private_key: Some(
                "5f2a9c0b7e31d84a6c19f0e2b3d7a5c48e9f1b2a3c4d5e6f708192a3b4c5d6e7".to_string(),
            ),
            background: Some("red".to_string()),
            primary_hash: Some(
                "2d9df1a1efb7b791ed7a621a2ac81ce4ba8e2357d18b2fd247659bc8e1352782".to_string(),
            ),
            secondary_hash: Some(
                "67f8fac45e265f82b7aa887ba0f5f3c9aa2a092fee2d55890e68adb7315c4f8a\
                 92c0259882eb677526518203f1bb19c0a56a41df070f52addc3d5dcd17699050"
                    .to_string(),
            ),
        }
    }

    /// Checks that every attribute is present and non-blank.
    pub fn validate(&self) -> Result<PatternInput, GenerateError> {
        let mut missing = Vec::new();
        let seed_phrase = require(&self.seed_phrase, "seed_phrase", &mut missing);
        let private_key = require(&self.private_key, "private_key", &mut missing);
        let background = require(&self.background, "background", &mut missing);
        let primary_hash = require(&self.primary_hash, "primary_hash", &mut missing);
        let secondary_hash = require(&self.secondary_hash, "secondary_hash", &mut missing);

        match (seed_phrase, private_key, background, primary_hash, secondary_hash) {
            (Some(seed_phrase), Some(private_key), Some(background), Some(primary), Some(secondary))
                if missing.is_empty() =>
            {
                if primary.len() < MIN_PRIMARY_HASH_LEN {
                    warn!(
                        "Primary hash has {} chars (< {}); derived parameters will cycle it.",
                        primary.len(),
                        MIN_PRIMARY_HASH_LEN
                    );
                }
                let input = PatternInput {
                    seed_phrase,
                    private_key,
                    background: NamedColor::from_name_or_fallback(&background),
                    primary_hash: primary,
                    secondary_hash: secondary,
                };
                debug!("Validated input with background {:?}", input.background);
                Ok(input)
            }
            _ => {
                warn!("Refusing to generate: missing {}", missing.join(", "));
                Err(GenerateError::MissingAttributes(missing))
            }
        }
    }
}

fn require(
    field: &Option<String>,
    name: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match field.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => {
            missing.push(name);
            None
        }
    }
}

impl PatternInput {
    /// The text whose characters the embedding layer stamps into the grid.
    pub fn source_text(&self) -> String {
        format!("{}{}", self.seed_phrase, self.private_key)
    }
}
