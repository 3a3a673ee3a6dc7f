//! Replay scripts
//!
//! A script is a JSON array of steps:
//!
//! ```json
//! [
//!   {"touch": {"phase": "began", "timestamp_ms": 0}},
//!   {"touch": {"phase": "active", "translation_y": 150, "timestamp_ms": 16}},
//!   {"touch_to": {"recognizer": "pan", "phase": "ended", "translation_y": 150, "timestamp_ms": 32}},
//!   {"pointer": {"id": 1, "phase": "down", "x": 10, "y": 20, "timestamp_ms": 40}},
//!   {"press": "toggle_share"},
//!   {"frames": 30}
//! ]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tactile_app::Action;
use tactile_gesture::{GestureKind, PointerEvent, TouchSample};

/// A sample aimed at a single recognizer
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TargetedTouch {
    pub recognizer: GestureKind,
    #[serde(flatten)]
    pub sample: TouchSample,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Sample for every recognizer of the controller
    Touch(TouchSample),
    /// Sample for one recognizer only
    TouchTo(TargetedTouch),
    /// Raw finger event, converted to a sample
    Pointer(PointerEvent),
    /// Discrete action
    Press(Action),
    /// Advance this many frames
    Frames(u32),
}

pub fn parse(source: &str) -> Result<Vec<Step>> {
    serde_json::from_str(source).context("Invalid replay script")
}

pub fn load(path: &Path) -> Result<Vec<Step>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
