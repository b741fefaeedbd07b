//! Game settings and tuning
//!
//! Loaded from JSON; every field falls back to its default when missing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MIN_CANVAS_HEIGHT, MIN_CANVAS_WIDTH};
use crate::motion::MotionTuning;

/// Settings load failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    /// Canvas width in pixels (clamped to the minimum canvas)
    pub canvas_width: f64,
    /// Canvas height in pixels (clamped to the minimum canvas)
    pub canvas_height: f64,

    // === Input ===
    /// Keyboard steps across the full range on levels without a snapping grid
    pub keyboard_steps_per_span: f64,

    // === Session ===
    /// Fixed question seed (None = host supplies one)
    pub seed: Option<u64>,

    // === Camera ===
    pub motion: MotionTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 960.0,
            canvas_height: 540.0,
            keyboard_steps_per_span: 60.0,
            seed: None,
            motion: MotionTuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Pull out-of-range values back to something playable
    fn sanitize(&mut self) {
        self.canvas_width = self.canvas_width.max(MIN_CANVAS_WIDTH);
        self.canvas_height = self.canvas_height.max(MIN_CANVAS_HEIGHT);
        if self.keyboard_steps_per_span.is_nan() || self.keyboard_steps_per_span < 1.0 {
            self.keyboard_steps_per_span = Settings::default().keyboard_steps_per_span;
        }
        if self.motion.sample_interval.is_nan() || self.motion.sample_interval <= 0.0 {
            self.motion.sample_interval = MotionTuning::default().sample_interval;
        }
        self.motion.smoothing = self.motion.smoothing.clamp(0.0, 1.0);
        self.motion.bottom_margin = self.motion.bottom_margin.clamp(0.0, 1.0);
    }
}
