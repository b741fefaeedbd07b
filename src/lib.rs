//! Fraction Line - place fractions on a number line
//!
//! Core modules:
//! - `fraction`: Simplification and fraction/mixed-number labels
//! - `sim`: Deterministic session simulation (levels, questions, line mapping, game state)
//! - `motion`: Frame-differencing camera pointer
//! - `camera`: Camera acquisition lifecycle and frame sources
//! - `game`: Driver tying session, camera and input together
//! - `input`: Host input events and keyboard mapping
//! - `snapshot`: Machine-readable diagnostic state dump
//! - `settings`: Data-driven tuning

pub mod camera;
pub mod fraction;
pub mod game;
pub mod input;
pub mod motion;
pub mod settings;
pub mod sim;
pub mod snapshot;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use camera::{CameraError, CameraRequest, FrameSource};
pub use game::Game;
pub use input::InputEvent;
pub use settings::{Settings, SettingsError};
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the host (seconds)
    pub const MAX_FRAME_DT: f64 = 0.05;

    /// Lives at campaign start
    pub const MAX_LIVES: u8 = 4;

    /// Scoring
    pub const BASE_GAIN: u64 = 140;
    pub const UNTIMED_BONUS: u64 = 20;
    pub const TIME_BONUS_PER_SEC: f64 = 12.0;
    pub const PRECISION_BONUS_MAX: f64 = 100.0;
    pub const COMBO_BONUS_STEP: u64 = 8;
    pub const COMBO_BONUS_CAP: u64 = 120;

    /// Moving levels: line shift amplitude as a fraction of the range span
    pub const LINE_SHIFT_AMPLITUDE: f64 = 0.17;
    /// Moving levels: angular rate of the shift (rad/s)
    pub const LINE_SHIFT_RATE: f64 = 1.1;

    /// Canvas minimums (pixels)
    pub const MIN_CANVAS_WIDTH: f64 = 760.0;
    pub const MIN_CANVAS_HEIGHT: f64 = 420.0;

    /// Camera sample frame dimensions
    pub const CAM_W: usize = 160;
    pub const CAM_H: usize = 120;
}

/// Clamp a value into `[min, max]` without panicking on reversed bounds
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Round to a fixed number of decimal places
#[inline]
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp(-3.0, -2.0, 2.0), -2.0);
        assert_eq!(clamp(5.0, -2.0, 2.0), 2.0);
        assert_eq!(clamp(0.25, 0.0, 1.0), 0.25);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }
}
