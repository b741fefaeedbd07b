//! Number line geometry and value <-> pixel mapping

use serde::Serialize;

use super::level::{Level, NumberRange};
use crate::clamp;
use crate::consts::{MIN_CANVAS_HEIGHT, MIN_CANVAS_WIDTH};

/// Pixel placement of the number line on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineGeometry {
    /// Left end of the line (pixels)
    pub start_x: f64,
    /// Vertical position of the line (pixels)
    pub y: f64,
    /// Line length (pixels)
    pub width: f64,
}

impl LineGeometry {
    /// Derive the line from a canvas size (clamped to the minimum canvas)
    pub fn from_canvas(width: f64, height: f64) -> Self {
        let w = width.max(MIN_CANVAS_WIDTH);
        let h = height.max(MIN_CANVAS_HEIGHT);
        Self {
            start_x: w * 0.1,
            y: h * 0.64,
            width: w * 0.8,
        }
    }

    pub fn end_x(&self) -> f64 {
        self.start_x + self.width
    }

    /// Pixel x for a value on the given visible range
    pub fn value_to_x(&self, value: f64, visible: NumberRange) -> f64 {
        let ratio = (value - visible.min) / visible.span();
        self.start_x + ratio * self.width
    }

    /// Value under pixel `x`; off-line input clamps to the nearest end
    pub fn x_to_value(&self, x: f64, visible: NumberRange) -> f64 {
        let ratio = clamp((x - self.start_x) / self.width, 0.0, 1.0);
        visible.min + ratio * visible.span()
    }

    /// Pixel x for a normalized position along the line
    pub fn ratio_to_x(&self, ratio: f64) -> f64 {
        self.start_x + ratio * self.width
    }
}

impl Default for LineGeometry {
    fn default() -> Self {
        Self::from_canvas(MIN_CANVAS_WIDTH, MIN_CANVAS_HEIGHT)
    }
}

/// Range currently drawn for a level (unit range when no level is loaded)
pub fn visible_range(level: Option<&Level>, line_shift: f64) -> NumberRange {
    match level {
        None => NumberRange::new(0.0, 1.0),
        Some(level) if level.moving => level.range.shifted(line_shift),
        Some(level) => level.range,
    }
}

/// Clamp a marker into the level's static range, snapping to the tick grid
/// on levels that require it
pub fn normalize_marker_value(level: &Level, value: f64) -> f64 {
    let range = level.range;
    let mut next = clamp(value, range.min, range.max);
    if level.kind.snaps_to_grid() && level.tick_step > 0.0 {
        next = (next / level.tick_step).round() * level.tick_step;
        next = clamp(next, range.min, range.max);
    }
    next
}
