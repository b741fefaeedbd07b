//! Static campaign table
//!
//! Levels are an ordered, immutable sequence. Special-case behavior hangs off
//! [`LevelKind`] rather than level ids.

use serde::{Deserialize, Serialize};

/// Question policy of a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelKind {
    /// Basic proper fractions over power-of-2 denominators, curated pool first
    Warmup,
    /// Inflated (non-reduced) fraction labels
    Equivalent,
    /// Signed fractions across zero
    Negative,
    /// Mixed numbers or improper fractions above one
    Mixed,
    /// Timed, moving line, interior targets
    Sliding,
    /// Timed, moving line, camera-focused finale
    CameraBoss,
}

impl LevelKind {
    /// Marker snaps to the tick grid
    pub fn snaps_to_grid(&self) -> bool {
        matches!(self, LevelKind::Warmup)
    }

    /// Questions come from the curated warm-up pool before procedural generation
    pub fn uses_curated_pool(&self) -> bool {
        matches!(self, LevelKind::Warmup)
    }
}

/// Closed numeric interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: f64,
    pub max: f64,
}

impl NumberRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Same span moved by `offset`
    pub fn shifted(&self, offset: f64) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }
}

/// Static level configuration
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: LevelKind,
    pub range: NumberRange,
    /// Grid granularity for snapping and tick drawing
    pub tick_step: f64,
    /// Questions per level
    pub questions: usize,
    /// Correct-answer band as a fraction of the range span
    pub tolerance: f64,
    /// Seconds per question (0 = untimed)
    pub time_limit: f64,
    /// Visible range oscillates over time
    pub moving: bool,
    /// Camera input recommended
    pub camera_focus: bool,
}

impl Level {
    pub fn is_timed(&self) -> bool {
        self.time_limit > 0.0
    }

    /// Absolute tolerance in value units
    pub fn tolerance_band(&self) -> f64 {
        self.range.span() * self.tolerance
    }
}

/// The campaign, in play order
pub static LEVELS: [Level; 6] = [
    Level {
        id: "L1",
        name: "Fraction Warm-up",
        kind: LevelKind::Warmup,
        range: NumberRange::new(0.0, 1.0),
        tick_step: 0.125,
        questions: 4,
        tolerance: 0.07,
        time_limit: 0.0,
        moving: false,
        camera_focus: false,
    },
    Level {
        id: "L2",
        name: "Equivalence Portal",
        kind: LevelKind::Equivalent,
        range: NumberRange::new(0.0, 1.0),
        tick_step: 0.125,
        questions: 4,
        tolerance: 0.04,
        time_limit: 0.0,
        moving: false,
        camera_focus: false,
    },
    Level {
        id: "L3",
        name: "Negative Canyon",
        kind: LevelKind::Negative,
        range: NumberRange::new(-2.0, 2.0),
        tick_step: 0.25,
        questions: 4,
        tolerance: 0.035,
        time_limit: 0.0,
        moving: false,
        camera_focus: false,
    },
    Level {
        id: "L4",
        name: "Mixed Number Lab",
        kind: LevelKind::Mixed,
        range: NumberRange::new(0.0, 3.0),
        tick_step: 0.25,
        questions: 4,
        tolerance: 0.034,
        time_limit: 0.0,
        moving: false,
        camera_focus: false,
    },
    Level {
        id: "L5",
        name: "Sliding Line Sprint",
        kind: LevelKind::Sliding,
        range: NumberRange::new(0.0, 3.0),
        tick_step: 0.25,
        questions: 5,
        tolerance: 0.038,
        time_limit: 11.0,
        moving: true,
        camera_focus: false,
    },
    Level {
        id: "L6",
        name: "Camera Boss",
        kind: LevelKind::CameraBoss,
        range: NumberRange::new(-1.0, 2.0),
        tick_step: 0.25,
        questions: 5,
        tolerance: 0.04,
        time_limit: 10.0,
        moving: true,
        camera_focus: true,
    },
];

/// Clamp a requested level index into the campaign
pub fn clamp_level_index(index: usize) -> usize {
    index.min(LEVELS.len() - 1)
}

/// Is `index` the final level of the campaign
pub fn is_last_level(index: usize) -> bool {
    index + 1 >= LEVELS.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_table_is_consistent() {
        for level in &LEVELS {
            assert!(level.range.span() > 0.0, "{} has an empty range", level.id);
            assert!(level.questions > 0);
            assert!(level.tolerance > 0.0 && level.tolerance < 0.5);
            // Moving levels are the timed ones
            assert_eq!(level.moving, level.is_timed());
        }
    }

    #[test]
    fn test_policy_flags() {
        assert!(LEVELS[0].kind.snaps_to_grid());
        assert!(LEVELS[0].kind.uses_curated_pool());
        assert!(LEVELS[1..].iter().all(|l| !l.kind.snaps_to_grid()));
    }

    #[test]
    fn test_clamp_level_index() {
        assert_eq!(clamp_level_index(0), 0);
        assert_eq!(clamp_level_index(99), LEVELS.len() - 1);
        assert!(is_last_level(LEVELS.len() - 1));
        assert!(!is_last_level(0));
    }
}
