//! Machine-readable state dump
//!
//! The snapshot is what automated hosts and tests read instead of pixels.
//! Keys are camelCase and numbers are rounded the same way every time, so
//! two identical sessions produce byte-identical JSON.

use serde::Serialize;

use crate::camera::CameraLink;
use crate::motion::MotionTracker;
use crate::round_to;
use crate::sim::{FeedbackKind, GameMode, GameState, InputMode, LineGeometry};

pub const COORDINATE_SYSTEM: &str =
    "Canvas origin top-left; x right, y down; number line values increase left to right.";

/// Loaded level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelInfo {
    /// 1-based campaign position
    pub index: usize,
    pub id: &'static str,
    pub name: &'static str,
}

/// Current question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionInfo {
    /// 1-based position within the level
    pub index: usize,
    pub total: usize,
    pub label: String,
    pub value: f64,
}

/// Drawn number line
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineInfo {
    pub pixel_start: f64,
    pub pixel_end: f64,
    pub visual_min: f64,
    pub visual_max: f64,
    pub marker_value: f64,
    pub marker_x: f64,
}

/// Camera tracker status
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraInfo {
    /// Stream running
    pub active: bool,
    /// Waiting for the host to grant a stream
    pub pending: bool,
    pub using_camera_input: bool,
    pub motion: f64,
    /// Smoothed pointer x in image space (not mirrored)
    pub pointer_x: f64,
}

/// Full diagnostic snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub coordinate_system: &'static str,
    pub mode: GameMode,
    pub level: Option<LevelInfo>,
    pub input_mode: InputMode,
    pub score: u64,
    pub lives: u8,
    pub question: Option<QuestionInfo>,
    pub line: Option<LineInfo>,
    /// Seconds left on timed levels
    pub timer: Option<f64>,
    pub feedback: String,
    pub feedback_type: FeedbackKind,
    pub camera: CameraInfo,
}

impl Snapshot {
    pub fn capture(
        state: &GameState,
        line: &LineGeometry,
        tracker: &MotionTracker,
        link: &CameraLink,
    ) -> Self {
        let level = state.level();

        let level_info = level.zip(state.level_index).map(|(level, index)| LevelInfo {
            index: index + 1,
            id: level.id,
            name: level.name,
        });

        let question = state.current_question().map(|q| QuestionInfo {
            index: state.question_index + 1,
            total: state.questions.len(),
            label: q.label.clone(),
            value: round_to(q.value, 4),
        });

        let line_info = level.map(|_| {
            let visible = state.visible_range();
            LineInfo {
                pixel_start: round_to(line.start_x, 2),
                pixel_end: round_to(line.end_x(), 2),
                visual_min: round_to(visible.min, 4),
                visual_max: round_to(visible.max, 4),
                marker_value: round_to(state.marker_value, 4),
                marker_x: round_to(line.value_to_x(state.marker_value, visible), 2),
            }
        });

        let timer = level
            .filter(|level| level.is_timed())
            .map(|_| round_to(state.time_left, 2));

        Self {
            coordinate_system: COORDINATE_SYSTEM,
            mode: state.mode,
            level: level_info,
            input_mode: state.input_mode,
            score: state.score,
            lives: state.lives,
            question,
            line: line_info,
            timer,
            feedback: state.feedback.text.clone(),
            feedback_type: state.feedback.kind,
            camera: CameraInfo {
                active: link.is_active(),
                pending: link.is_pending(),
                using_camera_input: state.input_mode == InputMode::Camera,
                motion: round_to(tracker.last_motion as f64, 0),
                pointer_x: round_to(tracker.pointer.x as f64, 3),
            },
        }
    }

    pub fn to_json(&self) -> String {
        // Plain data with string keys only; serialization cannot fail
        serde_json::to_string(self).unwrap_or_default()
    }
}
