//! Session state and core simulation types
//!
//! One owned [`GameState`] holds everything the session machine mutates.
//! Transitions live in `session.rs`, time-based updates in `tick.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{LEVELS, Level, NumberRange};
use super::line::visible_range;
use super::questions::Question;
use crate::consts::MAX_LIVES;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Title screen; also where a run ends after losing all lives
    Menu,
    /// Answering questions
    Playing,
    /// Level finished, waiting to continue
    LevelClear,
    /// Every level finished
    GameComplete,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Menu => "menu",
            GameMode::Playing => "playing",
            GameMode::LevelClear => "level_clear",
            GameMode::GameComplete => "game_complete",
        }
    }
}

/// Which device currently drives the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Mouse, touch or keyboard
    #[default]
    Pointer,
    /// Camera motion tracker
    Camera,
}

/// Tone of the feedback banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Feedback banner shown by the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
    /// Seconds left on screen
    pub ttl: f64,
}

impl Feedback {
    pub fn new(text: impl Into<String>, kind: FeedbackKind, ttl: f64) -> Self {
        Self {
            text: text.into(),
            kind,
            ttl,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the question RNG was created from
    pub seed: u64,
    /// Question RNG
    pub(crate) rng: Pcg32,
    pub mode: GameMode,
    /// At least one campaign has been started
    pub has_played: bool,
    /// Loaded level (None after an explicit return to the menu)
    pub level_index: Option<usize>,
    /// Questions of the loaded level
    pub questions: Vec<Question>,
    pub question_index: usize,
    /// Marker position (always inside the loaded level's static range)
    pub marker_value: f64,
    /// Accumulated score, never decreases within a run
    pub score: u64,
    /// Correct answers in the current level
    pub level_hits: u32,
    /// Consecutive correct answers
    pub combo: u32,
    pub lives: u8,
    /// Seconds since the level started
    pub elapsed_in_level: f64,
    /// Seconds left on the current question (timed levels)
    pub time_left: f64,
    /// Offset applied to a moving level's visible range
    pub line_shift: f64,
    pub feedback: Feedback,
    pub input_mode: InputMode,
}

impl GameState {
    /// Create a fresh session on the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            mode: GameMode::Menu,
            has_played: false,
            level_index: None,
            questions: Vec::new(),
            question_index: 0,
            marker_value: 0.0,
            score: 0,
            level_hits: 0,
            combo: 0,
            lives: MAX_LIVES,
            elapsed_in_level: 0.0,
            time_left: 0.0,
            line_shift: 0.0,
            feedback: Feedback::new(
                "Start the campaign and chart a path through the fractions.",
                FeedbackKind::Info,
                0.0,
            ),
            input_mode: InputMode::Pointer,
        }
    }

    /// Loaded level config
    pub fn level(&self) -> Option<&'static Level> {
        self.level_index.and_then(|i| LEVELS.get(i))
    }

    /// Question currently being asked
    pub fn current_question(&self) -> Option<&Question> {
        self.level_index?;
        self.questions.get(self.question_index)
    }

    /// Range currently drawn on screen
    pub fn visible_range(&self) -> NumberRange {
        visible_range(self.level(), self.line_shift)
    }

    pub fn set_feedback(&mut self, text: impl Into<String>, kind: FeedbackKind, ttl: f64) {
        self.feedback = Feedback::new(text, kind, ttl);
    }

    pub fn is_playing(&self) -> bool {
        self.mode == GameMode::Playing && self.level_index.is_some()
    }
}
