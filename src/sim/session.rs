//! Session transitions
//!
//! `Menu -> Playing -> {LevelClear -> Playing | GameComplete}`, with
//! `Playing -> Menu` on life depletion or an explicit return. Every
//! transition updates mode, level and question index together.

use super::level::{LEVELS, clamp_level_index, is_last_level};
use super::line::{LineGeometry, normalize_marker_value};
use super::questions::build_questions;
use super::state::{FeedbackKind, GameMode, GameState, InputMode};
use crate::consts::*;

/// Result of a submission
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitOutcome {
    /// Not playing, nothing evaluated
    Ignored,
    /// Marker inside the tolerance band
    Correct { gain: u64, error: f64 },
    /// Marker outside the tolerance band
    Incorrect { lives_left: u8, error: f64 },
}

/// Points for a correct answer
pub fn score_gain(error: f64, tolerance: f64, time_left: Option<f64>, combo: u32) -> u64 {
    let time_bonus = match time_left {
        Some(left) => (left.max(0.0) * TIME_BONUS_PER_SEC).round() as u64,
        None => UNTIMED_BONUS,
    };
    let ratio = if tolerance > 0.0 {
        (error / tolerance).min(1.0)
    } else {
        1.0
    };
    let precision_bonus = ((1.0 - ratio) * PRECISION_BONUS_MAX).round() as u64;
    let combo_bonus = (combo as u64 * COMBO_BONUS_STEP).min(COMBO_BONUS_CAP);
    BASE_GAIN + time_bonus + precision_bonus + combo_bonus
}

impl GameState {
    /// Start a fresh campaign at the first level
    pub fn start_campaign(&mut self) {
        self.start_campaign_from(0);
    }

    /// Start a fresh campaign at `level_index` (clamped into the campaign)
    pub fn start_campaign_from(&mut self, level_index: usize) {
        let index = clamp_level_index(level_index);
        self.has_played = true;
        self.score = 0;
        self.combo = 0;
        self.lives = MAX_LIVES;
        log::info!("Campaign started at level {}", index + 1);
        self.begin_level(index);
    }

    /// Load a level and start playing it
    pub fn begin_level(&mut self, index: usize) {
        let index = clamp_level_index(index);
        let level = &LEVELS[index];

        self.level_index = Some(index);
        self.questions = build_questions(level, &mut self.rng);
        self.question_index = 0;
        self.level_hits = 0;
        self.elapsed_in_level = 0.0;
        self.time_left = level.time_limit;
        self.line_shift = 0.0;
        self.marker_value = level.range.midpoint();
        self.mode = GameMode::Playing;

        let mut text = format!("Level {} started: {}", index + 1, level.name);
        if level.camera_focus && self.input_mode != InputMode::Camera {
            text.push_str(" | Camera mode recommended (C)");
        }
        self.set_feedback(text, FeedbackKind::Info, 2.2);
        log::info!(
            "Level {} ({}) with {} questions",
            level.id,
            level.name,
            self.questions.len()
        );
    }

    /// Move on from a cleared level or a finished campaign
    pub fn continue_campaign(&mut self) {
        match (self.mode, self.level_index) {
            (GameMode::LevelClear, Some(index)) => self.begin_level(index + 1),
            (GameMode::GameComplete, _) => self.start_campaign(),
            _ => {}
        }
    }

    /// Drop the current level and show the menu
    pub fn return_to_menu(&mut self) {
        self.mode = GameMode::Menu;
        self.level_index = None;
        self.questions.clear();
        self.question_index = 0;
        self.marker_value = 0.0;
        self.elapsed_in_level = 0.0;
        self.line_shift = 0.0;
        self.time_left = 0.0;
        self.combo = 0;
        self.set_feedback("Back to the menu.", FeedbackKind::Info, 1.2);
        log::info!("Returned to menu");
    }

    /// Place the marker at `value` (clamped, and snapped where the level requires)
    pub fn set_marker(&mut self, value: f64) {
        if let Some(level) = self.level() {
            self.marker_value = normalize_marker_value(level, value);
        }
    }

    /// Place the marker under canvas pixel `x` of the drawn (possibly shifted) line
    pub fn set_marker_from_x(&mut self, x: f64, line: &LineGeometry) {
        if !self.is_playing() {
            return;
        }
        let value = line.x_to_value(x, self.visible_range());
        self.set_marker(value);
    }

    /// Keyboard movement by whole steps; `steps_per_span` sets the step on
    /// levels without a snapping grid
    pub fn nudge_marker(&mut self, steps: i32, steps_per_span: f64) {
        if !self.is_playing() {
            return;
        }
        let Some(level) = self.level() else {
            return;
        };
        let step = if level.kind.snaps_to_grid() {
            level.tick_step
        } else {
            level.range.span() / steps_per_span.max(1.0)
        };
        self.set_marker(self.marker_value + step * steps as f64);
    }

    /// Evaluate the marker against the current question
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.mode != GameMode::Playing {
            return SubmitOutcome::Ignored;
        }
        let Some(level) = self.level() else {
            return SubmitOutcome::Ignored;
        };
        let Some(question) = self.current_question() else {
            return SubmitOutcome::Ignored;
        };
        let target = question.value;
        let label = question.label.clone();

        let tolerance = level.tolerance_band();
        let error = (self.marker_value - target).abs();
        log::debug!(
            "Submit marker={:.4} target={:.4} error={:.4} tolerance={:.4}",
            self.marker_value,
            target,
            error,
            tolerance
        );

        if error <= tolerance {
            let time_left = level.is_timed().then_some(self.time_left);
            let gain = score_gain(error, tolerance, time_left, self.combo);
            self.score += gain;
            self.level_hits += 1;
            self.combo += 1;
            self.set_feedback(
                format!("CORRECT! Found {label}. +{gain} points"),
                FeedbackKind::Success,
                2.4,
            );
            self.advance_question();
            SubmitOutcome::Correct { gain, error }
        } else {
            let previous = self.lives;
            self.lose_life();
            self.set_feedback(
                format!("WRONG! Target was {label}. Lives {previous} -> {}", self.lives),
                FeedbackKind::Error,
                3.0,
            );
            if self.lives == 0 {
                self.end_run("Out of lives. Restart the campaign.");
            }
            SubmitOutcome::Incorrect {
                lives_left: self.lives,
                error,
            }
        }
    }

    /// Question timer ran out: lose a life, then move on
    pub fn timeout_penalty(&mut self) {
        if !self.is_playing() {
            return;
        }
        let previous = self.lives;
        self.lose_life();
        self.set_feedback(
            format!("TIME'S UP! Lives {previous} -> {}", self.lives),
            FeedbackKind::Warning,
            2.4,
        );
        if self.lives == 0 {
            self.end_run("Ran out of time. Try again.");
            return;
        }
        self.advance_question();
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.combo = 0;
    }

    /// Life depletion ends the run on the menu; the level stays loaded for display
    fn end_run(&mut self, text: &str) {
        self.mode = GameMode::Menu;
        self.set_feedback(text, FeedbackKind::Error, 2.8);
        log::info!("Run over with score {}", self.score);
    }

    /// Next question, or level/campaign completion after the last one
    fn advance_question(&mut self) {
        let Some(index) = self.level_index else {
            return;
        };
        let level = &LEVELS[index];
        if self.question_index + 1 < self.questions.len() {
            self.question_index += 1;
            self.time_left = level.time_limit;
            return;
        }

        if is_last_level(index) {
            self.mode = GameMode::GameComplete;
            self.set_feedback(
                "Every fraction system is balanced.",
                FeedbackKind::Success,
                3.0,
            );
            log::info!("Campaign complete with score {}", self.score);
        } else {
            self.mode = GameMode::LevelClear;
            self.set_feedback(
                format!("{} cleared.", level.name),
                FeedbackKind::Success,
                2.6,
            );
            log::info!("Level {} cleared ({} hits)", level.id, self.level_hits);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(level: usize) -> GameState {
        let mut state = GameState::new(12345);
        state.start_campaign_from(level);
        state
    }

    fn target(state: &GameState) -> f64 {
        state.current_question().map(|q| q.value).unwrap()
    }

    #[test]
    fn test_start_campaign_resets_run() {
        let mut state = GameState::new(1);
        state.score = 900;
        state.combo = 3;
        state.lives = 1;
        state.start_campaign();
        assert_eq!(state.mode, GameMode::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.combo, 0);
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.level_index, Some(0));
        assert_eq!(state.question_index, 0);
        assert_eq!(state.marker_value, 0.5);
        assert!(state.has_played);
    }

    #[test]
    fn test_start_from_clamps_level() {
        let state = playing(42);
        assert_eq!(state.level_index, Some(LEVELS.len() - 1));
        assert_eq!(state.time_left, 10.0);
    }

    #[test]
    fn test_correct_half_on_warmup() {
        let mut state = playing(0);
        // Force a 1/2 target
        state.questions[0].value = 0.5;
        state.questions[0].label = "1/2".into();
        state.set_marker(0.5);

        let outcome = state.submit();
        match outcome {
            SubmitOutcome::Correct { gain, error } => {
                assert!(gain >= 140);
                assert_eq!(error, 0.0);
                // 140 + untimed 20 + full precision 100, no combo yet
                assert_eq!(gain, 260);
            }
            other => panic!("expected correct, got {other:?}"),
        }
        assert_eq!(state.combo, 1);
        assert_eq!(state.score, 260);
        assert_eq!(state.question_index, 1);
        assert_eq!(state.feedback.kind, FeedbackKind::Success);
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        // Target 0 keeps `marker - target` exact
        let mut state = playing(2);
        let tolerance = state.level().unwrap().tolerance_band();
        state.questions[0].value = 0.0;
        state.marker_value = tolerance;
        assert!(matches!(state.submit(), SubmitOutcome::Correct { .. }));

        let mut state = playing(2);
        state.questions[0].value = 0.0;
        state.marker_value = tolerance + 1e-9;
        assert!(matches!(state.submit(), SubmitOutcome::Incorrect { .. }));
    }

    #[test]
    fn test_wrong_answer_keeps_question() {
        let mut state = playing(2);
        let t = target(&state);
        state.set_marker(if t > 0.0 { -2.0 } else { 2.0 });
        state.combo = 4;

        let outcome = state.submit();
        assert_eq!(
            outcome,
            SubmitOutcome::Incorrect {
                lives_left: MAX_LIVES - 1,
                error: (state.marker_value - t).abs()
            }
        );
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.question_index, 0);
        assert_eq!(state.mode, GameMode::Playing);
    }

    #[test]
    fn test_last_life_goes_to_menu() {
        let mut state = playing(2);
        state.lives = 1;
        let t = target(&state);
        state.set_marker(if t > 0.0 { -2.0 } else { 2.0 });

        state.submit();
        assert_eq!(state.lives, 0);
        assert_eq!(state.mode, GameMode::Menu);
        assert_eq!(state.question_index, 0);

        // Further submits are ignored and never underflow
        assert_eq!(state.submit(), SubmitOutcome::Ignored);
        state.timeout_penalty();
        assert_eq!(state.lives, 0);
    }

    #[test]
    fn test_combo_bonus_is_capped() {
        assert_eq!(score_gain(0.0, 0.1, None, 0), 260);
        assert_eq!(score_gain(0.0, 0.1, None, 15), 260 + 120);
        assert_eq!(score_gain(0.0, 0.1, None, 100), 260 + 120);
        // Timed: 5.5 s left -> 66
        assert_eq!(score_gain(0.1, 0.1, Some(5.5), 0), 140 + 66);
        assert_eq!(score_gain(0.05, 0.1, Some(-1.0), 1), 140 + 50 + 8);
    }

    #[test]
    fn test_clearing_level_then_continue() {
        let mut state = playing(0);
        let count = state.questions.len();
        for _ in 0..count {
            let t = target(&state);
            state.set_marker(t);
            assert!(matches!(state.submit(), SubmitOutcome::Correct { .. }));
        }
        assert_eq!(state.mode, GameMode::LevelClear);
        assert_eq!(state.question_index, count - 1);
        assert_eq!(state.combo as usize, count);

        let score = state.score;
        state.continue_campaign();
        assert_eq!(state.mode, GameMode::Playing);
        assert_eq!(state.level_index, Some(1));
        assert_eq!(state.question_index, 0);
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_last_level_completes_campaign() {
        let mut state = playing(LEVELS.len() - 1);
        let count = state.questions.len();
        for _ in 0..count {
            let t = target(&state);
            state.set_marker(t);
            state.submit();
        }
        assert_eq!(state.mode, GameMode::GameComplete);

        state.continue_campaign();
        assert_eq!(state.level_index, Some(0));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_timeout_advances_question() {
        let mut state = playing(4);
        state.time_left = 0.0;
        state.combo = 2;
        state.timeout_penalty();
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert_eq!(state.combo, 0);
        assert_eq!(state.question_index, 1);
        assert_eq!(state.time_left, 11.0);
        assert_eq!(state.feedback.kind, FeedbackKind::Warning);
    }

    #[test]
    fn test_timeout_last_life_goes_to_menu() {
        let mut state = playing(5);
        state.lives = 1;
        state.timeout_penalty();
        assert_eq!(state.lives, 0);
        assert_eq!(state.mode, GameMode::Menu);
        // The run ends on the question that timed out
        assert_eq!(state.question_index, 0);
        assert_eq!(state.feedback.kind, FeedbackKind::Error);
    }

    #[test]
    fn test_timeout_on_last_question_transitions() {
        let mut state = playing(4);
        state.question_index = state.questions.len() - 1;
        state.timeout_penalty();
        assert_eq!(state.mode, GameMode::LevelClear);
        assert_eq!(state.lives, MAX_LIVES - 1);

        let mut state = playing(5);
        state.question_index = state.questions.len() - 1;
        state.timeout_penalty();
        assert_eq!(state.mode, GameMode::GameComplete);
        assert_eq!(state.lives, MAX_LIVES - 1);
    }

    #[test]
    fn test_return_to_menu_clears_level() {
        let mut state = playing(3);
        state.return_to_menu();
        assert_eq!(state.mode, GameMode::Menu);
        assert!(state.level().is_none());
        assert!(state.questions.is_empty());
        assert_eq!(state.submit(), SubmitOutcome::Ignored);
    }

    #[test]
    fn test_nudge_uses_grid_or_span() {
        let mut state = playing(0);
        state.nudge_marker(1, 60.0);
        assert_eq!(state.marker_value, 0.625);
        state.nudge_marker(-10, 60.0);
        assert_eq!(state.marker_value, 0.0);

        let mut state = playing(2);
        state.nudge_marker(2, 60.0);
        assert!((state.marker_value - 4.0 / 60.0 * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_marker_from_x_uses_visible_range() {
        let line = LineGeometry::from_canvas(1000.0, 500.0);
        let mut state = playing(2);
        state.set_marker_from_x(700.0, &line);
        assert!((state.marker_value - 1.0).abs() < 1e-12);

        // Shifted line: the same pixel maps to a shifted value, clamped to the static range
        let mut state = playing(4);
        state.line_shift = 0.5;
        state.set_marker_from_x(900.0, &line);
        assert_eq!(state.marker_value, 3.0);
        state.set_marker_from_x(100.0, &line);
        assert!((state.marker_value - 0.5).abs() < 1e-12);

        let mut menu = GameState::new(1);
        menu.set_marker_from_x(500.0, &line);
        assert_eq!(menu.marker_value, 0.0);
    }

    #[test]
    fn test_marker_stays_in_static_range() {
        let mut state = playing(5);
        state.set_marker(10.0);
        assert_eq!(state.marker_value, 2.0);
        state.set_marker(-10.0);
        assert_eq!(state.marker_value, -1.0);
    }
}
