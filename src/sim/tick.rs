//! Fixed timestep session tick
//!
//! Advances timers, line oscillation and the question countdown.

use super::state::GameState;
use crate::consts::{LINE_SHIFT_AMPLITUDE, LINE_SHIFT_RATE};

/// Countdown values at or below this count as expired
const TIMER_EPSILON: f64 = 1e-6;

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// The question timer expired and a timeout penalty was applied
    pub timed_out: bool,
}

/// Line shift of a moving level `elapsed` seconds in
pub fn line_shift_at(elapsed: f64, span: f64) -> f64 {
    (elapsed * LINE_SHIFT_RATE).sin() * span * LINE_SHIFT_AMPLITUDE
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, dt: f64) -> TickReport {
    let mut report = TickReport::default();

    // Feedback banner fades regardless of mode
    if state.feedback.ttl > 0.0 {
        state.feedback.ttl = (state.feedback.ttl - dt).max(0.0);
    }

    if !state.is_playing() {
        return report;
    }
    let Some(level) = state.level() else {
        return report;
    };

    state.elapsed_in_level += dt;

    state.line_shift = if level.moving {
        line_shift_at(state.elapsed_in_level, level.range.span())
    } else {
        0.0
    };

    if level.is_timed() {
        state.time_left -= dt;
        if state.time_left <= TIMER_EPSILON {
            state.time_left = 0.0;
            state.timeout_penalty();
            report.timed_out = true;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_LIVES, SIM_DT};
    use crate::sim::state::GameMode;

    #[test]
    fn test_tick_idle_on_menu() {
        let mut state = GameState::new(12345);
        state.feedback.ttl = 1.0;
        let report = tick(&mut state, SIM_DT);
        assert!(!report.timed_out);
        assert_eq!(state.elapsed_in_level, 0.0);
        assert!(state.feedback.ttl < 1.0);
    }

    #[test]
    fn test_untimed_level_never_times_out() {
        let mut state = GameState::new(12345);
        state.start_campaign();
        for _ in 0..6000 {
            assert!(!tick(&mut state, SIM_DT).timed_out);
        }
        assert_eq!(state.lives, MAX_LIVES);
        assert_eq!(state.line_shift, 0.0);
    }

    #[test]
    fn test_timed_level_times_out_once() {
        let mut state = GameState::new(12345);
        state.start_campaign_from(5);
        assert_eq!(state.time_left, 10.0);

        let mut timeouts = 0;
        for _ in 0..600 {
            if tick(&mut state, SIM_DT).timed_out {
                timeouts += 1;
            }
        }
        assert_eq!(timeouts, 1);
        assert_eq!(state.lives, MAX_LIVES - 1);
        assert_eq!(state.question_index, 1);
        assert_eq!(state.mode, GameMode::Playing);
        assert_eq!(state.time_left, 10.0);
    }

    #[test]
    fn test_moving_line_oscillates() {
        let mut state = GameState::new(12345);
        state.start_campaign_from(4);
        assert_eq!(state.line_shift, 0.0);

        let span = state.level().unwrap().range.span();
        let mut max_shift: f64 = 0.0;
        for _ in 0..300 {
            tick(&mut state, SIM_DT);
            max_shift = max_shift.max(state.line_shift.abs());
        }
        assert!(max_shift > 0.1 * span);
        assert!(max_shift <= LINE_SHIFT_AMPLITUDE * span + 1e-12);
    }

    #[test]
    fn test_line_shift_returns_near_zero() {
        let span = 3.0;
        assert_eq!(line_shift_at(0.0, span), 0.0);
        let period = std::f64::consts::TAU / LINE_SHIFT_RATE;
        for k in 1..5 {
            assert!(line_shift_at(period * k as f64, span).abs() < 1e-9);
        }
    }
}
