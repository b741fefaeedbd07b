//! Deterministic session simulation
//!
//! All gameplay decisions live here. This module must stay pure:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, camera or platform dependencies

pub mod level;
pub mod line;
pub mod questions;
pub mod session;
pub mod state;
pub mod tick;

pub use level::{LEVELS, Level, LevelKind, NumberRange};
pub use line::{LineGeometry, normalize_marker_value, visible_range};
pub use questions::{Question, build_questions, generate_question};
pub use session::{SubmitOutcome, score_gain};
pub use state::{Feedback, FeedbackKind, GameMode, GameState, InputMode};
pub use tick::{TickReport, line_shift_at, tick};
