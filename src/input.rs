//! Host input events and keyboard mapping

use serde::{Deserialize, Serialize};

use crate::sim::{GameMode, LEVELS};

/// Everything the host can ask the game to do
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Pointer pressed or dragged at canvas x (pixels)
    PointerX(f64),
    /// Keyboard marker movement in whole steps (negative = left)
    Nudge(i32),
    /// Confirm the current marker position
    Submit,
    StartCampaign,
    /// Start a fresh campaign at a level (0-based)
    StartFromLevel(usize),
    /// Next level after a clear, or restart after completing the campaign
    Continue,
    ReturnToMenu,
    ToggleCamera,
}

/// Level index for a digit shortcut ("1" -> 0), if that level exists
fn level_shortcut(key: &str) -> Option<usize> {
    let mut chars = key.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() || digit == 0 {
        return None;
    }
    let index = digit as usize - 1;
    (index < LEVELS.len()).then_some(index)
}

/// Map a keyboard key (DOM `KeyboardEvent.key` naming) to an event
pub fn key_to_event(key: &str, mode: GameMode) -> Option<InputEvent> {
    let key = key.to_ascii_lowercase();

    if key == "c" {
        return Some(InputEvent::ToggleCamera);
    }
    if let Some(index) = level_shortcut(&key) {
        return Some(InputEvent::StartFromLevel(index));
    }

    let between_levels = matches!(mode, GameMode::LevelClear | GameMode::GameComplete);
    match key.as_str() {
        "0" | "r" => Some(InputEvent::ReturnToMenu),
        "n" if between_levels => Some(InputEvent::Continue),
        " " | "enter" => match mode {
            GameMode::Menu => Some(InputEvent::StartCampaign),
            GameMode::LevelClear | GameMode::GameComplete => Some(InputEvent::Continue),
            GameMode::Playing => Some(InputEvent::Submit),
        },
        _ if mode != GameMode::Playing => None,
        "arrowleft" => Some(InputEvent::Nudge(-1)),
        "arrowright" => Some(InputEvent::Nudge(1)),
        "arrowdown" => Some(InputEvent::Nudge(-2)),
        "arrowup" => Some(InputEvent::Nudge(2)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_shortcuts() {
        assert_eq!(
            key_to_event("1", GameMode::Menu),
            Some(InputEvent::StartFromLevel(0))
        );
        assert_eq!(
            key_to_event("6", GameMode::Playing),
            Some(InputEvent::StartFromLevel(5))
        );
        // Only six levels exist
        assert_eq!(key_to_event("7", GameMode::Menu), None);
        assert_eq!(key_to_event("12", GameMode::Menu), None);
    }

    #[test]
    fn test_menu_keys_work_everywhere() {
        for mode in [
            GameMode::Menu,
            GameMode::Playing,
            GameMode::LevelClear,
            GameMode::GameComplete,
        ] {
            assert_eq!(key_to_event("0", mode), Some(InputEvent::ReturnToMenu));
            assert_eq!(key_to_event("R", mode), Some(InputEvent::ReturnToMenu));
            assert_eq!(key_to_event("c", mode), Some(InputEvent::ToggleCamera));
        }
    }

    #[test]
    fn test_confirm_key_depends_on_mode() {
        assert_eq!(key_to_event(" ", GameMode::Menu), Some(InputEvent::StartCampaign));
        assert_eq!(key_to_event("Enter", GameMode::Playing), Some(InputEvent::Submit));
        assert_eq!(key_to_event("Enter", GameMode::LevelClear), Some(InputEvent::Continue));
        assert_eq!(key_to_event(" ", GameMode::GameComplete), Some(InputEvent::Continue));
    }

    #[test]
    fn test_continue_only_between_levels() {
        assert_eq!(key_to_event("n", GameMode::LevelClear), Some(InputEvent::Continue));
        assert_eq!(key_to_event("n", GameMode::Playing), None);
        assert_eq!(key_to_event("n", GameMode::Menu), None);
    }

    #[test]
    fn test_arrows_only_while_playing() {
        assert_eq!(key_to_event("ArrowLeft", GameMode::Playing), Some(InputEvent::Nudge(-1)));
        assert_eq!(key_to_event("ArrowUp", GameMode::Playing), Some(InputEvent::Nudge(2)));
        assert_eq!(key_to_event("ArrowDown", GameMode::Playing), Some(InputEvent::Nudge(-2)));
        assert_eq!(key_to_event("ArrowRight", GameMode::Menu), None);
        assert_eq!(key_to_event("x", GameMode::Playing), None);
    }
}
