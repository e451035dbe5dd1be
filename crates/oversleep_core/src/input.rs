//! Discrete input events
//!
//! The host translates touches, clicks and presentation callbacks into these
//! edge-triggered events. The core never polls device state.

use serde::{Deserialize, Serialize};

use crate::collaborators::AnimationCue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

/// UI buttons that map to game commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Start,
    CheckWatch,
    WakeUp,
    BackToSleep,
    Retry,
    BackToTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Tap,
    Swipe(SwipeDirection),
    Button(Button),
    /// Reported by the presentation layer when an animation that
    /// `play_animation` promised to report has finished.
    AnimationFinished(AnimationCue),
}

impl InputEvent {
    pub fn is_player_input(&self) -> bool {
        !matches!(self, InputEvent::AnimationFinished(_))
    }
}
