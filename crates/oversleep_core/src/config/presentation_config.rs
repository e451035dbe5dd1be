//! Timings for the non-scoring phases

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Time spent on the loading screen (default: 1.5)
    pub loading_duration: f32,
    /// Loading image swap interval (default: 0.5)
    pub loading_frame_interval: f32,
    pub loading_frame_count: usize,

    pub prologue_lines: Vec<String>,
    /// Typewriter speed, seconds per character (default: 0.05)
    pub prologue_char_interval: f32,

    pub tutorial_pages: usize,

    /// Pause between the slide-out and the alarm clock (default: 1.0)
    pub set_timer_alarm_delay: f32,
    /// How long the alarm clock stays before leaving (default: 2.0)
    pub set_timer_alarm_duration: f32,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            loading_duration: 1.5,
            loading_frame_interval: 0.5,
            loading_frame_count: 4,
            prologue_lines: vec![
                "Tomorrow is the day of the big exam.".to_string(),
                "The first train leaves at dawn.".to_string(),
                "Just a little more sleep...".to_string(),
            ],
            prologue_char_interval: 0.05,
            tutorial_pages: 3,
            set_timer_alarm_delay: 1.0,
            set_timer_alarm_duration: 2.0,
        }
    }
}

impl PresentationConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("presentation.loading_frame_interval", self.loading_frame_interval),
            ("presentation.prologue_char_interval", self.prologue_char_interval),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(GameError::invalid_config(field, "must be a finite value > 0"));
            }
        }
        for (field, value) in [
            ("presentation.loading_duration", self.loading_duration),
            ("presentation.set_timer_alarm_delay", self.set_timer_alarm_delay),
            ("presentation.set_timer_alarm_duration", self.set_timer_alarm_duration),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(GameError::invalid_config(field, "must be a finite value >= 0"));
            }
        }
        Ok(())
    }
}
