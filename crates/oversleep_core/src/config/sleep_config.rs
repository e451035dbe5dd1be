//! Sleep phase configuration

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Sleep phase parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleepConfig {
    /// Lower bound of the sampled allowance, seconds (default: 15)
    pub min_time: f32,
    /// Upper bound of the sampled allowance, seconds (default: 25)
    pub max_time: f32,
    /// Skips sampling and uses this allowance every round
    pub fixed_time_limit: Option<f32>,

    /// Drain rate range while dreaming, resampled on every return to the dream (default: 1.0..1.0)
    pub time_scale_range: (f32, f32),

    /// Watch inspections available per round (default: 3)
    pub max_checks: u32,
    /// Remaining-time levels (hurry, panic) for the watch pop-up, seconds (default: 300, 100)
    pub urgency_thresholds: (f32, f32),

    /// Delay between a voluntary wake-up and the Run phase (default: 2.0)
    pub wake_transition_delay: f32,
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            min_time: 15.0,
            max_time: 25.0,
            fixed_time_limit: None,
            time_scale_range: (1.0, 1.0),
            max_checks: 3,
            urgency_thresholds: (300.0, 100.0),
            wake_transition_delay: 2.0,
        }
    }
}

impl SleepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_time < 0.0 || !self.min_time.is_finite() {
            return Err(GameError::invalid_config("sleep.min_time", "must be a finite value >= 0"));
        }
        if self.max_time < self.min_time || !self.max_time.is_finite() {
            return Err(GameError::invalid_config(
                "sleep.max_time",
                format!("{} is below min_time {}", self.max_time, self.min_time),
            ));
        }
        if let Some(fixed) = self.fixed_time_limit {
            if fixed <= 0.0 || !fixed.is_finite() {
                return Err(GameError::invalid_config("sleep.fixed_time_limit", "must be > 0"));
            }
        }
        let (lo, hi) = self.time_scale_range;
        if lo <= 0.0 || hi < lo || !lo.is_finite() || !hi.is_finite() {
            return Err(GameError::invalid_config(
                "sleep.time_scale_range",
                format!("expected 0 < low <= high, got ({}, {})", lo, hi),
            ));
        }
        let (hurry, panic) = self.urgency_thresholds;
        if panic > hurry || panic < 0.0 || !panic.is_finite() || !hurry.is_finite() {
            return Err(GameError::invalid_config(
                "sleep.urgency_thresholds",
                format!("panic {} must not exceed hurry {}", panic, hurry),
            ));
        }
        if self.wake_transition_delay < 0.0 || !self.wake_transition_delay.is_finite() {
            return Err(GameError::invalid_config(
                "sleep.wake_transition_delay",
                "must be a finite value >= 0",
            ));
        }
        Ok(())
    }
}
