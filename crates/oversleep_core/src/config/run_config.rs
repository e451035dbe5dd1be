//! Run phase configuration

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::obstacle::{CollisionOutcome, CollisionRule};

/// Run phase parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Taps needed to reach the station (default: 45)
    pub required_taps: u32,
    /// Clock drain rate while running (default: 1.0)
    pub time_scale: f32,

    // === Obstacles ===
    /// Inclusive lower bound of the obstacle count (default: 3)
    pub min_obstacles: u32,
    /// Exclusive upper bound of the obstacle count (default: 6)
    pub max_obstacles: u32,
    /// Attention blink before the obstacle shows (default: 1.0)
    pub warning_duration: f32,
    /// Grace window after display, no collision checks (default: 0.8)
    pub safe_time: f32,
    /// Collision-eligible time before the obstacle despawns (default: 0.5)
    pub despawn_delay: f32,

    pub collision_rule: CollisionRule,
    pub collision_outcome: CollisionOutcome,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            required_taps: 45,
            time_scale: 1.0,
            min_obstacles: 3,
            max_obstacles: 6,
            warning_duration: 1.0,
            safe_time: 0.8,
            despawn_delay: 0.5,
            collision_rule: CollisionRule::SameLane,
            collision_outcome: CollisionOutcome::Fail,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.required_taps == 0 {
            return Err(GameError::invalid_config("run.required_taps", "must be at least 1"));
        }
        if self.time_scale <= 0.0 || !self.time_scale.is_finite() {
            return Err(GameError::invalid_config("run.time_scale", "must be a finite value > 0"));
        }
        if self.min_obstacles == 0 {
            return Err(GameError::invalid_config("run.min_obstacles", "must be at least 1"));
        }
        if self.max_obstacles <= self.min_obstacles {
            return Err(GameError::invalid_config(
                "run.max_obstacles",
                format!(
                    "exclusive bound {} must exceed min_obstacles {}",
                    self.max_obstacles, self.min_obstacles
                ),
            ));
        }
        for (field, value) in [
            ("run.warning_duration", self.warning_duration),
            ("run.safe_time", self.safe_time),
            ("run.despawn_delay", self.despawn_delay),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(GameError::invalid_config(field, "must be a finite value >= 0"));
            }
        }
        if let CollisionOutcome::Stun { duration } = self.collision_outcome {
            if duration <= 0.0 || !duration.is_finite() {
                return Err(GameError::invalid_config(
                    "run.collision_outcome",
                    "stun duration must be a finite value > 0",
                ));
            }
        }
        Ok(())
    }
}
