//! Scoring weights and rank thresholds

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Minimum scores for each letter grade. Anything below `b` is a C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankThresholds {
    pub s: i64,
    pub a: i64,
    pub b: i64,
}

/// `score = max(0, floor(base + sleep * W1 + remaining * W2 - checks * PENALTY))`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Flat bonus for any successful round (default: 0)
    pub base_bonus: f32,
    /// W1, points per second slept (default: 100)
    pub sleep_weight: f32,
    /// W2, points per second left on the clock (default: 500)
    pub remaining_weight: f32,
    /// PENALTY, points lost per watch inspection (default: 0)
    pub check_penalty: f32,
    pub ranks: RankThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base_bonus: 0.0,
            sleep_weight: 100.0,
            remaining_weight: 500.0,
            check_penalty: 0.0,
            ranks: RankThresholds { s: 10_000, a: 7_500, b: 5_000 },
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("scoring.base_bonus", self.base_bonus),
            ("scoring.sleep_weight", self.sleep_weight),
            ("scoring.remaining_weight", self.remaining_weight),
            ("scoring.check_penalty", self.check_penalty),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(GameError::invalid_config(field, "weights must be finite and >= 0"));
            }
        }
        let r = self.ranks;
        if !(r.s >= r.a && r.a >= r.b) {
            return Err(GameError::invalid_config(
                "scoring.ranks",
                format!("expected s >= a >= b, got {} / {} / {}", r.s, r.a, r.b),
            ));
        }
        Ok(())
    }
}
