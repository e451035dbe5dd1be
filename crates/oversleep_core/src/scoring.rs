//! Round scoring model
//!
//! `score = max(0, floor(base + sleep * W1 + remaining * W2 - checks * PENALTY))`,
//! and zero whenever nothing is left on the clock. Ranks are fixed score
//! thresholds, so the grade is monotone in the score.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{RankThresholds, ScoringConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    C,
    B,
    A,
    S,
}

impl Rank {
    pub fn letter(&self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub sleep_duration: f32,
    pub remaining_time: f32,
    pub check_count: u32,
}

pub fn compute_score(inputs: ScoreInputs, cfg: &ScoringConfig) -> i64 {
    // Oversleeping zeroes the score regardless of everything else.
    if inputs.remaining_time <= 0.0 {
        return 0;
    }
    let raw = cfg.base_bonus as f64
        + inputs.sleep_duration.max(0.0) as f64 * cfg.sleep_weight as f64
        + inputs.remaining_time as f64 * cfg.remaining_weight as f64
        - inputs.check_count as f64 * cfg.check_penalty as f64;
    raw.floor().max(0.0) as i64
}

pub fn rank_for(score: i64, thresholds: &RankThresholds) -> Rank {
    if score >= thresholds.s {
        Rank::S
    } else if score >= thresholds.a {
        Rank::A
    } else if score >= thresholds.b {
        Rank::B
    } else {
        Rank::C
    }
}
