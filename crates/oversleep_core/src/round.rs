//! Round data
//!
//! One playthrough's timing and scoring state. The state machine resets it on
//! every Sleep entry, the Sleep and Run controllers drain it, and the result
//! screens only read it.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{ScoringConfig, SleepConfig};
use crate::scoring::{compute_score, rank_for, Rank, ScoreInputs};

/// How the round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    Cleared,
    /// Still asleep when the allowance ran out
    Overslept,
    /// Clock ran out during the run
    TimedOut,
    Collided,
}

impl RoundOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, RoundOutcome::Cleared)
    }
}

/// Whole minutes and leftover seconds, as the result screen shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinSec {
    pub minutes: u32,
    pub seconds: u32,
}

impl MinSec {
    pub fn from_seconds(secs: f32) -> Self {
        let whole = secs.max(0.0) as u32;
        Self { minutes: whole / 60, seconds: whole % 60 }
    }
}

/// Sample the round allowance uniformly from `[min_time, max_time]`.
pub fn sample_time_limit<R: Rng + ?Sized>(cfg: &SleepConfig, rng: &mut R) -> f32 {
    if let Some(fixed) = cfg.fixed_time_limit {
        return fixed;
    }
    if cfg.max_time <= cfg.min_time {
        return cfg.min_time;
    }
    rng.gen_range(cfg.min_time..=cfg.max_time)
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoundData {
    total_time_limit: f32,
    remaining_time: f32,
    check_count: u32,
    /// Stopwatch for time spent asleep, stopped on wake.
    sleep_clock: f32,
    sleep_duration: f32,
    outcome: Option<RoundOutcome>,
}

impl RoundData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh round with the given allowance.
    pub fn with_time_limit(total_time_limit: f32) -> Self {
        let total = total_time_limit.max(0.0);
        Self { total_time_limit: total, remaining_time: total, ..Self::default() }
    }

    /// Reset everything and sample a new allowance.
    pub fn begin<R: Rng + ?Sized>(&mut self, cfg: &SleepConfig, rng: &mut R) {
        *self = Self::with_time_limit(sample_time_limit(cfg, rng));
    }

    pub fn total_time_limit(&self) -> f32 {
        self.total_time_limit
    }

    pub fn remaining_time(&self) -> f32 {
        self.remaining_time
    }

    pub fn check_count(&self) -> u32 {
        self.check_count
    }

    pub fn sleep_clock(&self) -> f32 {
        self.sleep_clock
    }

    pub fn sleep_duration(&self) -> f32 {
        self.sleep_duration
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn is_out_of_time(&self) -> bool {
        self.remaining_time <= 0.0
    }

    /// Take `amount` seconds off the clock; never goes below zero.
    pub fn drain(&mut self, amount: f32) -> f32 {
        debug_assert!(amount >= 0.0, "remaining time may only decrease, got drain of {}", amount);
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.remaining_time = (self.remaining_time - amount).max(0.0);
        self.remaining_time
    }

    pub fn record_check(&mut self) -> u32 {
        self.check_count = self.check_count.saturating_add(1);
        self.check_count
    }

    pub fn advance_sleep_clock(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0);
        self.sleep_clock += dt.max(0.0);
    }

    /// Freeze the sleep duration at the stopwatch value.
    pub fn fix_sleep_duration(&mut self) -> f32 {
        self.sleep_duration = self.sleep_clock;
        self.sleep_duration
    }

    pub fn set_outcome(&mut self, outcome: RoundOutcome) {
        self.outcome = Some(outcome);
    }

    pub fn score(&self, cfg: &ScoringConfig) -> i64 {
        if self.outcome.is_some_and(|o| o.is_failure()) {
            return 0;
        }
        compute_score(
            ScoreInputs {
                sleep_duration: self.sleep_duration,
                remaining_time: self.remaining_time,
                check_count: self.check_count,
            },
            cfg,
        )
    }

    pub fn rank(&self, cfg: &ScoringConfig) -> Rank {
        rank_for(self.score(cfg), &cfg.ranks)
    }

    pub fn summary(&self, cfg: &ScoringConfig) -> RoundSummary {
        RoundSummary {
            score: self.score(cfg),
            rank: self.rank(cfg),
            outcome: self.outcome,
            total_time_limit: self.total_time_limit,
            sleep_duration: self.sleep_duration,
            remaining_time: self.remaining_time,
            check_count: self.check_count,
            sleep_time: MinSec::from_seconds(self.sleep_duration),
            time_left: MinSec::from_seconds(self.remaining_time),
        }
    }
}

/// Read-only view for result screens and hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub score: i64,
    pub rank: Rank,
    pub outcome: Option<RoundOutcome>,
    pub total_time_limit: f32,
    pub sleep_duration: f32,
    pub remaining_time: f32,
    pub check_count: u32,
    pub sleep_time: MinSec,
    pub time_left: MinSec,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_begin_resets_round() {
        let cfg = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut round = RoundData::with_time_limit(20.0);
        round.drain(5.0);
        round.record_check();
        round.set_outcome(RoundOutcome::Collided);

        round.begin(&cfg.sleep, &mut rng);
        assert_eq!(round.check_count(), 0);
        assert_eq!(round.outcome(), None);
        assert_eq!(round.remaining_time(), round.total_time_limit());
        assert!((15.0..=25.0).contains(&round.total_time_limit()));
    }

    #[test]
    fn test_fixed_time_limit_skips_sampling() {
        let mut cfg = GameConfig::default().sleep;
        cfg.fixed_time_limit = Some(20.0);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(sample_time_limit(&cfg, &mut rng), 20.0);
    }

    #[test]
    fn test_drain_clamps_at_zero() {
        let mut round = RoundData::with_time_limit(3.0);
        assert_eq!(round.drain(1.0), 2.0);
        assert_eq!(round.drain(10.0), 0.0);
        assert!(round.is_out_of_time());
        assert_eq!(round.drain(1.0), 0.0);
    }

    #[test]
    fn test_check_count_only_grows() {
        let mut round = RoundData::new();
        assert_eq!(round.record_check(), 1);
        assert_eq!(round.record_check(), 2);
        assert_eq!(round.check_count(), 2);
    }

    #[test]
    fn test_failed_outcome_scores_zero() {
        let cfg = GameConfig::default().scoring;
        let mut round = RoundData::with_time_limit(20.0);
        round.advance_sleep_clock(5.0);
        round.fix_sleep_duration();
        round.drain(5.0);
        assert_eq!(round.score(&cfg), 8000);

        round.set_outcome(RoundOutcome::Collided);
        assert_eq!(round.score(&cfg), 0);
        assert_eq!(round.rank(&cfg), Rank::C);
    }

    #[test]
    fn test_summary_formats_times() {
        let cfg = GameConfig::dream_clock().scoring;
        let mut round = RoundData::with_time_limit(1800.0);
        round.advance_sleep_clock(125.5);
        round.fix_sleep_duration();
        round.drain(1800.0 - 61.0);
        round.set_outcome(RoundOutcome::Cleared);

        let summary = round.summary(&cfg);
        assert_eq!(summary.sleep_time, MinSec { minutes: 2, seconds: 5 });
        assert_eq!(summary.time_left, MinSec { minutes: 1, seconds: 1 });
        assert_eq!(summary.score, 1000 + 122);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_negative_drain_asserts_in_debug() {
        let mut round = RoundData::with_time_limit(3.0);
        round.drain(-1.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: sampled allowance stays inside the configured bounds
            #[test]
            fn prop_time_limit_in_bounds(seed in any::<u64>(), min in 0.0f32..100.0, span in 0.0f32..100.0) {
                let mut cfg = GameConfig::default().sleep;
                cfg.min_time = min;
                cfg.max_time = min + span;
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let t = sample_time_limit(&cfg, &mut rng);
                prop_assert!(t >= cfg.min_time && t <= cfg.max_time);
            }

            /// Property: remaining time is non-increasing and never negative
            #[test]
            fn prop_drain_monotone(start in 0.0f32..100.0, steps in proptest::collection::vec(0.0f32..5.0, 1..50)) {
                let mut round = RoundData::with_time_limit(start);
                let mut last = round.remaining_time();
                for step in steps {
                    let now = round.drain(step);
                    prop_assert!(now <= last);
                    prop_assert!(now >= 0.0);
                    prop_assert!(now <= round.total_time_limit());
                    last = now;
                }
            }
        }
    }
}
