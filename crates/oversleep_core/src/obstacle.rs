//! Run-phase obstacle model
//!
//! Progress runs from 0 to 1 in fixed steps per tap. Obstacles are scheduled
//! at trigger points spread over `[0.1, 0.9)`: the range is cut into `N`
//! equal buckets and each trigger sits in the first 80% of its bucket.
//! So triggers are strictly increasing and never land in the first or last
//! tenth of the run.
//!
//! A spawned obstacle walks through three stages:
//! - Warning: the attention blink, not yet visible as an obstacle
//! - Grace: displayed, collisions not evaluated
//! - Eligible: collisions evaluated until the obstacle despawns

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::input::SwipeDirection;

pub const TRIGGER_START: f32 = 0.1;
pub const TRIGGER_END: f32 = 0.9;
/// Share of each bucket the jitter may occupy.
pub const TRIGGER_JITTER: f32 = 0.8;
/// Obstacle sub-positions: 0-1 approach on the left, 2-3 on the right.
pub const SPAWN_SLOTS: u8 = 4;

/// Lane an obstacle approaches in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lane {
    Left,
    Right,
}

impl Lane {
    pub fn opposite(&self) -> Lane {
        match self {
            Lane::Left => Lane::Right,
            Lane::Right => Lane::Left,
        }
    }

    pub fn from_slot(slot: u8) -> Lane {
        if slot < SPAWN_SLOTS / 2 {
            Lane::Left
        } else {
            Lane::Right
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlayerLane {
    Left,
    #[default]
    Center,
    Right,
}

impl PlayerLane {
    /// Horizontal swipes jump straight to that side; vertical swipes do nothing.
    pub fn after_swipe(self, direction: SwipeDirection) -> PlayerLane {
        match direction {
            SwipeDirection::Left => PlayerLane::Left,
            SwipeDirection::Right => PlayerLane::Right,
            SwipeDirection::Up | SwipeDirection::Down => self,
        }
    }

    pub fn is_in(&self, lane: Lane) -> bool {
        matches!(
            (self, lane),
            (PlayerLane::Left, Lane::Left) | (PlayerLane::Right, Lane::Right)
        )
    }
}

/// When a collision-eligible obstacle hits the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CollisionRule {
    /// The player stands in the obstacle's lane.
    #[default]
    SameLane,
    /// The player has not dodged to the opposite lane (center counts as hit).
    NotOpposite,
}

impl CollisionRule {
    pub fn collides(&self, obstacle: Lane, player: PlayerLane) -> bool {
        match self {
            CollisionRule::SameLane => player.is_in(obstacle),
            CollisionRule::NotOpposite => !player.is_in(obstacle.opposite()),
        }
    }
}

/// What a collision does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum CollisionOutcome {
    /// The run ends in failure.
    #[default]
    Fail,
    /// Tap input locks for `duration` seconds and the obstacle is cleared.
    Stun { duration: f32 },
}

// ============================================================================
// Trigger scheduling
// ============================================================================

/// Trigger points for `count` obstacles, with `jitter(max)` returning a value in `[0, max)`.
pub fn trigger_points(count: u32, mut jitter: impl FnMut(f32) -> f32) -> VecDeque<f32> {
    let mut triggers = VecDeque::with_capacity(count as usize);
    if count == 0 {
        return triggers;
    }
    let step = (TRIGGER_END - TRIGGER_START) / count as f32;
    for i in 0..count {
        let offset = jitter(step * TRIGGER_JITTER).clamp(0.0, step * TRIGGER_JITTER);
        triggers.push_back(TRIGGER_START + step * i as f32 + offset);
    }
    triggers
}

/// Draw `N` in `[min, max_exclusive)` and build the trigger queue.
pub fn generate_triggers<R: Rng + ?Sized>(
    rng: &mut R,
    min: u32,
    max_exclusive: u32,
) -> VecDeque<f32> {
    let count = if max_exclusive > min { rng.gen_range(min..max_exclusive) } else { min };
    trigger_points(count, |max| if max > 0.0 { rng.gen_range(0.0..max) } else { 0.0 })
}

/// Pick one of the four sub-positions; they collapse to two lanes.
pub fn sample_spawn<R: Rng + ?Sized>(rng: &mut R) -> (Lane, u8) {
    let slot = rng.gen_range(0..SPAWN_SLOTS);
    (Lane::from_slot(slot), slot)
}

/// Ascending queue of pending trigger points.
#[derive(Debug, Clone, Default)]
pub struct TriggerQueue {
    triggers: VecDeque<f32>,
}

impl TriggerQueue {
    pub fn new(triggers: VecDeque<f32>) -> Self {
        debug_assert!(triggers.iter().zip(triggers.iter().skip(1)).all(|(a, b)| a < b));
        Self { triggers }
    }

    /// Pop every trigger at or below `progress`; returns how many fired.
    pub fn pop_due(&mut self, progress: f32) -> usize {
        let mut fired = 0;
        while let Some(&head) = self.triggers.front() {
            if head > progress {
                break;
            }
            self.triggers.pop_front();
            fired += 1;
        }
        fired
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn clear(&mut self) {
        self.triggers.clear();
    }

    pub fn as_slice(&self) -> Vec<f32> {
        self.triggers.iter().copied().collect()
    }
}

// ============================================================================
// Live obstacle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleTimings {
    pub warning: f32,
    pub safe_time: f32,
    pub despawn_delay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleStage {
    Warning { remaining: f32 },
    Grace { remaining: f32 },
    Eligible { remaining: f32 },
    Gone,
}

impl ObstacleStage {
    fn with_remaining(self, remaining: f32) -> Self {
        match self {
            ObstacleStage::Warning { .. } => ObstacleStage::Warning { remaining },
            ObstacleStage::Grace { .. } => ObstacleStage::Grace { remaining },
            ObstacleStage::Eligible { .. } => ObstacleStage::Eligible { remaining },
            ObstacleStage::Gone => ObstacleStage::Gone,
        }
    }
}

/// Stage changes reported by [`LiveObstacle::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstacleEvent {
    Displayed,
    BecameEligible,
    Despawned,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LiveObstacle {
    pub lane: Lane,
    pub slot: u8,
    stage: ObstacleStage,
    timings: ObstacleTimings,
}

impl LiveObstacle {
    pub fn spawn(lane: Lane, slot: u8, timings: ObstacleTimings) -> Self {
        Self { lane, slot, stage: ObstacleStage::Warning { remaining: timings.warning }, timings }
    }

    pub fn stage(&self) -> ObstacleStage {
        self.stage
    }

    pub fn is_eligible(&self) -> bool {
        matches!(self.stage, ObstacleStage::Eligible { .. })
    }

    pub fn is_gone(&self) -> bool {
        matches!(self.stage, ObstacleStage::Gone)
    }

    /// Count the current stage down by `dt`, carrying leftover time into the next stage.
    pub fn advance(&mut self, dt: f32) -> Vec<ObstacleEvent> {
        let mut events = Vec::new();
        let mut budget = dt.max(0.0);

        loop {
            let (remaining, next, event) = match self.stage {
                ObstacleStage::Warning { remaining } => (
                    remaining,
                    ObstacleStage::Grace { remaining: self.timings.safe_time },
                    ObstacleEvent::Displayed,
                ),
                ObstacleStage::Grace { remaining } => (
                    remaining,
                    ObstacleStage::Eligible { remaining: self.timings.despawn_delay },
                    ObstacleEvent::BecameEligible,
                ),
                ObstacleStage::Eligible { remaining } => {
                    (remaining, ObstacleStage::Gone, ObstacleEvent::Despawned)
                }
                ObstacleStage::Gone => break,
            };

            if budget < remaining {
                self.stage = self.stage.with_remaining(remaining - budget);
                break;
            }

            budget -= remaining;
            self.stage = next;
            events.push(event);

            // An eligible obstacle must be seen by at least one collision
            // check before it can leave.
            if event == ObstacleEvent::BecameEligible {
                self.stage = ObstacleStage::Eligible {
                    remaining: (self.timings.despawn_delay - budget).max(f32::EPSILON),
                };
                break;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn timings() -> ObstacleTimings {
        ObstacleTimings { warning: 1.0, safe_time: 0.8, despawn_delay: 0.5 }
    }

    #[test]
    fn test_collision_rules() {
        let same = CollisionRule::SameLane;
        assert!(same.collides(Lane::Left, PlayerLane::Left));
        assert!(!same.collides(Lane::Left, PlayerLane::Center));
        assert!(!same.collides(Lane::Left, PlayerLane::Right));

        let not_opposite = CollisionRule::NotOpposite;
        assert!(not_opposite.collides(Lane::Left, PlayerLane::Left));
        assert!(not_opposite.collides(Lane::Left, PlayerLane::Center));
        assert!(!not_opposite.collides(Lane::Left, PlayerLane::Right));
        assert!(!not_opposite.collides(Lane::Right, PlayerLane::Left));
    }

    #[test]
    fn test_player_lane_swipes() {
        let lane = PlayerLane::default();
        assert_eq!(lane, PlayerLane::Center);
        assert_eq!(lane.after_swipe(SwipeDirection::Left), PlayerLane::Left);
        assert_eq!(PlayerLane::Left.after_swipe(SwipeDirection::Right), PlayerLane::Right);
        assert_eq!(PlayerLane::Left.after_swipe(SwipeDirection::Up), PlayerLane::Left);
    }

    #[test]
    fn test_slots_collapse_to_lanes() {
        assert_eq!(Lane::from_slot(0), Lane::Left);
        assert_eq!(Lane::from_slot(1), Lane::Left);
        assert_eq!(Lane::from_slot(2), Lane::Right);
        assert_eq!(Lane::from_slot(3), Lane::Right);
    }

    #[test]
    fn test_trigger_points_without_jitter() {
        let t = trigger_points(4, |_| 0.0);
        let expected = [0.1, 0.3, 0.5, 0.7];
        for (got, want) in t.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_trigger_points_max_jitter_stays_in_bucket() {
        let t: Vec<f32> = trigger_points(2, |max| max).into_iter().collect();
        // step 0.4, jitter 0.32
        assert!((t[0] - 0.42).abs() < 1e-6);
        assert!((t[1] - 0.82).abs() < 1e-6);
        assert!(t[1] < TRIGGER_END);
    }

    #[test]
    fn test_generate_triggers_count_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..200 {
            let t = generate_triggers(&mut rng, 3, 6);
            assert!((3..6).contains(&(t.len() as u32)));
        }
    }

    #[test]
    fn test_queue_pops_all_due_triggers() {
        let mut q = TriggerQueue::new(trigger_points(4, |_| 0.0));
        assert_eq!(q.pop_due(0.05), 0);
        assert_eq!(q.pop_due(0.31), 2);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop_due(1.0), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn test_obstacle_stage_sequence() {
        let mut o = LiveObstacle::spawn(Lane::Left, 0, timings());
        assert!(o.advance(0.5).is_empty());
        assert_eq!(o.advance(0.5), vec![ObstacleEvent::Displayed]);
        assert!(!o.is_eligible());

        assert!(o.advance(0.6).is_empty());
        assert_eq!(o.advance(0.3), vec![ObstacleEvent::BecameEligible]);
        assert!(o.is_eligible());

        assert_eq!(o.advance(0.6), vec![ObstacleEvent::Despawned]);
        assert!(o.is_gone());
        assert!(o.advance(1.0).is_empty());
    }

    #[test]
    fn test_large_step_stops_at_eligible() {
        let mut o = LiveObstacle::spawn(Lane::Right, 3, timings());
        let events = o.advance(10.0);
        assert_eq!(events, vec![ObstacleEvent::Displayed, ObstacleEvent::BecameEligible]);
        assert!(o.is_eligible());
        assert_eq!(o.advance(0.01), vec![ObstacleEvent::Despawned]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: triggers lie in [0.1, 0.9) and are strictly increasing
            #[test]
            fn prop_triggers_bounded_and_increasing(seed in any::<u64>(), min in 1u32..10, extra in 1u32..10) {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let triggers: Vec<f32> = generate_triggers(&mut rng, min, min + extra).into_iter().collect();
                prop_assert!(!triggers.is_empty());
                for t in &triggers {
                    prop_assert!(*t >= TRIGGER_START && *t < TRIGGER_END);
                }
                for pair in triggers.windows(2) {
                    prop_assert!(pair[0] < pair[1]);
                }
            }

            /// Property: same-lane hits are always also not-opposite hits
            #[test]
            fn prop_same_lane_implies_not_opposite(left in any::<bool>(), player in 0u8..3) {
                let lane = if left { Lane::Left } else { Lane::Right };
                let player = match player { 0 => PlayerLane::Left, 1 => PlayerLane::Center, _ => PlayerLane::Right };
                if CollisionRule::SameLane.collides(lane, player) {
                    prop_assert!(CollisionRule::NotOpposite.collides(lane, player));
                }
            }
        }
    }
}
