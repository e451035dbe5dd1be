//! Run phase: tap to the station, dodge obstacles on the way
//!
//! Per tick, in order: drain the clock, timeout, input lock, obstacle
//! timers and collision, clear. A timeout and a clear landing on the same
//! tick therefore count as a timeout.

use tracing::{debug, info};

use super::PhaseController;
use crate::collaborators::{BgmTrack, SoundCue, SoundEffect, ViewUpdate};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{Button, InputEvent};
use crate::obstacle::{
    generate_triggers, sample_spawn, CollisionOutcome, Lane, LiveObstacle, ObstacleEvent,
    ObstacleTimings, PlayerLane, TriggerQueue,
};
use crate::phase::Phase;
use crate::round::RoundOutcome;

#[derive(Debug, Default)]
pub struct RunController {
    taps: u32,
    player: PlayerLane,
    triggers: TriggerQueue,
    obstacle: Option<LiveObstacle>,
    input_lock: f32,
    finished: bool,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn taps(&self) -> u32 {
        self.taps
    }

    /// `taps / required_taps`, settled at 1.0.
    pub fn progress(&self, required_taps: u32) -> f32 {
        if required_taps == 0 {
            return 1.0;
        }
        (self.taps as f32 / required_taps as f32).min(1.0)
    }

    pub fn player_lane(&self) -> PlayerLane {
        self.player
    }

    pub fn obstacle(&self) -> Option<&LiveObstacle> {
        self.obstacle.as_ref()
    }

    pub fn pending_triggers(&self) -> Vec<f32> {
        self.triggers.as_slice()
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_lock > 0.0
    }

    /// Spawn an obstacle right now, bypassing the trigger queue.
    pub fn force_spawn(&mut self, ctx: &mut PhaseContext<'_>, lane: Lane, slot: u8) {
        if self.obstacle.take().is_some() {
            ctx.show(ViewUpdate::ObstacleHidden);
        }
        let run = &ctx.config.run;
        let timings = ObstacleTimings {
            warning: run.warning_duration,
            safe_time: run.safe_time,
            despawn_delay: run.despawn_delay,
        };
        debug!(?lane, slot, "obstacle incoming");
        ctx.play_sound(SoundCue::Se(SoundEffect::ObstacleWarning));
        ctx.show(ViewUpdate::ObstacleWarning(lane));
        self.obstacle = Some(LiveObstacle::spawn(lane, slot, timings));
    }

    fn finish(&mut self, ctx: &mut PhaseContext<'_>, outcome: RoundOutcome) {
        if self.finished {
            return;
        }
        info!(?outcome, taps = self.taps, remaining = ctx.round.remaining_time(), "run over");
        self.finished = true;
        ctx.finish(outcome);
    }

    fn tap(&mut self, ctx: &mut PhaseContext<'_>) {
        if self.is_input_locked() {
            return;
        }
        let required = ctx.config.run.required_taps;
        self.taps = (self.taps + 1).min(required);
        let progress = self.progress(required);
        ctx.play_sound(SoundCue::Se(SoundEffect::Footstep));
        ctx.show(ViewUpdate::RunProgress(progress));

        for _ in 0..self.triggers.pop_due(progress) {
            let (lane, slot) = sample_spawn(ctx.rng);
            self.force_spawn(ctx, lane, slot);
        }
    }

    fn advance_obstacle(&mut self, ctx: &mut PhaseContext<'_>, dt: f32) {
        let Some(obstacle) = self.obstacle.as_mut() else {
            return;
        };
        for event in obstacle.advance(dt) {
            match event {
                ObstacleEvent::Displayed => {
                    ctx.show(ViewUpdate::ObstacleShown { lane: obstacle.lane, slot: obstacle.slot })
                }
                ObstacleEvent::BecameEligible => debug!("obstacle safe time over"),
                ObstacleEvent::Despawned => ctx.show(ViewUpdate::ObstacleHidden),
            }
        }

        if obstacle.is_gone() {
            self.obstacle = None;
            return;
        }
        let lane = obstacle.lane;
        if self.input_lock > 0.0 || !obstacle.is_eligible() {
            return;
        }
        if !ctx.config.run.collision_rule.collides(lane, self.player) {
            return;
        }

        ctx.play_sound(SoundCue::Se(SoundEffect::Collision));
        match ctx.config.run.collision_outcome {
            CollisionOutcome::Fail => self.finish(ctx, RoundOutcome::Collided),
            CollisionOutcome::Stun { duration } => {
                debug!(duration, "stunned");
                self.obstacle = None;
                self.input_lock = duration;
                ctx.show(ViewUpdate::ObstacleHidden);
                ctx.show(ViewUpdate::InputLocked(true));
            }
        }
    }
}

impl PhaseController for RunController {
    fn phase(&self) -> Phase {
        Phase::Run
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        let run = &ctx.config.run;
        let (min, max) = (run.min_obstacles, run.max_obstacles);
        *self = Self {
            triggers: TriggerQueue::new(generate_triggers(ctx.rng, min, max)),
            ..Self::default()
        };
        debug!(triggers = ?self.triggers.as_slice(), "run started");

        ctx.play_sound(SoundCue::Bgm(BgmTrack::Run));
        ctx.show(ViewUpdate::RunTimer(ctx.round.remaining_time()));
        ctx.show(ViewUpdate::RunProgress(0.0));
        ctx.show(ViewUpdate::PlayerLane(self.player));
        Ok(())
    }

    fn update(&mut self, ctx: &mut PhaseContext<'_>, dt: f32) {
        if self.finished {
            return;
        }

        let remaining = ctx.round.drain(ctx.config.run.time_scale * dt);
        ctx.show(ViewUpdate::RunTimer(remaining));
        if ctx.round.is_out_of_time() {
            self.finish(ctx, RoundOutcome::TimedOut);
            return;
        }

        if self.input_lock > 0.0 {
            self.input_lock = (self.input_lock - dt).max(0.0);
            if self.input_lock == 0.0 {
                ctx.show(ViewUpdate::InputLocked(false));
            }
        }

        self.advance_obstacle(ctx, dt);
        if self.finished {
            return;
        }

        if self.progress(ctx.config.run.required_taps) >= 1.0 {
            self.finish(ctx, RoundOutcome::Cleared);
        }
    }

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.triggers.clear();
        self.obstacle = None;
        self.input_lock = 0.0;
        self.finished = true;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        if self.finished {
            return;
        }
        match event {
            InputEvent::Tap | InputEvent::Button(Button::Start) => self.tap(ctx),
            InputEvent::Swipe(direction) => {
                let lane = self.player.after_swipe(direction);
                if lane != self.player {
                    self.player = lane;
                    ctx.show(ViewUpdate::PlayerLane(lane));
                }
            }
            _ => {}
        }
    }
}
