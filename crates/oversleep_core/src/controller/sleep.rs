//! Sleep phase: dream, peek at the watch, decide when to get up
//!
//! Remaining time drains only while dreaming, at a rate resampled every time
//! the player dozes off again. The sleep stopwatch keeps running while the
//! watch is up and stops on wake-up. Leaving for the Run phase goes through
//! the state machine, which turns an overslept round into GameOver.

use rand::Rng;
use tracing::{debug, info};

use super::PhaseController;
use crate::collaborators::{AnimationCue, BgmTrack, SoundCue, SoundEffect, Urgency, ViewUpdate};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{Button, InputEvent};
use crate::phase::Phase;
use crate::timer::TimerSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SleepState {
    #[default]
    Dream,
    /// The watch pop-up is up; buttons unlock once it has finished entering.
    CheckWatch { ready: bool },
    ReturningToDream,
    WakingUp,
    /// Waiting out the wake transition delay.
    Leaving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SleepTimer {
    LeaveForRun,
}

/// Pop-up level for the watch face.
pub fn urgency_for(remaining: f32, thresholds: (f32, f32), checks_exhausted: bool) -> Urgency {
    let (hurry, panic) = thresholds;
    if checks_exhausted || remaining <= panic {
        Urgency::Panic
    } else if remaining <= hurry {
        Urgency::Hurry
    } else {
        Urgency::Calm
    }
}

#[derive(Debug)]
pub struct SleepController {
    state: SleepState,
    drain_rate: f32,
    timers: TimerSet<SleepTimer>,
    left: bool,
}

impl Default for SleepController {
    fn default() -> Self {
        Self { state: SleepState::Dream, drain_rate: 1.0, timers: TimerSet::new(), left: false }
    }
}

impl SleepController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SleepState {
        self.state
    }

    pub fn drain_rate(&self) -> f32 {
        self.drain_rate
    }

    fn checks_left(ctx: &PhaseContext<'_>) -> u32 {
        ctx.config.sleep.max_checks.saturating_sub(ctx.round.check_count())
    }

    fn resample_drain_rate(&mut self, ctx: &mut PhaseContext<'_>) {
        let (lo, hi) = ctx.config.sleep.time_scale_range;
        self.drain_rate = if hi > lo { ctx.rng.gen_range(lo..=hi) } else { lo };
        debug!(rate = self.drain_rate, "dream drain rate");
    }

    fn enter_dream(&mut self, ctx: &mut PhaseContext<'_>) {
        self.state = SleepState::Dream;
        self.resample_drain_rate(ctx);
        let can_check = Self::checks_left(ctx) > 0;
        ctx.show(ViewUpdate::SleepButtons { check: can_check, wake_up: false, back_to_sleep: false });
    }

    fn check_watch(&mut self, ctx: &mut PhaseContext<'_>) {
        if Self::checks_left(ctx) == 0 {
            debug!("no watch checks left");
            return;
        }
        let checks = ctx.round.record_check();
        let remaining = ctx.round.remaining_time();
        let exhausted = Self::checks_left(ctx) == 0;
        let urgency = urgency_for(remaining, ctx.config.sleep.urgency_thresholds, exhausted);
        debug!(checks, remaining, ?urgency, "checking the watch");

        self.state = SleepState::CheckWatch { ready: false };
        ctx.play_sound(SoundCue::Se(SoundEffect::CheckWatch));
        let minutes = (remaining / 60.0).floor() as u32;
        ctx.show(ViewUpdate::WatchFace { minutes, urgency });
        ctx.show(ViewUpdate::SleepButtons { check: false, wake_up: false, back_to_sleep: false });
        if !ctx.play_animation(AnimationCue::CheckWatchEnter) {
            self.watch_ready(ctx);
        }
    }

    fn watch_ready(&mut self, ctx: &mut PhaseContext<'_>) {
        self.state = SleepState::CheckWatch { ready: true };
        let back_to_sleep = Self::checks_left(ctx) > 0;
        ctx.show(ViewUpdate::SleepButtons { check: false, wake_up: true, back_to_sleep });
    }

    fn back_to_sleep(&mut self, ctx: &mut PhaseContext<'_>) {
        if Self::checks_left(ctx) == 0 {
            debug!("back to sleep refused, checks used up");
            return;
        }
        self.state = SleepState::ReturningToDream;
        ctx.show(ViewUpdate::SleepButtons { check: false, wake_up: false, back_to_sleep: false });
        if !ctx.play_animation(AnimationCue::CheckWatchExit) {
            self.enter_dream(ctx);
        }
    }

    fn wake_up(&mut self, ctx: &mut PhaseContext<'_>) {
        info!(sleep_clock = ctx.round.sleep_clock(), "waking up");
        self.state = SleepState::WakingUp;
        ctx.play_sound(SoundCue::StopBgm);
        ctx.play_sound(SoundCue::Se(SoundEffect::WakeUp));
        ctx.show(ViewUpdate::SleepButtons { check: false, wake_up: false, back_to_sleep: false });
        if !ctx.play_animation(AnimationCue::WakeUpEnter) {
            self.start_leaving(ctx);
        }
    }

    fn start_leaving(&mut self, ctx: &mut PhaseContext<'_>) {
        self.state = SleepState::Leaving;
        self.timers.schedule(ctx.config.sleep.wake_transition_delay, SleepTimer::LeaveForRun);
    }

    fn leave(&mut self, ctx: &mut PhaseContext<'_>) {
        if !self.left {
            self.left = true;
            ctx.request_transition(Phase::Run);
        }
    }
}

impl PhaseController for SleepController {
    fn phase(&self) -> Phase {
        Phase::Sleep
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.timers.clear();
        self.left = false;
        ctx.play_sound(SoundCue::Bgm(BgmTrack::Sleep));
        self.enter_dream(ctx);
        Ok(())
    }

    fn update(&mut self, ctx: &mut PhaseContext<'_>, dt: f32) {
        for event in self.timers.advance(dt) {
            match event {
                SleepTimer::LeaveForRun => self.leave(ctx),
            }
        }

        match self.state {
            SleepState::Dream => {
                ctx.round.advance_sleep_clock(dt);
                ctx.round.drain(self.drain_rate * dt);
                if ctx.round.is_out_of_time() {
                    info!("overslept while dreaming");
                    self.state = SleepState::Leaving;
                    ctx.play_sound(SoundCue::StopBgm);
                    ctx.play_sound(SoundCue::Se(SoundEffect::Alarm));
                    self.leave(ctx);
                }
            }
            SleepState::CheckWatch { .. } | SleepState::ReturningToDream => {
                ctx.round.advance_sleep_clock(dt);
            }
            SleepState::WakingUp | SleepState::Leaving => {}
        }
    }

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.timers.clear();
        self.left = true;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        match (self.state, event) {
            (SleepState::Dream, InputEvent::Button(Button::CheckWatch)) => self.check_watch(ctx),
            (
                SleepState::CheckWatch { ready: false },
                InputEvent::AnimationFinished(AnimationCue::CheckWatchEnter),
            ) => self.watch_ready(ctx),
            (SleepState::CheckWatch { ready: true }, InputEvent::Button(Button::WakeUp)) => {
                self.wake_up(ctx)
            }
            (SleepState::CheckWatch { ready: true }, InputEvent::Button(Button::BackToSleep)) => {
                self.back_to_sleep(ctx)
            }
            (
                SleepState::ReturningToDream,
                InputEvent::AnimationFinished(AnimationCue::CheckWatchExit),
            ) => self.enter_dream(ctx),
            (SleepState::WakingUp, InputEvent::AnimationFinished(AnimationCue::WakeUpEnter)) => {
                self.start_leaving(ctx)
            }
            _ => {}
        }
    }
}
