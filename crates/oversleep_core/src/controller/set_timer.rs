//! Alarm-setting sequence between the tutorial and the first sleep
//!
//! slide in -> prompt reveal -> swipe right -> slide out -> wait ->
//! alarm rings -> hold -> alarm leaves -> Sleep

use tracing::debug;

use super::PhaseController;
use crate::collaborators::{AnimationCue, SoundCue, SoundEffect, ViewUpdate};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{InputEvent, SwipeDirection};
use crate::phase::Phase;
use crate::timer::TimerSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetTimerStage {
    #[default]
    SlidingIn,
    RevealingText,
    AwaitingSwipe,
    SlidingOut,
    AlarmDelay,
    AlarmEntering,
    AlarmHold,
    AlarmLeaving,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetTimerEvent {
    ShowAlarm,
    StartAlarmExit,
}

#[derive(Debug, Default)]
pub struct SetTimerController {
    stage: SetTimerStage,
    timers: TimerSet<SetTimerEvent>,
}

impl SetTimerController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> SetTimerStage {
        self.stage
    }

    /// Start `cue` and wait in `waiting`, or move straight on when nobody
    /// will report the animation back.
    fn play(&mut self, ctx: &mut PhaseContext<'_>, cue: AnimationCue, waiting: SetTimerStage) {
        self.stage = waiting;
        if !ctx.play_animation(cue) {
            self.animation_finished(ctx, cue);
        }
    }

    fn animation_finished(&mut self, ctx: &mut PhaseContext<'_>, cue: AnimationCue) {
        match (self.stage, cue) {
            (SetTimerStage::SlidingIn, AnimationCue::SlideSetEnter) => {
                self.play(ctx, AnimationCue::GoSleepTextReveal, SetTimerStage::RevealingText);
            }
            (SetTimerStage::RevealingText, AnimationCue::GoSleepTextReveal) => {
                self.stage = SetTimerStage::AwaitingSwipe;
            }
            (SetTimerStage::SlidingOut, AnimationCue::SlideSetExit) => {
                self.stage = SetTimerStage::AlarmDelay;
                let delay = ctx.config.presentation.set_timer_alarm_delay;
                self.timers.schedule(delay, SetTimerEvent::ShowAlarm);
            }
            (SetTimerStage::AlarmEntering, AnimationCue::AlarmRingEnter) => {
                self.stage = SetTimerStage::AlarmHold;
                let hold = ctx.config.presentation.set_timer_alarm_duration;
                self.timers.schedule(hold, SetTimerEvent::StartAlarmExit);
            }
            (SetTimerStage::AlarmLeaving, AnimationCue::AlarmRingExit) => {
                debug!("alarm set, going to sleep");
                self.stage = SetTimerStage::Done;
                ctx.request_transition(Phase::Sleep);
            }
            (stage, cue) => debug!(?stage, ?cue, "set timer: ignoring stray animation event"),
        }
    }

    fn timer_elapsed(&mut self, ctx: &mut PhaseContext<'_>, event: SetTimerEvent) {
        match event {
            SetTimerEvent::ShowAlarm => {
                // The clock face shows the allowance the alarm is set for.
                let sleep = &ctx.config.sleep;
                let allowance = sleep.fixed_time_limit.unwrap_or(sleep.max_time);
                let minutes = (allowance / 60.0).floor().max(0.0) as u32;
                ctx.show(ViewUpdate::AlarmClock { minutes });
                ctx.play_sound(SoundCue::Se(SoundEffect::Alarm));
                self.play(ctx, AnimationCue::AlarmRingEnter, SetTimerStage::AlarmEntering);
            }
            SetTimerEvent::StartAlarmExit => {
                self.play(ctx, AnimationCue::AlarmRingExit, SetTimerStage::AlarmLeaving);
            }
        }
    }
}

impl PhaseController for SetTimerController {
    fn phase(&self) -> Phase {
        Phase::SetTimer
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.timers.clear();
        self.stage = SetTimerStage::SlidingIn;
        self.play(ctx, AnimationCue::SlideSetEnter, SetTimerStage::SlidingIn);
        Ok(())
    }

    fn update(&mut self, ctx: &mut PhaseContext<'_>, dt: f32) {
        for event in self.timers.advance(dt) {
            self.timer_elapsed(ctx, event);
        }
    }

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.timers.clear();
        self.stage = SetTimerStage::Done;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        match event {
            InputEvent::AnimationFinished(cue) => self.animation_finished(ctx, cue),
            InputEvent::Swipe(SwipeDirection::Right)
                if self.stage == SetTimerStage::AwaitingSwipe =>
            {
                self.play(ctx, AnimationCue::SlideSetExit, SetTimerStage::SlidingOut);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Recorder;
    use crate::command::Command;
    use crate::config::GameConfig;
    use crate::controller::harness::Harness;

    #[test]
    fn test_sequence_without_animation_callbacks() {
        let mut h = Harness::new(GameConfig::default());
        let mut set_timer = SetTimerController::new();
        set_timer.on_enter(&mut h.ctx()).unwrap();
        assert_eq!(set_timer.stage(), SetTimerStage::AwaitingSwipe);

        set_timer.handle_input(&mut h.ctx(), InputEvent::Swipe(SwipeDirection::Left));
        assert_eq!(set_timer.stage(), SetTimerStage::AwaitingSwipe);

        set_timer.handle_input(&mut h.ctx(), InputEvent::Swipe(SwipeDirection::Right));
        assert_eq!(set_timer.stage(), SetTimerStage::AlarmDelay);

        set_timer.update(&mut h.ctx(), 0.5);
        assert_eq!(set_timer.stage(), SetTimerStage::AlarmDelay);
        set_timer.update(&mut h.ctx(), 0.5);
        assert_eq!(set_timer.stage(), SetTimerStage::AlarmHold);
        assert!(h.recorder.views().contains(&ViewUpdate::AlarmClock { minutes: 0 }));

        set_timer.update(&mut h.ctx(), 1.9);
        assert!(h.take_commands().is_empty());
        set_timer.update(&mut h.ctx(), 0.2);
        assert_eq!(h.take_commands(), vec![Command::Transition(Phase::Sleep)]);
    }

    #[test]
    fn test_swipe_waits_for_text_reveal() {
        let mut h = Harness::with_recorder(
            GameConfig::default(),
            Recorder::new().with_async_animations(),
        );
        let mut set_timer = SetTimerController::new();
        set_timer.on_enter(&mut h.ctx()).unwrap();
        assert_eq!(set_timer.stage(), SetTimerStage::SlidingIn);

        set_timer.handle_input(&mut h.ctx(), InputEvent::Swipe(SwipeDirection::Right));
        assert_eq!(set_timer.stage(), SetTimerStage::SlidingIn);

        set_timer.handle_input(
            &mut h.ctx(),
            InputEvent::AnimationFinished(AnimationCue::SlideSetEnter),
        );
        assert_eq!(set_timer.stage(), SetTimerStage::RevealingText);
        set_timer.handle_input(
            &mut h.ctx(),
            InputEvent::AnimationFinished(AnimationCue::GoSleepTextReveal),
        );
        set_timer.handle_input(&mut h.ctx(), InputEvent::Swipe(SwipeDirection::Right));
        assert_eq!(set_timer.stage(), SetTimerStage::SlidingOut);
    }

    #[test]
    fn test_exit_cancels_pending_alarm() {
        let mut h = Harness::new(GameConfig::default());
        let mut set_timer = SetTimerController::new();
        set_timer.on_enter(&mut h.ctx()).unwrap();
        set_timer.handle_input(&mut h.ctx(), InputEvent::Swipe(SwipeDirection::Right));
        set_timer.on_exit(&mut h.ctx()).unwrap();

        set_timer.update(&mut h.ctx(), 10.0);
        assert!(h.take_commands().is_empty());
        assert!(!h.recorder.views().iter().any(|v| matches!(v, ViewUpdate::AlarmClock { .. })));
    }
}
