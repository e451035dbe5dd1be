//! Scripted player for headless runs
//!
//! Looks at the current phase, the round data and the view updates of the
//! last frame, and answers with the inputs a player would send.

use anyhow::{Context, Result};
use oversleep_core::{
    Button, Collaborators, GameConfig, InputEvent, Lane, Phase, PhaseStateMachine, Recorder,
    RoundData, RoundSummary, SwipeDirection, ViewUpdate,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::sinks::{LogAudio, ScoreBoard};

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOptions {
    /// Seconds to sleep before getting up; drawn at random when unset.
    pub sleep_seconds: Option<f32>,
    /// Extra watch checks spread over the sleep.
    pub extra_checks: u32,
    pub taps_per_second: f32,
    /// Swipe away from every announced obstacle.
    pub dodge: bool,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self { sleep_seconds: None, extra_checks: 0, taps_per_second: 8.0, dodge: true }
    }
}

pub struct Autopilot {
    opts: PlanOptions,
    rng: ChaCha8Rng,
    last_phase: Option<Phase>,
    sleep_target: f32,
    check_times: Vec<f32>,
    woke: bool,
    tap_timer: f32,
}

impl Autopilot {
    pub fn new(opts: PlanOptions, seed: u64) -> Self {
        Self {
            opts,
            rng: ChaCha8Rng::seed_from_u64(seed),
            last_phase: None,
            sleep_target: 0.0,
            check_times: Vec::new(),
            woke: false,
            tap_timer: 0.0,
        }
    }

    fn plan_sleep(&mut self, config: &GameConfig, round: &RoundData) {
        let allowance = round.total_time_limit();
        self.sleep_target = match self.opts.sleep_seconds {
            Some(seconds) => seconds,
            // Unaware of the real allowance, aim for part of the minimum.
            None => config.sleep.fixed_time_limit.unwrap_or(config.sleep.min_time)
                * self.rng.gen_range(0.3..0.7),
        };
        let extra = self.opts.extra_checks.min(config.sleep.max_checks.saturating_sub(1));
        self.check_times = (1..=extra)
            .map(|k| self.sleep_target * k as f32 / (extra + 1) as f32)
            .collect();
        self.woke = false;
        debug!(
            "Sleep plan: {:.1}s of {:.1}s, checks at {:?}",
            self.sleep_target, allowance, self.check_times
        );
    }

    /// Inputs to send this frame, before the tick.
    pub fn inputs(
        &mut self,
        sm: &PhaseStateMachine,
        views: &[ViewUpdate],
        dt: f32,
    ) -> Vec<InputEvent> {
        let phase = sm.current_phase();
        if self.last_phase != Some(phase) {
            self.last_phase = Some(phase);
            self.tap_timer = 0.0;
            if phase == Phase::Sleep {
                self.plan_sleep(sm.config(), sm.round());
            }
        }

        match phase {
            Phase::Title | Phase::Prologue | Phase::Tutorial => vec![InputEvent::Tap],
            Phase::SetTimer => vec![InputEvent::Swipe(SwipeDirection::Right)],
            Phase::Sleep => self.sleep_inputs(sm.round()),
            Phase::Run => self.run_inputs(views, dt),
            Phase::Loading | Phase::GameClear | Phase::GameOver => Vec::new(),
        }
    }

    fn sleep_inputs(&mut self, round: &RoundData) -> Vec<InputEvent> {
        if self.woke {
            return Vec::new();
        }
        let clock = round.sleep_clock();
        if clock >= self.sleep_target {
            self.woke = true;
            return vec![
                InputEvent::Button(Button::CheckWatch),
                InputEvent::Button(Button::WakeUp),
            ];
        }
        if self.check_times.first().is_some_and(|t| clock >= *t) {
            self.check_times.remove(0);
            return vec![
                InputEvent::Button(Button::CheckWatch),
                InputEvent::Button(Button::BackToSleep),
            ];
        }
        Vec::new()
    }

    fn run_inputs(&mut self, views: &[ViewUpdate], dt: f32) -> Vec<InputEvent> {
        let mut events = Vec::new();
        if self.opts.dodge {
            for view in views {
                if let ViewUpdate::ObstacleWarning(lane) = view {
                    let away = match lane {
                        Lane::Left => SwipeDirection::Right,
                        Lane::Right => SwipeDirection::Left,
                    };
                    events.push(InputEvent::Swipe(away));
                }
            }
        }

        if self.opts.taps_per_second > 0.0 {
            let interval = 1.0 / self.opts.taps_per_second;
            self.tap_timer += dt;
            while self.tap_timer >= interval {
                self.tap_timer -= interval;
                events.push(InputEvent::Tap);
            }
        }
        events
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub seed: u64,
    pub final_phase: String,
    pub path: Vec<String>,
    pub elapsed: f32,
    pub summary: RoundSummary,
    pub submitted_scores: Vec<i64>,
}

/// Run one session from `start` until a result screen or `max_seconds`.
pub fn run_session(
    config: GameConfig,
    opts: PlanOptions,
    start: Phase,
    step: f32,
    max_seconds: f32,
) -> Result<SessionReport> {
    let recorder = Recorder::new();
    let scores = ScoreBoard::new();
    let io = Collaborators::new()
        .with_presentation(recorder.clone())
        .with_audio(LogAudio)
        .with_scores(scores.clone());

    let mut sm = PhaseStateMachine::standard(config, io).context("Failed to build state machine")?;
    let mut pilot = Autopilot::new(opts, sm.seed().wrapping_add(1));
    sm.start_at(start).with_context(|| format!("Failed to start at {}", start))?;

    let mut elapsed = 0.0;
    while elapsed < max_seconds && !sm.current_phase().is_result() {
        let views = recorder.views();
        recorder.drain();
        for event in pilot.inputs(&sm, &views, step) {
            sm.handle_input(event).with_context(|| format!("Input {:?} failed", event))?;
        }
        sm.tick(step).context("Tick failed")?;
        elapsed += step;
    }

    let final_phase = sm.current_phase();
    info!("Session ended in {} after {:.2}s", final_phase, elapsed);
    Ok(SessionReport {
        seed: sm.seed(),
        final_phase: final_phase.to_string(),
        path: sm.history().iter().map(|r| r.to.to_string()).collect(),
        elapsed,
        summary: sm.summary(),
        submitted_scores: scores.submitted().into_iter().map(|(_, value, _)| value).collect(),
    })
}
