//! Phase controllers
//!
//! One small struct per phase, each implementing [`PhaseController`].
//! A controller owns only its local presentation state. Everything shared
//! goes through the [`PhaseContext`]: round data, config and transition
//! requests.
//!
//! Controllers are built once and entered many times. `on_enter` must start
//! from a clean slate. `on_exit` must drop every pending timer.

mod game_clear;
mod game_over;
mod loading;
mod prologue;
mod run;
mod set_timer;
mod sleep;
mod title;
mod tutorial;

pub use game_clear::{GameClearController, SCORE_BOARD};
pub use game_over::GameOverController;
pub use loading::LoadingController;
pub use prologue::PrologueController;
pub use run::RunController;
pub use set_timer::{SetTimerController, SetTimerStage};
pub use sleep::{urgency_for, SleepController, SleepState};
pub use title::TitleController;
pub use tutorial::TutorialController;

use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::InputEvent;
use crate::phase::Phase;

pub trait PhaseController {
    fn phase(&self) -> Phase;

    /// Called once each time the machine switches to this phase.
    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()>;

    /// Called once per non-paused tick while this phase is current.
    fn update(&mut self, ctx: &mut PhaseContext<'_>, dt: f32);

    /// Called once before the machine switches away.
    fn on_exit(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()>;

    fn handle_input(&mut self, _ctx: &mut PhaseContext<'_>, _event: InputEvent) {}

    fn pause(&mut self, _ctx: &mut PhaseContext<'_>) {}

    fn resume(&mut self, _ctx: &mut PhaseContext<'_>) {}
}
