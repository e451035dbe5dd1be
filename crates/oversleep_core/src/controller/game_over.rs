use tracing::info;

use super::PhaseController;
use crate::collaborators::{BgmTrack, SoundCue, SoundEffect, ViewUpdate};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{Button, InputEvent};
use crate::phase::Phase;

/// Missed the train. Retry skips straight back to a fresh sleep.
#[derive(Debug, Default)]
pub struct GameOverController {
    leaving: bool,
}

impl GameOverController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhaseController for GameOverController {
    fn phase(&self) -> Phase {
        Phase::GameOver
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.leaving = false;
        let summary = ctx.round.summary(&ctx.config.scoring);
        info!(outcome = ?summary.outcome, "game over");
        ctx.play_sound(SoundCue::Bgm(BgmTrack::GameOver));
        ctx.show(ViewUpdate::Result(summary));
        ctx.show(ViewUpdate::ResultButtons(true));
        Ok(())
    }

    fn update(&mut self, _ctx: &mut PhaseContext<'_>, _dt: f32) {}

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        if self.leaving {
            return;
        }
        let target = match event {
            InputEvent::Button(Button::Retry) => Phase::Sleep,
            InputEvent::Button(Button::BackToTitle) => Phase::Title,
            _ => return,
        };
        self.leaving = true;
        ctx.play_sound(SoundCue::Se(SoundEffect::ButtonClick));
        ctx.request_transition(target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::config::GameConfig;
    use crate::controller::harness::Harness;
    use crate::round::RoundOutcome;

    #[test]
    fn test_retry_goes_back_to_sleep() {
        let mut h = Harness::new(GameConfig::default());
        h.round.set_outcome(RoundOutcome::Overslept);
        let mut over = GameOverController::new();
        over.on_enter(&mut h.ctx()).unwrap();

        over.handle_input(&mut h.ctx(), InputEvent::Tap);
        over.handle_input(&mut h.ctx(), InputEvent::Button(Button::Retry));
        over.handle_input(&mut h.ctx(), InputEvent::Button(Button::BackToTitle));
        assert_eq!(h.take_commands(), vec![Command::Transition(Phase::Sleep)]);
        assert!(h.recorder.scores().is_empty());
    }

    #[test]
    fn test_shows_zero_score_summary() {
        let mut h = Harness::new(GameConfig::default());
        h.round.set_outcome(RoundOutcome::Collided);
        let mut over = GameOverController::new();
        over.on_enter(&mut h.ctx()).unwrap();
        let summary = h.recorder.views().into_iter().find_map(|v| match v {
            ViewUpdate::Result(s) => Some(s),
            _ => None,
        });
        assert_eq!(summary.map(|s| s.score), Some(0));
    }
}
