use tracing::info;

use super::PhaseController;
use crate::collaborators::{AnimationCue, BgmTrack, ScoreMode, SoundCue, SoundEffect, ViewUpdate};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{Button, InputEvent};
use crate::phase::Phase;

/// Leaderboard the clear score is posted to.
pub const SCORE_BOARD: u32 = 1;

/// Result screen after reaching the station in time.
#[derive(Debug, Default)]
pub struct GameClearController {
    buttons_enabled: bool,
    leaving: bool,
}

impl GameClearController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buttons_enabled(&self) -> bool {
        self.buttons_enabled
    }

    fn enable_buttons(&mut self, ctx: &mut PhaseContext<'_>) {
        self.buttons_enabled = true;
        ctx.show(ViewUpdate::ResultButtons(true));
    }

    fn leave(&mut self, ctx: &mut PhaseContext<'_>, target: Phase) {
        self.leaving = true;
        ctx.play_sound(SoundCue::Se(SoundEffect::ButtonClick));
        ctx.request_transition(target);
    }
}

impl PhaseController for GameClearController {
    fn phase(&self) -> Phase {
        Phase::GameClear
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        *self = Self::default();
        let summary = ctx.round.summary(&ctx.config.scoring);
        info!(score = summary.score, rank = %summary.rank, "round cleared");

        ctx.io.submit_score(SCORE_BOARD, summary.score, ScoreMode::HighScoreDesc);
        ctx.play_sound(SoundCue::Bgm(BgmTrack::GameClear));
        ctx.show(ViewUpdate::Result(summary));
        ctx.show(ViewUpdate::ResultButtons(false));
        if !ctx.play_animation(AnimationCue::ResultEnter) {
            self.enable_buttons(ctx);
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut PhaseContext<'_>, _dt: f32) {}

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.buttons_enabled = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        if self.leaving {
            return;
        }
        match event {
            InputEvent::AnimationFinished(AnimationCue::ResultEnter) if !self.buttons_enabled => {
                self.enable_buttons(ctx)
            }
            InputEvent::Button(Button::Retry) if self.buttons_enabled => {
                self.leave(ctx, Phase::SetTimer)
            }
            InputEvent::Button(Button::BackToTitle) if self.buttons_enabled => {
                self.leave(ctx, Phase::Title)
            }
            _ => {}
        }
    }
}
