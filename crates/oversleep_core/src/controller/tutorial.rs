use super::PhaseController;
use crate::collaborators::{SoundCue, SoundEffect, ViewUpdate};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{Button, InputEvent};
use crate::phase::Phase;

#[derive(Debug, Default)]
pub struct TutorialController {
    page: usize,
    done: bool,
}

impl TutorialController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> usize {
        self.page
    }
}

impl PhaseController for TutorialController {
    fn phase(&self) -> Phase {
        Phase::Tutorial
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        *self = Self::default();
        if ctx.config.presentation.tutorial_pages == 0 {
            self.done = true;
            ctx.request_transition(Phase::SetTimer);
        } else {
            ctx.show(ViewUpdate::TutorialPage(0));
        }
        Ok(())
    }

    fn update(&mut self, _ctx: &mut PhaseContext<'_>, _dt: f32) {}

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.done = true;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        if self.done || !matches!(event, InputEvent::Tap | InputEvent::Button(Button::Start)) {
            return;
        }
        ctx.play_sound(SoundCue::Se(SoundEffect::ButtonClick));
        self.page += 1;
        if self.page >= ctx.config.presentation.tutorial_pages {
            self.done = true;
            ctx.request_transition(Phase::SetTimer);
        } else {
            ctx.show(ViewUpdate::TutorialPage(self.page));
        }
    }
}
