use tracing::debug;

use super::PhaseController;
use crate::collaborators::{BgmTrack, SoundCue, SoundEffect};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{Button, InputEvent};
use crate::phase::Phase;

/// Title screen; start button or a tap begins loading.
#[derive(Debug, Default)]
pub struct TitleController {
    started: bool,
}

impl TitleController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhaseController for TitleController {
    fn phase(&self) -> Phase {
        Phase::Title
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.started = false;
        ctx.play_sound(SoundCue::Bgm(BgmTrack::Title));
        Ok(())
    }

    fn update(&mut self, _ctx: &mut PhaseContext<'_>, _dt: f32) {}

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        if self.started {
            return;
        }
        if matches!(event, InputEvent::Tap | InputEvent::Button(Button::Start)) {
            debug!("title: start requested");
            self.started = true;
            ctx.play_sound(SoundCue::Se(SoundEffect::ButtonClick));
            ctx.request_transition(Phase::Loading);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::config::GameConfig;
    use crate::controller::harness::Harness;

    #[test]
    fn test_start_requests_loading_once() {
        let mut h = Harness::new(GameConfig::default());
        let mut title = TitleController::new();
        title.on_enter(&mut h.ctx()).unwrap();

        title.handle_input(&mut h.ctx(), InputEvent::Button(Button::Start));
        title.handle_input(&mut h.ctx(), InputEvent::Tap);

        assert_eq!(h.take_commands(), vec![Command::Transition(Phase::Loading)]);
    }

    #[test]
    fn test_swipe_is_ignored() {
        let mut h = Harness::new(GameConfig::default());
        let mut title = TitleController::new();
        title.on_enter(&mut h.ctx()).unwrap();
        title.handle_input(&mut h.ctx(), InputEvent::Swipe(crate::input::SwipeDirection::Left));
        assert!(h.take_commands().is_empty());
    }
}
