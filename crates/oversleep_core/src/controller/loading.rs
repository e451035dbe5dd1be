use tracing::debug;

use super::PhaseController;
use crate::collaborators::ViewUpdate;
use crate::context::PhaseContext;
use crate::error::Result;
use crate::phase::Phase;

/// Loading screen: cycles frames, then moves on to the prologue.
#[derive(Debug, Default)]
pub struct LoadingController {
    elapsed: f32,
    frame_timer: f32,
    frame: usize,
    done: bool,
}

impl LoadingController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> usize {
        self.frame
    }
}

impl PhaseController for LoadingController {
    fn phase(&self) -> Phase {
        Phase::Loading
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        *self = Self::default();
        ctx.show(ViewUpdate::LoadingFrame(0));
        Ok(())
    }

    fn update(&mut self, ctx: &mut PhaseContext<'_>, dt: f32) {
        if self.done {
            return;
        }
        let cfg = &ctx.config.presentation;
        let interval = cfg.loading_frame_interval;
        let frame_count = cfg.loading_frame_count;
        let duration = cfg.loading_duration;

        self.elapsed += dt;
        self.frame_timer += dt;
        if self.frame_timer >= interval {
            self.frame_timer = 0.0;
            if frame_count > 0 {
                self.frame = (self.frame + 1) % frame_count;
                ctx.show(ViewUpdate::LoadingFrame(self.frame));
            }
        }

        if self.elapsed >= duration {
            debug!(elapsed = self.elapsed, "loading complete");
            self.done = true;
            ctx.request_transition(Phase::Prologue);
        }
    }

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.done = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::config::GameConfig;
    use crate::controller::harness::Harness;

    #[test]
    fn test_frames_cycle_and_loading_completes() {
        let mut cfg = GameConfig::default();
        cfg.presentation.loading_duration = 1.5;
        cfg.presentation.loading_frame_interval = 0.5;
        cfg.presentation.loading_frame_count = 2;
        let mut h = Harness::new(cfg);
        let mut loading = LoadingController::new();
        loading.on_enter(&mut h.ctx()).unwrap();

        loading.update(&mut h.ctx(), 0.5);
        assert_eq!(loading.frame(), 1);
        loading.update(&mut h.ctx(), 0.5);
        assert_eq!(loading.frame(), 0);
        assert!(h.take_commands().is_empty());

        loading.update(&mut h.ctx(), 0.5);
        assert_eq!(h.take_commands(), vec![Command::Transition(Phase::Prologue)]);

        loading.update(&mut h.ctx(), 0.5);
        assert!(h.take_commands().is_empty());
    }

    #[test]
    fn test_reenter_starts_clean() {
        let mut h = Harness::new(GameConfig::default());
        let mut loading = LoadingController::new();
        loading.on_enter(&mut h.ctx()).unwrap();
        loading.update(&mut h.ctx(), 10.0);
        loading.on_exit(&mut h.ctx()).unwrap();
        h.take_commands();

        loading.on_enter(&mut h.ctx()).unwrap();
        assert_eq!(loading.frame(), 0);
        loading.update(&mut h.ctx(), 0.1);
        assert!(h.take_commands().is_empty());
    }
}
