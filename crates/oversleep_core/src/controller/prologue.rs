use tracing::debug;

use super::PhaseController;
use crate::collaborators::{BgmTrack, SoundCue, SoundEffect, ViewUpdate};
use crate::context::PhaseContext;
use crate::error::Result;
use crate::input::{Button, InputEvent};
use crate::phase::Phase;

/// Typewriter prologue. A tap completes the line being typed, the next tap
/// moves on to the following line.
#[derive(Debug, Default)]
pub struct PrologueController {
    line: usize,
    shown_chars: usize,
    char_timer: f32,
    done: bool,
}

impl PrologueController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_index(&self) -> usize {
        self.line
    }

    pub fn is_typing(&self, ctx: &PhaseContext<'_>) -> bool {
        self.current_len(ctx).is_some_and(|len| self.shown_chars < len)
    }

    fn current_len(&self, ctx: &PhaseContext<'_>) -> Option<usize> {
        ctx.config.presentation.prologue_lines.get(self.line).map(|l| l.chars().count())
    }

    fn show_text(&self, ctx: &mut PhaseContext<'_>) {
        let text: String = ctx
            .config
            .presentation
            .prologue_lines
            .get(self.line)
            .map(|l| l.chars().take(self.shown_chars).collect())
            .unwrap_or_default();
        ctx.show(ViewUpdate::PrologueText(text));
    }

    fn advance_line(&mut self, ctx: &mut PhaseContext<'_>) {
        self.line += 1;
        self.shown_chars = 0;
        self.char_timer = 0.0;
        if self.line >= ctx.config.presentation.prologue_lines.len() {
            debug!("prologue finished");
            self.done = true;
            ctx.request_transition(Phase::Tutorial);
        } else {
            self.show_text(ctx);
        }
    }
}

impl PhaseController for PrologueController {
    fn phase(&self) -> Phase {
        Phase::Prologue
    }

    fn on_enter(&mut self, ctx: &mut PhaseContext<'_>) -> Result<()> {
        *self = Self::default();
        ctx.play_sound(SoundCue::Bgm(BgmTrack::Prologue));
        if ctx.config.presentation.prologue_lines.is_empty() {
            self.done = true;
            ctx.request_transition(Phase::Tutorial);
        } else {
            self.show_text(ctx);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut PhaseContext<'_>, dt: f32) {
        if self.done {
            return;
        }
        let Some(len) = self.current_len(ctx) else {
            return;
        };
        if self.shown_chars >= len {
            return;
        }

        let interval = ctx.config.presentation.prologue_char_interval;
        self.char_timer += dt;
        let before = self.shown_chars;
        if interval <= 0.0 {
            self.shown_chars = len;
        } else {
            while self.char_timer >= interval && self.shown_chars < len {
                self.char_timer -= interval;
                self.shown_chars += 1;
            }
        }
        if self.shown_chars != before {
            self.show_text(ctx);
        }
    }

    fn on_exit(&mut self, _ctx: &mut PhaseContext<'_>) -> Result<()> {
        self.done = true;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut PhaseContext<'_>, event: InputEvent) {
        if self.done || !matches!(event, InputEvent::Tap | InputEvent::Button(Button::Start)) {
            return;
        }
        ctx.play_sound(SoundCue::Se(SoundEffect::ButtonClick));
        match self.current_len(ctx) {
            Some(len) if self.shown_chars < len => {
                self.shown_chars = len;
                self.char_timer = 0.0;
                self.show_text(ctx);
            }
            _ => self.advance_line(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::config::GameConfig;
    use crate::controller::harness::Harness;

    fn config(lines: &[&str]) -> GameConfig {
        let mut cfg = GameConfig::default();
        cfg.presentation.prologue_lines = lines.iter().map(|s| s.to_string()).collect();
        cfg.presentation.prologue_char_interval = 0.05;
        cfg
    }

    fn last_text(h: &Harness) -> Option<String> {
        h.recorder.views().into_iter().rev().find_map(|v| match v {
            ViewUpdate::PrologueText(t) => Some(t),
            _ => None,
        })
    }

    #[test]
    fn test_typewriter_reveals_one_char_per_interval() {
        let mut h = Harness::new(config(&["abcd"]));
        let mut prologue = PrologueController::new();
        prologue.on_enter(&mut h.ctx()).unwrap();
        assert_eq!(last_text(&h).as_deref(), Some(""));

        prologue.update(&mut h.ctx(), 0.11);
        assert_eq!(last_text(&h).as_deref(), Some("ab"));
        prologue.update(&mut h.ctx(), 1.0);
        assert_eq!(last_text(&h).as_deref(), Some("abcd"));
        assert!(h.take_commands().is_empty());
    }

    #[test]
    fn test_tap_completes_line_then_advances() {
        let mut h = Harness::new(config(&["hello", "world"]));
        let mut prologue = PrologueController::new();
        prologue.on_enter(&mut h.ctx()).unwrap();

        prologue.handle_input(&mut h.ctx(), InputEvent::Tap);
        assert_eq!(last_text(&h).as_deref(), Some("hello"));
        assert_eq!(prologue.line_index(), 0);

        prologue.handle_input(&mut h.ctx(), InputEvent::Tap);
        assert_eq!(prologue.line_index(), 1);
        assert_eq!(last_text(&h).as_deref(), Some(""));

        prologue.handle_input(&mut h.ctx(), InputEvent::Tap);
        prologue.handle_input(&mut h.ctx(), InputEvent::Tap);
        assert_eq!(h.take_commands(), vec![Command::Transition(Phase::Tutorial)]);

        prologue.handle_input(&mut h.ctx(), InputEvent::Tap);
        assert!(h.take_commands().is_empty());
    }

    #[test]
    fn test_empty_prologue_skips_to_tutorial() {
        let mut h = Harness::new(config(&[]));
        let mut prologue = PrologueController::new();
        prologue.on_enter(&mut h.ctx()).unwrap();
        assert_eq!(h.take_commands(), vec![Command::Transition(Phase::Tutorial)]);
    }
}
