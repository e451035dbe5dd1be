//! Console collaborators: sounds go to the log, scores to stdout.

use std::cell::RefCell;
use std::rc::Rc;

use oversleep_core::{AudioSink, ScoreMode, ScoreSink, SoundCue};
use tracing::debug;

#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue) {
        debug!("sound: {:?}", cue);
    }
}

/// Keeps submitted scores so the driver can report them.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    submitted: Rc<RefCell<Vec<(u32, i64, ScoreMode)>>>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<(u32, i64, ScoreMode)> {
        self.submitted.borrow().clone()
    }
}

impl ScoreSink for ScoreBoard {
    fn submit(&mut self, category: u32, value: i64, mode: ScoreMode) {
        debug!("score submitted: board {} value {} ({:?})", category, value, mode);
        self.submitted.borrow_mut().push((category, value, mode));
    }
}
