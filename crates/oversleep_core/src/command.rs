//! Commands controllers hand to the state machine
//!
//! Controllers never switch phases themselves. They push a command, and the
//! machine drains the queue after the current call returns, one transition
//! at a time.

use std::collections::VecDeque;

use crate::phase::Phase;
use crate::round::RoundOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Transition(Phase),
    /// Record the outcome, then move to GameClear or GameOver.
    Finish(RoundOutcome),
}

impl Command {
    pub fn target(&self) -> Phase {
        match self {
            Command::Transition(phase) => *phase,
            Command::Finish(outcome) if outcome.is_failure() => Phase::GameOver,
            Command::Finish(_) => Phase::GameClear,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop everything still queued; returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let n = self.queue.len();
        self.queue.clear();
        n
    }
}
