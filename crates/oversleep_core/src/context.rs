//! Per-call context handed to phase controllers

use rand_chacha::ChaCha8Rng;

use crate::collaborators::{AnimationCue, Collaborators, SoundCue, ViewUpdate};
use crate::command::{Command, CommandQueue};
use crate::config::GameConfig;
use crate::phase::Phase;
use crate::round::{RoundData, RoundOutcome};

/// Shared state a controller may touch during one lifecycle call.
///
/// This is the only cross-phase channel: round data, the read-only config,
/// the round RNG, the collaborators and the command queue.
pub struct PhaseContext<'a> {
    pub round: &'a mut RoundData,
    pub config: &'a GameConfig,
    pub rng: &'a mut ChaCha8Rng,
    pub io: &'a mut Collaborators,
    commands: &'a mut CommandQueue,
}

impl<'a> PhaseContext<'a> {
    pub fn new(
        round: &'a mut RoundData,
        config: &'a GameConfig,
        rng: &'a mut ChaCha8Rng,
        io: &'a mut Collaborators,
        commands: &'a mut CommandQueue,
    ) -> Self {
        Self { round, config, rng, io, commands }
    }

    pub fn request_transition(&mut self, target: Phase) {
        self.commands.push(Command::Transition(target));
    }

    pub fn finish(&mut self, outcome: RoundOutcome) {
        self.commands.push(Command::Finish(outcome));
    }

    pub fn show(&mut self, update: ViewUpdate) {
        self.io.show(update);
    }

    pub fn play_sound(&mut self, cue: SoundCue) {
        self.io.play_sound(cue);
    }

    /// `true` when the caller must wait for `InputEvent::AnimationFinished(cue)`.
    pub fn play_animation(&mut self, cue: AnimationCue) -> bool {
        self.io.play_animation(cue)
    }
}
