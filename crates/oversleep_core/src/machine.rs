//! Phase state machine
//!
//! Owns the round data, the config, the RNG, the collaborators and one
//! controller per phase. Phases only change through queued commands, which
//! are drained one full transition at a time after every external call
//! (`start`, `tick`, `handle_input`, `request_transition`).
//!
//! A transition runs: exit current -> switch phase -> entry effects -> enter
//! new. Entry effects apply to the round data as the outgoing controller
//! left it. A copy taken before the exit is restored if the transition
//! fails, so the machine ends up in the phase it started from.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};

use crate::collaborators::{Collaborators, SoundCue};
use crate::command::{Command, CommandQueue};
use crate::config::GameConfig;
use crate::context::PhaseContext;
use crate::error::{GameError, LifecycleStage, Result};
use crate::input::InputEvent;
use crate::phase::Phase;
use crate::registry::PhaseRegistry;
use crate::round::{RoundData, RoundOutcome, RoundSummary};
use crate::scoring::Rank;

/// One executed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRecord {
    pub from: Option<Phase>,
    pub to: Phase,
    /// Set when entry effects sent the transition somewhere else.
    pub redirected_from: Option<Phase>,
}

pub struct PhaseStateMachine {
    config: GameConfig,
    registry: PhaseRegistry,
    io: Collaborators,
    rng: ChaCha8Rng,
    round: RoundData,
    commands: CommandQueue,
    current: Phase,
    started: bool,
    paused: bool,
    seed: u64,
    history: Vec<TransitionRecord>,
}

impl std::fmt::Debug for PhaseStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseStateMachine")
            .field("current", &self.current)
            .field("started", &self.started)
            .field("paused", &self.paused)
            .field("seed", &self.seed)
            .field("round", &self.round)
            .finish()
    }
}

fn lifecycle_error(phase: Phase, stage: LifecycleStage, err: GameError) -> GameError {
    match err {
        GameError::ControllerFailed { .. } => err,
        other => GameError::ControllerFailed { phase, stage, reason: other.to_string() },
    }
}

impl PhaseStateMachine {
    /// Validate `config` and `registry`, then seed the round RNG.
    ///
    /// Nothing is entered until [`start`](Self::start).
    pub fn new(config: GameConfig, registry: PhaseRegistry, io: Collaborators) -> Result<Self> {
        config.validate()?;
        registry.validate_complete()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        debug!("Round RNG seed: {}", seed);

        Ok(Self {
            config,
            registry,
            io,
            rng: ChaCha8Rng::seed_from_u64(seed),
            round: RoundData::new(),
            commands: CommandQueue::new(),
            current: Phase::Title,
            started: false,
            paused: false,
            seed,
            history: Vec::new(),
        })
    }

    /// Machine with the nine built-in controllers.
    pub fn standard(config: GameConfig, io: Collaborators) -> Result<Self> {
        Self::new(config, PhaseRegistry::standard(), io)
    }

    /// Enter Title. Counts as the first transition.
    pub fn start(&mut self) -> Result<()> {
        self.start_at(Phase::Title)
    }

    /// Enter `phase` directly as the first transition, with its entry effects.
    pub fn start_at(&mut self, phase: Phase) -> Result<()> {
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        info!("Starting state machine at {}", phase);
        self.commands.push(Command::Transition(phase));
        self.drain()
    }

    /// Queue a transition and process the queue.
    pub fn request_transition(&mut self, target: Phase) -> Result<()> {
        if !self.started {
            return Err(GameError::NotStarted);
        }
        self.commands.push(Command::Transition(target));
        self.drain()
    }

    /// Advance the current phase by `dt` seconds. Does nothing before start
    /// or while paused; paused time is never caught up.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        if !self.started || self.paused {
            return Ok(());
        }
        let dt = if dt.is_finite() && dt > 0.0 {
            dt
        } else {
            if dt != 0.0 {
                warn!("Ignoring invalid tick delta {}", dt);
            }
            0.0
        };

        let Self { registry, round, config, rng, io, commands, current, .. } = self;
        let controller = registry.get_mut(*current)?;
        controller.update(&mut PhaseContext::new(round, config, rng, io, commands), dt);
        self.drain()
    }

    /// Deliver one input event to the current phase.
    ///
    /// Player input is dropped while paused. Animation completions are always
    /// delivered so a paused phase does not lose them.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        if !self.started {
            return Err(GameError::NotStarted);
        }
        if self.paused && event.is_player_input() {
            debug!("Dropping {:?} while paused", event);
            return Ok(());
        }

        let Self { registry, round, config, rng, io, commands, current, .. } = self;
        let controller = registry.get_mut(*current)?;
        controller.handle_input(&mut PhaseContext::new(round, config, rng, io, commands), event);
        self.drain()
    }

    pub fn pause_current(&mut self) -> Result<()> {
        if !self.started || self.paused {
            return Ok(());
        }
        self.paused = true;
        debug!("Pausing {}", self.current);
        let Self { registry, round, config, rng, io, commands, current, .. } = self;
        if let Ok(controller) = registry.get_mut(*current) {
            controller.pause(&mut PhaseContext::new(round, config, rng, io, commands));
        }
        self.io.play_sound(SoundCue::PauseBgm);
        self.drain()
    }

    pub fn resume_current(&mut self) -> Result<()> {
        if !self.started || !self.paused {
            return Ok(());
        }
        self.paused = false;
        debug!("Resuming {}", self.current);
        let Self { registry, round, config, rng, io, commands, current, .. } = self;
        if let Ok(controller) = registry.get_mut(*current) {
            controller.resume(&mut PhaseContext::new(round, config, rng, io, commands));
        }
        self.io.play_sound(SoundCue::ResumeBgm);
        self.drain()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn current_phase(&self) -> Phase {
        self.current
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn round(&self) -> &RoundData {
        &self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The seed the round RNG was built from, for replaying a session.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn score(&self) -> i64 {
        self.round.score(&self.config.scoring)
    }

    pub fn rank(&self) -> Rank {
        self.round.rank(&self.config.scoring)
    }

    pub fn summary(&self) -> RoundSummary {
        self.round.summary(&self.config.scoring)
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Execute queued commands in order until the queue is empty. The first
    /// failure aborts and drops whatever is still queued.
    fn drain(&mut self) -> Result<()> {
        while let Some(command) = self.commands.pop() {
            if let Err(err) = self.execute(command) {
                let dropped = self.commands.clear();
                if dropped > 0 {
                    warn!("Dropped {} queued command(s) after failed transition", dropped);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let outcome = match command {
            Command::Finish(outcome) => Some(outcome),
            Command::Transition(_) => None,
        };
        self.transition(command.target(), outcome)
    }

    /// Stage the round data for entering `target`. Entering Run on an empty
    /// clock redirects to GameOver.
    fn stage_entry(&mut self, target: Phase, outcome: Option<RoundOutcome>) -> (Phase, RoundData) {
        let mut staged = self.round.clone();
        if let Some(outcome) = outcome {
            staged.set_outcome(outcome);
        }

        match target {
            Phase::Sleep => {
                staged.begin(&self.config.sleep, &mut self.rng);
                debug!("New round, allowance {:.2}s", staged.total_time_limit());
                (target, staged)
            }
            Phase::Run => {
                let slept = staged.fix_sleep_duration();
                if staged.is_out_of_time() {
                    warn!("Overslept after {:.2}s, redirecting Run to GameOver", slept);
                    staged.set_outcome(RoundOutcome::Overslept);
                    (Phase::GameOver, staged)
                } else {
                    (target, staged)
                }
            }
            _ => (target, staged),
        }
    }

    fn transition(&mut self, requested: Phase, outcome: Option<RoundOutcome>) -> Result<()> {
        let from = if self.started { Some(self.current) } else { None };

        // A Run request may land on GameOver; both must exist before anything exits.
        let redirect = (requested == Phase::Run).then_some(Phase::GameOver);
        for phase in std::iter::once(requested).chain(redirect) {
            if !self.registry.contains(phase) {
                return Err(GameError::MissingController(phase));
            }
        }

        // Restored if the transition aborts.
        let rng_snapshot = self.rng.clone();
        let previous_round = self.round.clone();

        if let Some(from) = from {
            let Self { registry, round, config, rng, io, commands, .. } = self;
            let controller = registry.get_mut(from)?;
            if let Err(err) = controller.on_exit(&mut PhaseContext::new(round, config, rng, io, commands)) {
                error!("{} failed to exit: {}", from, err);
                self.rng = rng_snapshot;
                self.round = previous_round;
                return Err(lifecycle_error(from, LifecycleStage::Exit, err));
            }
            self.io.set_visible(from, false);
        }

        // Entry effects see whatever the outgoing phase left in the round.
        let (target, staged) = self.stage_entry(requested, outcome);
        self.round = staged;
        let was_paused = self.paused;
        self.current = target;
        self.started = true;
        self.paused = false;
        self.io.set_visible(target, true);

        let entered = {
            let Self { registry, round, config, rng, io, commands, .. } = self;
            registry
                .get_mut(target)
                .and_then(|c| c.on_enter(&mut PhaseContext::new(round, config, rng, io, commands)))
        };

        if let Err(err) = entered {
            error!("{} failed to enter: {}", target, err);
            self.io.set_visible(target, false);
            self.round = previous_round;
            self.paused = was_paused;
            self.rollback(from);
            return Err(lifecycle_error(target, LifecycleStage::Enter, err));
        }

        let redirected_from = (target != requested).then_some(requested);
        match from {
            Some(from) => info!("Phase transition: {} -> {}", from, target),
            None => info!("Entered {}", target),
        }
        self.history.push(TransitionRecord { from, to: target, redirected_from });
        Ok(())
    }

    /// Put the machine back in `from` after a failed enter.
    fn rollback(&mut self, from: Option<Phase>) {
        let Some(from) = from else {
            self.started = false;
            self.current = Phase::Title;
            return;
        };
        self.current = from;
        self.io.set_visible(from, true);

        let Self { registry, round, config, rng, io, commands, .. } = self;
        let reentered = registry
            .get_mut(from)
            .and_then(|c| c.on_enter(&mut PhaseContext::new(round, config, rng, io, commands)));
        match reentered {
            Ok(()) => warn!("Transition aborted, back in {}", from),
            Err(err) => error!("Could not re-enter {} after aborted transition: {}", from, err),
        }
    }
}
