//! Out-of-core collaborators
//!
//! Presentation, audio and score submission are reached through narrow
//! traits. Every call goes through [`Collaborators`], which turns a missing
//! collaborator into a no-op instead of an error.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::obstacle::{Lane, PlayerLane};
use crate::phase::Phase;
use crate::round::RoundSummary;

/// Animations whose completion the core may wait on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationCue {
    SlideSetEnter,
    SlideSetExit,
    GoSleepTextReveal,
    AlarmRingEnter,
    AlarmRingExit,
    CheckWatchEnter,
    CheckWatchExit,
    WakeUpEnter,
    ResultEnter,
}

/// Sleep-phase clock pop-up level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Calm,
    Hurry,
    Panic,
}

/// Display updates pushed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewUpdate {
    LoadingFrame(usize),
    PrologueText(String),
    TutorialPage(usize),
    AlarmClock { minutes: u32 },
    WatchFace { minutes: u32, urgency: Urgency },
    SleepButtons { check: bool, wake_up: bool, back_to_sleep: bool },
    RunTimer(f32),
    RunProgress(f32),
    PlayerLane(PlayerLane),
    ObstacleWarning(Lane),
    ObstacleShown { lane: Lane, slot: u8 },
    ObstacleHidden,
    InputLocked(bool),
    ResultButtons(bool),
    Result(RoundSummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BgmTrack {
    Title,
    Prologue,
    Sleep,
    Run,
    GameClear,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    ButtonClick,
    CheckWatch,
    Alarm,
    WakeUp,
    Footstep,
    ObstacleWarning,
    Collision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Bgm(BgmTrack),
    Se(SoundEffect),
    StopBgm,
    PauseBgm,
    ResumeBgm,
}

/// Leaderboard write mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreMode {
    HighScoreDesc,
    HighScoreAsc,
    Always,
}

pub trait PresentationSink {
    fn set_visible(&mut self, phase: Phase, visible: bool);

    /// Start an animation. Return `true` when completion will be reported
    /// later as `InputEvent::AnimationFinished(cue)`; `false` means the
    /// caller should treat it as finished right away.
    fn play_animation(&mut self, _cue: AnimationCue) -> bool {
        false
    }

    fn show(&mut self, _update: ViewUpdate) {}
}

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);
}

pub trait ScoreSink {
    fn submit(&mut self, category: u32, value: i64, mode: ScoreMode);
}

/// The set of optional collaborators handed to controllers.
#[derive(Default)]
pub struct Collaborators {
    presentation: Option<Box<dyn PresentationSink>>,
    audio: Option<Box<dyn AudioSink>>,
    scores: Option<Box<dyn ScoreSink>>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("presentation", &self.presentation.is_some())
            .field("audio", &self.audio.is_some())
            .field("scores", &self.scores.is_some())
            .finish()
    }
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_presentation(mut self, sink: impl PresentationSink + 'static) -> Self {
        self.presentation = Some(Box::new(sink));
        self
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Some(Box::new(sink));
        self
    }

    pub fn with_scores(mut self, sink: impl ScoreSink + 'static) -> Self {
        self.scores = Some(Box::new(sink));
        self
    }

    pub fn set_visible(&mut self, phase: Phase, visible: bool) {
        if let Some(sink) = self.presentation.as_mut() {
            sink.set_visible(phase, visible);
        }
    }

    /// Returns `true` only if a presentation sink will report completion.
    pub fn play_animation(&mut self, cue: AnimationCue) -> bool {
        match self.presentation.as_mut() {
            Some(sink) => sink.play_animation(cue),
            None => false,
        }
    }

    pub fn show(&mut self, update: ViewUpdate) {
        if let Some(sink) = self.presentation.as_mut() {
            sink.show(update);
        }
    }

    pub fn play_sound(&mut self, cue: SoundCue) {
        if let Some(sink) = self.audio.as_mut() {
            sink.play(cue);
        }
    }

    pub fn submit_score(&mut self, category: u32, value: i64, mode: ScoreMode) {
        if let Some(sink) = self.scores.as_mut() {
            sink.submit(category, value, mode);
        }
    }
}

// ========================
// Recording collaborator
// ========================

/// Everything a [`Recorder`] saw, in call order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Recorded {
    Visible(Phase, bool),
    Animation(AnimationCue),
    View(ViewUpdate),
    Sound(SoundCue),
    Score { category: u32, value: i64, mode: ScoreMode },
}

/// Collaborator that logs every call into a shared buffer.
///
/// Clones share the same log, so one clone can be boxed into
/// [`Collaborators`] while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    log: Rc<RefCell<Vec<Recorded>>>,
    async_animations: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `play_animation` promise a completion callback.
    pub fn with_async_animations(mut self) -> Self {
        self.async_animations = true;
        self
    }

    pub fn entries(&self) -> Vec<Recorded> {
        self.log.borrow().clone()
    }

    pub fn drain(&self) -> Vec<Recorded> {
        self.log.borrow_mut().drain(..).collect()
    }

    pub fn sounds(&self) -> Vec<SoundCue> {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| match r {
                Recorded::Sound(cue) => Some(*cue),
                _ => None,
            })
            .collect()
    }

    pub fn views(&self) -> Vec<ViewUpdate> {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| match r {
                Recorded::View(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn scores(&self) -> Vec<(u32, i64, ScoreMode)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|r| match r {
                Recorded::Score { category, value, mode } => Some((*category, *value, *mode)),
                _ => None,
            })
            .collect()
    }

    /// Bundle clones of this recorder as every collaborator.
    pub fn collaborators(&self) -> Collaborators {
        Collaborators::new()
            .with_presentation(self.clone())
            .with_audio(self.clone())
            .with_scores(self.clone())
    }

    fn push(&self, entry: Recorded) {
        self.log.borrow_mut().push(entry);
    }
}

impl PresentationSink for Recorder {
    fn set_visible(&mut self, phase: Phase, visible: bool) {
        self.push(Recorded::Visible(phase, visible));
    }

    fn play_animation(&mut self, cue: AnimationCue) -> bool {
        self.push(Recorded::Animation(cue));
        self.async_animations
    }

    fn show(&mut self, update: ViewUpdate) {
        self.push(Recorded::View(update));
    }
}

impl AudioSink for Recorder {
    fn play(&mut self, cue: SoundCue) {
        self.push(Recorded::Sound(cue));
    }
}

impl ScoreSink for Recorder {
    fn submit(&mut self, category: u32, value: i64, mode: ScoreMode) {
        self.push(Recorded::Score { category, value, mode });
    }
}
