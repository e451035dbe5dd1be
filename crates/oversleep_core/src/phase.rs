//! Phase identifiers
//!
//! The round flows Title → Loading → Prologue → Tutorial → SetTimer → Sleep → Run
//! and ends in either GameClear or GameOver. Both result phases lead back to
//! Title or to a fresh round, so the machine never terminates on its own.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Phase {
    #[default]
    Title,
    Loading,
    Prologue,
    Tutorial,
    SetTimer,
    Sleep,
    Run,
    GameClear,
    GameOver,
}

impl Phase {
    pub const ALL: [Phase; 9] = [
        Phase::Title,
        Phase::Loading,
        Phase::Prologue,
        Phase::Tutorial,
        Phase::SetTimer,
        Phase::Sleep,
        Phase::Run,
        Phase::GameClear,
        Phase::GameOver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Phase::Title => "Title",
            Phase::Loading => "Loading",
            Phase::Prologue => "Prologue",
            Phase::Tutorial => "Tutorial",
            Phase::SetTimer => "SetTimer",
            Phase::Sleep => "Sleep",
            Phase::Run => "Run",
            Phase::GameClear => "GameClear",
            Phase::GameOver => "GameOver",
        }
    }

    /// Result screens only read round data.
    pub fn is_result(&self) -> bool {
        matches!(self, Phase::GameClear | Phase::GameOver)
    }

    /// Phases during which the round clock drains.
    pub fn is_timed(&self) -> bool {
        matches!(self, Phase::Sleep | Phase::Run)
    }

    pub fn from_name(name: &str) -> Option<Phase> {
        Phase::ALL.iter().copied().find(|p| p.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_flags() {
        assert!(Phase::GameClear.is_result());
        assert!(Phase::GameOver.is_result());
        assert!(!Phase::Run.is_result());

        assert!(Phase::Sleep.is_timed());
        assert!(Phase::Run.is_timed());
        assert!(!Phase::SetTimer.is_timed());
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Phase::from_name("sleep"), Some(Phase::Sleep));
        assert_eq!(Phase::from_name("GAMEOVER"), Some(Phase::GameOver));
        assert_eq!(Phase::from_name("pause"), None);
    }

    #[test]
    fn test_all_phases_unique() {
        let mut names: Vec<_> = Phase::ALL.iter().map(|p| p.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 9);
    }
}
