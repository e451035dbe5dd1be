use thiserror::Error;

use crate::phase::Phase;

/// Which half of a controller lifecycle raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Enter,
    Exit,
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleStage::Enter => write!(f, "enter"),
            LifecycleStage::Exit => write!(f, "exit"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("No controller registered for phase {0}")]
    MissingController(Phase),

    #[error("Controller for phase {0} registered twice")]
    DuplicateController(Phase),

    #[error("Invalid config `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("Controller for {phase} failed on {stage}: {reason}")]
    ControllerFailed { phase: Phase, stage: LifecycleStage, reason: String },

    #[error("State machine has not been started")]
    NotStarted,

    #[error("State machine already started")]
    AlreadyStarted,

    #[error("Config IO error: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Config JSON error: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Config YAML error: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),
}

impl GameError {
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        GameError::InvalidConfig { field, reason: reason.into() }
    }

    /// Configuration problems cannot be fixed by retrying the same call.
    pub fn is_fatal(&self) -> bool {
        match self {
            GameError::MissingController(_) => true,
            GameError::DuplicateController(_) => true,
            GameError::InvalidConfig { .. } => true,
            GameError::ControllerFailed { .. } => true,
            GameError::ConfigJson(_) | GameError::ConfigYaml(_) => true,
            GameError::ConfigIo(_) => false,
            GameError::NotStarted | GameError::AlreadyStarted => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::MissingController(Phase::Run);
        assert_eq!(err.to_string(), "No controller registered for phase Run");

        let err = GameError::invalid_config("sleep.min_time", "greater than max_time");
        assert_eq!(err.to_string(), "Invalid config `sleep.min_time`: greater than max_time");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(GameError::MissingController(Phase::Title).is_fatal());
        assert!(GameError::ControllerFailed {
            phase: Phase::Sleep,
            stage: LifecycleStage::Enter,
            reason: "boom".into(),
        }
        .is_fatal());
        assert!(!GameError::NotStarted.is_fatal());
        assert!(!GameError::ConfigIo(std::io::Error::other("gone")).is_fatal());
    }
}
