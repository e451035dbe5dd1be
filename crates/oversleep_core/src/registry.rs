//! Phase -> controller lookup

use std::collections::BTreeMap;

use crate::controller::{
    GameClearController, GameOverController, LoadingController, PhaseController,
    PrologueController, RunController, SetTimerController, SleepController, TitleController,
    TutorialController,
};
use crate::error::{GameError, Result};
use crate::phase::Phase;

/// One controller instance per phase, built once and reused for every visit.
#[derive(Default)]
pub struct PhaseRegistry {
    controllers: BTreeMap<Phase, Box<dyn PhaseController>>,
}

impl std::fmt::Debug for PhaseRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseRegistry")
            .field("phases", &self.controllers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl PhaseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All nine built-in controllers.
    pub fn standard() -> Self {
        let mut controllers: BTreeMap<Phase, Box<dyn PhaseController>> = BTreeMap::new();
        controllers.insert(Phase::Title, Box::new(TitleController::new()));
        controllers.insert(Phase::Loading, Box::new(LoadingController::new()));
        controllers.insert(Phase::Prologue, Box::new(PrologueController::new()));
        controllers.insert(Phase::Tutorial, Box::new(TutorialController::new()));
        controllers.insert(Phase::SetTimer, Box::new(SetTimerController::new()));
        controllers.insert(Phase::Sleep, Box::new(SleepController::new()));
        controllers.insert(Phase::Run, Box::new(RunController::new()));
        controllers.insert(Phase::GameClear, Box::new(GameClearController::new()));
        controllers.insert(Phase::GameOver, Box::new(GameOverController::new()));
        Self { controllers }
    }

    /// Add a controller under its own phase. A second one for the same phase is an error.
    pub fn register(&mut self, controller: Box<dyn PhaseController>) -> Result<()> {
        let phase = controller.phase();
        if self.controllers.contains_key(&phase) {
            return Err(GameError::DuplicateController(phase));
        }
        self.controllers.insert(phase, controller);
        Ok(())
    }

    /// Swap in a controller, returning the one it displaced.
    pub fn replace(&mut self, controller: Box<dyn PhaseController>) -> Option<Box<dyn PhaseController>> {
        self.controllers.insert(controller.phase(), controller)
    }

    pub fn with(mut self, controller: Box<dyn PhaseController>) -> Self {
        self.replace(controller);
        self
    }

    pub fn contains(&self, phase: Phase) -> bool {
        self.controllers.contains_key(&phase)
    }

    pub fn get_mut(&mut self, phase: Phase) -> Result<&mut (dyn PhaseController + 'static)> {
        self.controllers
            .get_mut(&phase)
            .map(|c| c.as_mut())
            .ok_or(GameError::MissingController(phase))
    }

    pub fn missing(&self) -> Vec<Phase> {
        Phase::ALL.iter().copied().filter(|p| !self.contains(*p)).collect()
    }

    pub fn validate_complete(&self) -> Result<()> {
        match self.missing().first() {
            Some(phase) => Err(GameError::MissingController(*phase)),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_is_complete() {
        let registry = PhaseRegistry::standard();
        assert_eq!(registry.len(), Phase::ALL.len());
        assert!(registry.validate_complete().is_ok());
        for phase in Phase::ALL {
            assert_eq!(registry.controllers[&phase].phase(), phase);
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = PhaseRegistry::new();
        registry.register(Box::new(TitleController::new())).unwrap();
        let err = registry.register(Box::new(TitleController::new())).unwrap_err();
        assert!(matches!(err, GameError::DuplicateController(Phase::Title)));
    }

    #[test]
    fn test_missing_phases_reported_in_order() {
        let mut registry = PhaseRegistry::standard();
        registry.controllers.remove(&Phase::Run);
        registry.controllers.remove(&Phase::Loading);

        assert_eq!(registry.missing(), vec![Phase::Loading, Phase::Run]);
        assert!(matches!(
            registry.validate_complete(),
            Err(GameError::MissingController(Phase::Loading))
        ));
        assert!(matches!(registry.get_mut(Phase::Run), Err(GameError::MissingController(Phase::Run))));
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut registry = PhaseRegistry::standard();
        let old = registry.replace(Box::new(RunController::new()));
        assert!(old.is_some());
        assert_eq!(registry.len(), Phase::ALL.len());
    }
}
