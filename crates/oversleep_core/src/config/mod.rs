//! # Game Configuration
//!
//! Every tuning value lives here and is loaded once, before the state
//! machine starts. After that the config is read-only.
//!
//! ## Presets
//! - `GameConfig::default()` - short rounds measured in real seconds
//! - `GameConfig::dream_clock()` - a 30 minute in-game clock that drains 3-10x while dreaming
//!
//! ```rust
//! use oversleep_core::config::GameConfig;
//!
//! let quick = GameConfig::default();
//! let dream = GameConfig::dream_clock();
//! assert!(dream.sleep.fixed_time_limit.is_some());
//! assert!(quick.validate().is_ok());
//! ```

mod presentation_config;
mod run_config;
mod scoring_config;
mod sleep_config;

pub use presentation_config::PresentationConfig;
pub use run_config::RunConfig;
pub use scoring_config::{RankThresholds, ScoringConfig};
pub use sleep_config::SleepConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{GameError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub sleep: SleepConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
    /// RNG seed; `None` seeds from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn quick() -> Self {
        Self::default()
    }

    /// Late-design tuning: fixed 30 minute allowance on a fast dream clock,
    /// scored on remaining time with a penalty per watch check.
    pub fn dream_clock() -> Self {
        let mut cfg = Self::default();
        cfg.sleep.fixed_time_limit = Some(1800.0);
        cfg.sleep.min_time = 1800.0;
        cfg.sleep.max_time = 1800.0;
        cfg.sleep.time_scale_range = (3.0, 10.0);
        cfg.scoring = ScoringConfig {
            base_bonus: 1000.0,
            sleep_weight: 0.0,
            remaining_weight: 2.0,
            check_penalty: 300.0,
            ranks: RankThresholds { s: 3000, a: 2500, b: 2000 },
        };
        cfg
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.sleep.validate()?;
        self.run.validate()?;
        self.scoring.validate()?;
        self.presentation.validate()?;
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: GameConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: GameConfig = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text),
            Some("json") => Self::from_json_str(&text),
            other => Err(GameError::invalid_config(
                "path",
                format!("unsupported config extension {:?}", other),
            )),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

// ========== Tests ==========
