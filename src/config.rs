//! JSON configuration of locale, matching stages and alignment limits.
//!
//! Every field is optional; missing fields take the defaults of the
//! `meteor-align` binary (German, identity 1.0, stemming 0.6).
//!
//! ```json
//! {
//!   "locale": "english",
//!   "stages": [
//!     { "kind": "identity", "weight": 1.0 },
//!     { "kind": "stemming", "weight": 0.5 }
//!   ],
//!   "alignment": { "max_candidates": 200, "fallback": "reject" }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Locale;
use crate::matching::engine::{AlignmentConfig, AlignmentEngine};
use crate::matching::meteor::Scorer;
use crate::matching::stages::{
    IdentityStage, Stage, StemmingStage, DEFAULT_IDENTITY_WEIGHT, DEFAULT_STEMMING_WEIGHT,
};
use crate::utils::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

/// One matching stage as written in a config file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageConfig {
    Identity { weight: f64 },
    Stemming { weight: f64 },
}

impl StageConfig {
    /// Instantiate the stage for `locale`
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidWeight` for weights outside (0, 1]
    /// and `ValidationError::ResourcesNotInitialized` for a stemming stage
    /// built before the linguistic resources.
    pub fn build(self, locale: Locale) -> Result<Box<dyn Stage>, ValidationError> {
        Ok(match self {
            StageConfig::Identity { weight } => Box::new(IdentityStage::new(weight)?),
            StageConfig::Stemming { weight } => Box::new(StemmingStage::new(weight, locale)?),
        })
    }
}

fn default_stage_configs() -> Vec<StageConfig> {
    vec![
        StageConfig::Identity {
            weight: DEFAULT_IDENTITY_WEIGHT,
        },
        StageConfig::Stemming {
            weight: DEFAULT_STEMMING_WEIGHT,
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeteorConfig {
    pub locale: Locale,
    pub stages: Vec<StageConfig>,
    pub alignment: AlignmentConfig,
}

impl Default for MeteorConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            stages: default_stage_configs(),
            alignment: AlignmentConfig::default(),
        }
    }
}

impl MeteorConfig {
    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read or
    /// `ConfigError::ParseError` if it is not a valid config.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a config from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for malformed JSON or unknown stage
    /// kinds.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Instantiate the configured stages in order
    ///
    /// # Errors
    ///
    /// See [`StageConfig::build`].
    pub fn build_stages(&self) -> Result<Vec<Box<dyn Stage>>, ConfigError> {
        let stages = self
            .stages
            .iter()
            .map(|stage| stage.build(self.locale))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stages)
    }

    /// Build a scorer from this config
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for invalid stages or an empty stage
    /// list.
    pub fn build_scorer(&self) -> Result<Scorer, ConfigError> {
        let engine = AlignmentEngine::new(self.alignment.clone());
        Ok(Scorer::new(self.locale, self.build_stages()?, engine)?)
    }
}
