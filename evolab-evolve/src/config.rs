//! Serializable optimizer configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fitness::FitnessWeights;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// All parameters of one evolution run.
///
/// Two runs with identical configs (and the same series) produce identical
/// results; `run_id` gives them the same content-addressed identifier so
/// reporting collaborators can dedupe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Number of genes, fixed for the whole run.
    pub population_size: usize,
    pub generations: usize,
    /// Per-field mutation probability.
    pub mutation_rate: f64,
    /// Per-pair crossover probability.
    pub crossover_rate: f64,
    /// Seed for the single coordinator RNG.
    pub seed: u64,
    /// Starting equity of each fitness walk-forward.
    pub initial_equity: f64,
    pub weights: FitnessWeights,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            generations: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.8,
            seed: 42,
            initial_equity: 10_000.0,
            weights: FitnessWeights::default(),
        }
    }
}

impl OptimizerConfig {
    /// Parse from TOML, falling back to defaults for absent fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < 2 {
            return Err(ConfigError::Invalid(format!(
                "population_size must be at least 2, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::Invalid(format!(
                "mutation_rate must be in [0, 1], got {}",
                self.mutation_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(ConfigError::Invalid(format!(
                "crossover_rate must be in [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if !(self.initial_equity > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "initial_equity must be positive, got {}",
                self.initial_equity
            )));
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("OptimizerConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
