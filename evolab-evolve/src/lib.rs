//! Evolab Evolve: genetic search over strategy parameterizations.
//!
//! Builds on `evolab-core`:
//! - `StrategyGene`: the flat, evolvable strategy configuration
//! - `EvolvedStrategy`: the gene-driven `Strategy` implementation
//! - Fitness evaluation via the core simulator
//! - `GeneticOptimizer`: the generation loop (tournament selection,
//!   uniform crossover, per-field mutation, elitism)
//! - `OptimizerConfig`: serializable run parameters with TOML loading

pub mod config;
pub mod evolved;
pub mod fitness;
pub mod gene;
pub mod optimizer;

pub use config::{ConfigError, OptimizerConfig};
pub use evolved::EvolvedStrategy;
pub use fitness::{evaluate_gene, FitnessResult, FitnessWeights};
pub use gene::{EntryCondition, ExitCondition, StrategyGene};
pub use optimizer::{EvolutionReport, GeneticOptimizer};
