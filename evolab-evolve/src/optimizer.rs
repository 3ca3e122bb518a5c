//! The genetic evolution loop.
//!
//! One generation: evaluate every gene, record the best ever seen, then
//! tournament selection, adjacent-pair uniform crossover, per-field
//! mutation, and elitism. Fitness evaluation is embarrassingly parallel
//! (each gene gets a private strategy over the shared read-only series)
//! and runs on rayon behind a generation barrier; all randomness for the
//! genetic operators is drawn from one coordinator RNG, so a seed fully
//! determines a run regardless of thread count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use evolab_core::domain::Bar;

use crate::config::OptimizerConfig;
use crate::fitness::{evaluate_gene, FitnessResult};
use crate::gene::StrategyGene;

/// Outcome of a completed evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub best_gene: StrategyGene,
    pub best_result: FitnessResult,
    /// The last generation's population, for top-K reporting.
    pub final_population: Vec<StrategyGene>,
    /// Best-ever fitness after each generation; non-decreasing.
    pub best_fitness_per_generation: Vec<f64>,
    /// Content hash of the configuration that produced this report.
    pub run_id: String,
}

impl EvolutionReport {
    /// The `k` highest-fitness genes of the final population, best first.
    pub fn top_k(&self, k: usize) -> Vec<&StrategyGene> {
        let mut ranked: Vec<&StrategyGene> = self.final_population.iter().collect();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        ranked.truncate(k);
        ranked
    }
}

/// Population-based search over the gene space.
pub struct GeneticOptimizer<'a> {
    bars: &'a [Bar],
    config: OptimizerConfig,
    population: Vec<StrategyGene>,
    /// Per-gene results of the most recent evaluation, index-aligned with
    /// the population.
    last_results: Vec<FitnessResult>,
    best_gene: Option<StrategyGene>,
    best_result: Option<FitnessResult>,
    rng: StdRng,
}

impl<'a> GeneticOptimizer<'a> {
    /// Seed a random initial population over `bars`.
    pub fn new(bars: &'a [Bar], config: OptimizerConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let population = (0..config.population_size)
            .map(|_| StrategyGene::random(&mut rng))
            .collect();
        info!(
            bars = bars.len(),
            population = config.population_size,
            generations = config.generations,
            "genetic optimizer initialized"
        );
        Self {
            bars,
            config,
            population,
            last_results: Vec::new(),
            best_gene: None,
            best_result: None,
            rng,
        }
    }

    /// Run the configured number of generations and return the report.
    pub fn evolve(mut self) -> EvolutionReport {
        let mut best_per_generation = Vec::with_capacity(self.config.generations);

        for generation in 0..self.config.generations {
            self.evaluate_population();
            self.record_best(generation);
            // best_gene is set by record_best on the first generation.
            best_per_generation.push(self.best_gene.as_ref().map_or(0.0, |g| g.fitness));

            self.select();
            self.crossover();
            self.mutate();
            self.elitism();
        }

        // A zero-generation run still owes the caller a best gene.
        if self.best_gene.is_none() {
            self.evaluate_population();
            self.record_best(0);
        }

        let (best_gene, best_result) = match (self.best_gene.take(), self.best_result.take()) {
            (Some(gene), Some(result)) => (gene, result),
            // Empty population (unvalidated config): fall back to the
            // default gene scored over the series, never a fault.
            _ => {
                let mut gene = StrategyGene::default();
                let result = evaluate_gene(
                    self.bars,
                    &gene,
                    &self.config.weights,
                    self.config.initial_equity,
                );
                gene.fitness = result.fitness_score;
                (gene, result)
            }
        };
        info!(fitness = best_gene.fitness, "evolution complete");

        EvolutionReport {
            best_gene,
            best_result,
            final_population: self.population,
            best_fitness_per_generation: best_per_generation,
            run_id: self.config.run_id(),
        }
    }

    /// Score every gene; the generation barrier is the collect itself.
    fn evaluate_population(&mut self) {
        let bars = self.bars;
        let weights = self.config.weights;
        let initial_equity = self.config.initial_equity;
        let results: Vec<FitnessResult> = self
            .population
            .par_iter()
            .map(|gene| evaluate_gene(bars, gene, &weights, initial_equity))
            .collect();
        for (gene, result) in self.population.iter_mut().zip(&results) {
            gene.fitness = result.fitness_score;
        }
        self.last_results = results;
    }

    /// Track the best gene ever observed, monotonically.
    fn record_best(&mut self, generation: usize) {
        let Some(idx) = self.best_index() else {
            return;
        };
        let candidate = &self.population[idx];
        let improved = self
            .best_gene
            .as_ref()
            .map_or(true, |best| candidate.fitness > best.fitness);
        if improved {
            self.best_gene = Some(candidate.clone());
            self.best_result = Some(self.last_results[idx]);
            info!(
                generation,
                fitness = candidate.fitness,
                "new best gene: {}",
                candidate
            );
        }
        debug!(
            generation,
            generation_best = candidate.fitness,
            all_time_best = self.best_gene.as_ref().map_or(0.0, |g| g.fitness),
            "generation evaluated"
        );
    }

    /// Tournament of size 2: draw a candidate, compare against one more
    /// draw, keep the fitter. Repeated N times to form the next population.
    fn select(&mut self) {
        let n = self.population.len();
        if n == 0 {
            return;
        }
        let mut next = Vec::with_capacity(n);
        for _ in 0..n {
            let a = self.rng.gen_range(0..n);
            let b = self.rng.gen_range(0..n);
            let winner = if self.population[b].fitness > self.population[a].fitness {
                b
            } else {
                a
            };
            next.push(self.population[winner].clone());
        }
        self.population = next;
    }

    /// Adjacent pairs swap fields uniformly with probability crossover_rate.
    fn crossover(&mut self) {
        let n = self.population.len();
        let mut i = 0;
        while i + 1 < n {
            if self.rng.gen::<f64>() < self.config.crossover_rate {
                let first = self.population[i].crossover(&self.population[i + 1], &mut self.rng);
                let second = self.population[i + 1].crossover(&self.population[i], &mut self.rng);
                self.population[i] = first;
                self.population[i + 1] = second;
            }
            i += 2;
        }
    }

    fn mutate(&mut self) {
        let rate = self.config.mutation_rate;
        let rng = &mut self.rng;
        for gene in &mut self.population {
            gene.mutate(rng, rate);
        }
    }

    /// Reinject the all-time best over the current best slot when the
    /// population has drifted below it. Guarantees the tracked best-ever
    /// fitness never decreases across generations.
    fn elitism(&mut self) {
        let Some(best) = self.best_gene.clone() else {
            return;
        };
        let Some(idx) = self.best_index() else {
            return;
        };
        if best.fitness > self.population[idx].fitness {
            self.population[idx] = best;
        }
    }

    /// Index of the highest-fitness gene in the current population.
    fn best_index(&self) -> Option<usize> {
        self.population
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.fitness.total_cmp(&b.1.fitness))
            .map(|(idx, _)| idx)
    }
}
