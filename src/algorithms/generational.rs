//! Generational evolutionary algorithm driver.
//!
//! Each generation selects LAMBDA parents into the child buffer, lets a
//! [`Generation`] strategy vary and re-evaluate them, and replaces the parents
//! with the children (plus elites). The loop checks the shared
//! [`ProgressTracker`] at every generation boundary and stops early once a
//! known optimum is found or a stop is requested.
//!
//! # Example
//!
//! ```rust
//! use genpop::algorithms::generational::GenerationalEa;
//! use genpop::generation::MutationOnly;
//! use genpop::selection::TournamentSelection;
//! use genpop::{EaConfig, FitnessFunction, Initializer, MutationOperator, Split};
//! use rand::Rng;
//!
//! #[derive(Clone)]
//! struct RandomBits(usize);
//! impl Split for RandomBits {
//!     fn split(&self) -> Self { self.clone() }
//! }
//! impl Initializer<Vec<bool>> for RandomBits {
//!     fn create_candidate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<bool> {
//!         (0..self.0).map(|_| rng.random()).collect()
//!     }
//! }
//!
//! #[derive(Clone)]
//! struct FlipOne;
//! impl Split for FlipOne {
//!     fn split(&self) -> Self { FlipOne }
//! }
//! impl MutationOperator<Vec<bool>> for FlipOne {
//!     fn mutate<R: Rng + ?Sized>(&mut self, c: &mut Vec<bool>, rng: &mut R) {
//!         let i = rng.random_range(0..c.len());
//!         c[i] = !c[i];
//!     }
//! }
//!
//! struct OneMax;
//! impl FitnessFunction<Vec<bool>> for OneMax {
//!     type Fitness = i64;
//!     fn fitness(&self, c: &Vec<bool>) -> i64 { c.iter().filter(|&&b| b).count() as i64 }
//!     fn cost(&self, c: &Vec<bool>) -> f64 { c.iter().filter(|&&b| !b).count() as f64 }
//!     fn is_minimum_cost(&self, cost: f64) -> bool { cost == 0.0 }
//! }
//!
//! let mut ea = GenerationalEa::builder()
//!     .config(EaConfig::new(20).with_elite_count(2).with_seed(7))
//!     .initializer(RandomBits(16))
//!     .fitness_function(OneMax)
//!     .selection(TournamentSelection::binary())
//!     .generation(MutationOnly::always(FlipOne))
//!     .build()
//!     .unwrap();
//!
//! let best = ea.optimize(200).unwrap();
//! assert!(best.cost <= 16.0);
//! ```

use crate::config::EaConfig;
use crate::error::ConfigError;
use crate::generation::Generation;
use crate::population::Population;
use crate::selection::SelectionOperator;
use crate::tracker::{ProgressTracker, SolutionCostPair};
use crate::{Candidate, FitnessFunction, Initializer, Split};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::sync::Arc;

/// A population, a variation strategy and the generator driving both.
pub struct GenerationalEa<T, I, FF, G>
where
    FF: FitnessFunction<T>,
{
    population: Population<T, I, FF>,
    generation: G,
    rng: Pcg64,
    total_generations: u64,
    total_evaluations: u64,
}

impl<T, I, FF, G> GenerationalEa<T, I, FF, G>
where
    T: Candidate,
    I: Initializer<T>,
    FF: FitnessFunction<T>,
    G: Generation<T>,
{
    /// Builds an instance with its own progress tracker.
    pub fn new(
        config: &EaConfig,
        initializer: I,
        fitness: FF,
        selection: impl SelectionOperator + 'static,
        generation: G,
    ) -> Result<Self, ConfigError> {
        Self::builder()
            .config(config.clone())
            .initializer(initializer)
            .fitness_function(fitness)
            .selection(selection)
            .generation(generation)
            .build()
    }

    pub fn builder() -> EaBuilder<T, I, FF, G> {
        EaBuilder::default()
    }

    fn from_parts(population: Population<T, I, FF>, generation: G, rng: Pcg64) -> Self {
        Self {
            population,
            generation,
            rng,
            total_generations: 0,
            total_evaluations: 0,
        }
    }

    /// Runs `generations` generations from a freshly initialised population.
    ///
    /// Returns the best solution this run produced, or `None` if evolution
    /// was already paused through the tracker.
    pub fn optimize(&mut self, generations: usize) -> Option<SolutionCostPair<T>> {
        if self.population.evolution_is_paused() {
            return None;
        }
        let evaluations = self.population.init(generations, &mut self.rng);
        self.total_evaluations += evaluations as u64;
        self.run(generations)
    }

    /// Runs `generations` more generations from the current population.
    ///
    /// Selection run state (e.g. Boltzmann temperature) restarts. Falls back
    /// to [`optimize`](Self::optimize) when the population was never
    /// initialised.
    pub fn reoptimize(&mut self, generations: usize) -> Option<SolutionCostPair<T>> {
        if !self.population.is_initialized() {
            return self.optimize(generations);
        }
        if self.population.evolution_is_paused() {
            return None;
        }
        self.population.restart_selection(generations);
        self.run(generations)
    }

    fn run(&mut self, generations: usize) -> Option<SolutionCostPair<T>> {
        let mut completed = 0;
        for _ in 0..generations {
            if self.population.evolution_is_paused() {
                break;
            }
            let evaluations = self.step();
            completed += 1;
            tracing::debug!(
                generation = self.total_generations,
                evaluations,
                best = ?self.population.best_fitness(),
                "generation complete"
            );
        }
        let best = self.population.most_fit().cloned();
        tracing::info!(
            generations = completed,
            total_evaluations = self.total_evaluations,
            best_cost = best.as_ref().map(|b| b.cost),
            "run finished"
        );
        best
    }

    /// Runs a single generation and returns the evaluations it performed.
    ///
    /// Initialises the population first if needed.
    pub fn step(&mut self) -> usize {
        if !self.population.is_initialized() {
            let evaluations = self.population.init(0, &mut self.rng);
            self.total_evaluations += evaluations as u64;
        }
        self.population.select(&mut self.rng);
        let evaluations = self.generation.apply(&mut self.population, &mut self.rng);
        self.population.replace();
        self.total_generations += 1;
        self.total_evaluations += evaluations as u64;
        evaluations
    }

    /// Independent copy driven by a generator seeded with `seed`.
    pub fn split_with_seed(&self, seed: u64) -> Self {
        Self::from_parts(
            self.population.split(),
            self.generation.split(),
            Pcg64::seed_from_u64(seed),
        )
    }

    pub fn population(&self) -> &Population<T, I, FF> {
        &self.population
    }

    pub fn tracker(&self) -> &Arc<ProgressTracker<T>> {
        self.population.tracker()
    }

    /// Generations run across all calls to `optimize` and `reoptimize`.
    pub fn total_generations(&self) -> u64 {
        self.total_generations
    }

    /// Fitness evaluations across all calls, including initialisation.
    pub fn total_evaluations(&self) -> u64 {
        self.total_evaluations
    }
}

impl<T, I, FF, G> Split for GenerationalEa<T, I, FF, G>
where
    T: Candidate,
    I: Initializer<T>,
    FF: FitnessFunction<T>,
    G: Generation<T>,
{
    /// Shares the fitness function and tracker; everything else is fresh,
    /// including counters and a generator seeded from the thread RNG.
    fn split(&self) -> Self {
        Self::from_parts(
            self.population.split(),
            self.generation.split(),
            Pcg64::from_rng(&mut rand::rng()),
        )
    }
}

/// Assembles a [`GenerationalEa`], reporting missing collaborators.
pub struct EaBuilder<T, I, FF, G> {
    config: EaConfig,
    initializer: Option<I>,
    fitness: Option<Arc<FF>>,
    selection: Option<Box<dyn SelectionOperator>>,
    generation: Option<G>,
    tracker: Option<Arc<ProgressTracker<T>>>,
}

impl<T, I, FF, G> Default for EaBuilder<T, I, FF, G> {
    fn default() -> Self {
        Self {
            config: EaConfig::default(),
            initializer: None,
            fitness: None,
            selection: None,
            generation: None,
            tracker: None,
        }
    }
}

impl<T, I, FF, G> EaBuilder<T, I, FF, G>
where
    T: Candidate,
    I: Initializer<T>,
    FF: FitnessFunction<T>,
    G: Generation<T>,
{
    pub fn config(mut self, config: EaConfig) -> Self {
        self.config = config;
        self
    }

    pub fn initializer(mut self, initializer: I) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn fitness_function(mut self, fitness: FF) -> Self {
        self.fitness = Some(Arc::new(fitness));
        self
    }

    /// Uses a fitness function already shared with other instances.
    pub fn shared_fitness_function(mut self, fitness: Arc<FF>) -> Self {
        self.fitness = Some(fitness);
        self
    }

    pub fn selection(mut self, selection: impl SelectionOperator + 'static) -> Self {
        self.selection = Some(Box::new(selection));
        self
    }

    pub fn generation(mut self, generation: G) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Shares an existing tracker. Without one the instance gets its own.
    pub fn tracker(mut self, tracker: Arc<ProgressTracker<T>>) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn build(self) -> Result<GenerationalEa<T, I, FF, G>, ConfigError> {
        let initializer = self.initializer.ok_or(ConfigError::missing("initializer"))?;
        let fitness = self.fitness.ok_or(ConfigError::missing("fitness function"))?;
        let selection = self.selection.ok_or(ConfigError::missing("selection operator"))?;
        let generation = self
            .generation
            .ok_or(ConfigError::missing("generation strategy"))?;
        let tracker = self.tracker.unwrap_or_default();
        let rng = match self.config.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_rng(&mut rand::rng()),
        };
        let population = Population::new(&self.config, initializer, fitness, selection, tracker)?;
        tracing::debug!(
            population_size = self.config.population_size,
            elite_count = self.config.elite_count,
            "evolutionary algorithm built"
        );
        Ok(GenerationalEa::from_parts(population, generation, rng))
    }
}
