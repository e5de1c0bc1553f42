//! Population management, selection and elitism for generational evolutionary
//! algorithms.
//!
//! A run cycles through select → vary → evaluate → replace. The pieces are:
//!
//! - [`selection`]: operators that turn a [`FitnessVector`] into parent indices
//! - [`elite::EliteSet`]: bounded min-heap of the best distinct candidates seen
//! - [`population::Population`]: parent/child buffers, best-ever tracking, elitism
//! - [`generation`]: how crossover and mutation are applied each generation
//! - [`algorithms::generational::GenerationalEa`]: the driver loop
//!
//! Genome representations and their operators are supplied by the caller through
//! the traits in this module.

use rand::Rng;
use std::hash::Hash;

pub use config::EaConfig;
pub use error::ConfigError;
pub use fitness::{Fitness, FitnessVector};
pub use selection::SelectionOperator;
pub use tracker::{ProgressTracker, SolutionCostPair};

/// Produces an independent copy for use on another thread.
///
/// The copy shares no mutable state with the original. Components holding
/// random state must reseed rather than clone it.
pub trait Split {
    fn split(&self) -> Self;
}

/// A candidate solution.
///
/// `Clone` is the deep copy taken whenever a candidate enters the elite set or
/// the best-ever tracker. `Eq + Hash` define candidate identity for elite
/// de-duplication; real-valued genomes can wrap their values in something like
/// `ordered_float::OrderedFloat`.
pub trait Candidate: Clone + Eq + Hash + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Send + Sync + 'static> Candidate for T {}

/// Creates random candidates for the initial population.
pub trait Initializer<T>: Split + Send {
    fn create_candidate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> T;
}

/// Maps candidates to fitness (higher is better) and to the cost of the
/// underlying minimisation problem.
pub trait FitnessFunction<T>: Send + Sync {
    /// Either `f64` or `i64`. A population never mixes the two.
    type Fitness: Fitness;

    fn fitness(&self, candidate: &T) -> Self::Fitness;

    /// Cost reported to the [`ProgressTracker`].
    fn cost(&self, candidate: &T) -> f64;

    /// Whether `cost` is the theoretical minimum of the problem.
    fn is_minimum_cost(&self, _cost: f64) -> bool {
        false
    }
}

/// Mutates a candidate in place.
pub trait MutationOperator<T>: Split + Send {
    fn mutate<R: Rng + ?Sized>(&mut self, candidate: &mut T, rng: &mut R);
}

/// Recombines two candidates in place.
pub trait CrossoverOperator<T>: Split + Send {
    fn cross<R: Rng + ?Sized>(&mut self, first: &mut T, second: &mut T, rng: &mut R);
}

pub mod config;
pub mod elite;
pub mod error;
pub mod fitness;
pub mod generation;
pub mod population;
pub mod selection;
pub mod tracker;

pub mod algorithms {
    pub mod generational;
}
