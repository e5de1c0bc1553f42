//! Parent selection operators.
//!
//! Every operator fills an output slice with indices into a [`FitnessVector`],
//! drawn with replacement. Output order is always randomised: generation
//! strategies pair consecutive entries as crossover parents, so no operator may
//! emit all copies of one winner next to each other.
//!
//! # Families
//!
//! | Operator | Weighting | Cost per call | Needs positive fitness |
//! |----------|-----------|---------------|------------------------|
//! | [`FitnessProportionalSelection`] | raw fitness | O(N + M log N) | yes |
//! | [`StochasticUniversalSampling`] | raw fitness | O(N + M) | yes |
//! | shifted variants | `f − min f + 1` | as above | no |
//! | [`BiasedSelection`] | caller bias `b(f)` | as above | `b(f) ≥ 0` |
//! | [`LinearRankSelection`] / [`ExponentialRankSelection`] | rank | O(N log N + M log N) | no |
//! | [`BoltzmannSelection`] | `exp(f / t)` | O(N + M log N) | no |
//! | [`TournamentSelection`] | best of k | O(k M) | no |
//! | [`TruncationSelection`] | uniform over top k | O(N + M) expected | no |
//! | [`RandomSelection`] | none | O(M) | no |
//!
//! The two proportional operators are distinct types. Any other weighted
//! operator switches to stochastic universal sampling with
//! [`WeightedSelection::universal`]. [`FitnessShifter`] and [`SigmaScaling`]
//! wrap any other operator.
//!
//! Raw fitness-proportional weighting on non-positive fitness is a caller
//! error. It is checked by a debug assertion only.

use crate::fitness::FitnessVector;
use rand::RngCore;
use std::fmt::Debug;

mod boltzmann;
mod proportional;
mod random;
mod rank;
mod scaling;
mod tournament;
mod truncation;
mod weighted;

pub use boltzmann::{Boltzmann, BoltzmannSelection, CoolingSchedule};
pub use proportional::{
    Biased, BiasedSelection, FitnessBias, FitnessProportionalSelection, Proportional,
    StochasticUniversalSampling,
};
pub use random::RandomSelection;
pub use rank::{ExponentialRank, ExponentialRankSelection, LinearRank, LinearRankSelection};
pub use scaling::{FitnessShifter, SigmaScaling};
pub use tournament::TournamentSelection;
pub use truncation::TruncationSelection;
pub use weighted::{Sampling, WeightFunction, WeightedSelection};

/// Chooses parents from a population.
pub trait SelectionOperator: Debug + Send {
    /// Fills `selected` with indices in `0..fitness.len()`.
    ///
    /// `fitness` must be non-empty unless `selected` is empty.
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    );

    /// Resets per-run state ahead of a run of `generations` generations.
    fn init(&mut self, _generations: usize) {}

    /// Independent copy safe to drive from another thread.
    fn split(&self) -> Box<dyn SelectionOperator>;
}

impl SelectionOperator for Box<dyn SelectionOperator> {
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    ) {
        (**self).select(fitness, selected, rng)
    }

    fn init(&mut self, generations: usize) {
        (**self).init(generations)
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        (**self).split()
    }
}
