//! Per-generation application of crossover and mutation.
//!
//! A [`Generation`] strategy works on the child buffer filled by
//! [`Population::select`](crate::population::Population::select) through the
//! narrow [`Variation`] interface, and reports how many fitness evaluations it
//! performed. Selection already randomised the buffer order, so strategies
//! vary a binomially sampled prefix instead of drawing a Bernoulli trial per
//! slot wherever the two are equivalent.

use crate::{CrossoverOperator, Split};
use rand::Rng;
use rand_distr::{Binomial, Distribution};

mod adaptive;
mod exclusive;
mod mutation_only;
mod standard;

pub use adaptive::{
    Adaptive, AdaptiveFitness, AdaptiveInitializer, AdaptiveParameters, NoCrossover, RateMutation,
    SelfAdaptive,
};
pub use exclusive::ExclusiveCrossoverMutation;
pub use mutation_only::MutationOnly;
pub use standard::CrossoverMutation;

/// What a generation strategy may do to a population.
pub trait Variation<T> {
    /// Number of child slots open to variation this generation (LAMBDA).
    fn mutable_size(&self) -> usize;

    fn candidate_mut(&mut self, i: usize) -> &mut T;

    /// Two distinct child slots at once, in argument order.
    fn candidate_pair_mut(&mut self, i: usize, j: usize) -> (&mut T, &mut T);

    /// Re-evaluates slot `i` after it was modified.
    fn update_fitness(&mut self, i: usize);
}

/// One generation's worth of variation.
pub trait Generation<T>: Split + Send {
    /// Varies and re-evaluates the child buffer.
    ///
    /// Returns the number of fitness evaluations performed, which is the
    /// number of slots that were modified.
    fn apply<P, R>(&mut self, population: &mut P, rng: &mut R) -> usize
    where
        P: Variation<T>,
        R: Rng;
}

/// Number of successes in `n` trials of probability `p`.
pub(crate) fn binomial<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> usize {
    if n == 0 || p <= 0.0 {
        return 0;
    }
    if p >= 1.0 {
        return n;
    }
    // 0 < p < 1 here
    Binomial::new(n as u64, p).map_or(0, |b| b.sample(rng) as usize)
}

/// Crosses slot `i` with slot `i + count` for every `i < count`.
pub(crate) fn cross_prefix<T, C, P, R>(
    crossover: &mut C,
    population: &mut P,
    count: usize,
    rng: &mut R,
) where
    C: CrossoverOperator<T>,
    P: Variation<T>,
    R: Rng,
{
    for i in 0..count {
        let (a, b) = population.candidate_pair_mut(i, i + count);
        crossover.cross(a, b, rng);
    }
}
