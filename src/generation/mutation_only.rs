use super::{Generation, Variation, binomial};
use crate::error::{ConfigError, check_rate};
use crate::{MutationOperator, Split};
use rand::Rng;
use tracing::instrument;

/// Mutates each selected individual with probability `rate`; no crossover.
#[derive(Debug, Clone)]
pub struct MutationOnly<M> {
    mutation: M,
    rate: f64,
}

impl<M> MutationOnly<M> {
    /// Fails unless `rate` is in `[0, 1]`.
    #[instrument(level = "debug", skip(mutation))]
    pub fn new(mutation: M, rate: f64) -> Result<Self, ConfigError> {
        let rate = check_rate("mutation rate", rate)?;
        Ok(Self { mutation, rate })
    }

    /// Mutates every selected individual.
    pub fn always(mutation: M) -> Self {
        Self {
            mutation,
            rate: 1.0,
        }
    }

    pub fn mutation_rate(&self) -> f64 {
        self.rate
    }
}

impl<M: Split> Split for MutationOnly<M> {
    fn split(&self) -> Self {
        Self {
            mutation: self.mutation.split(),
            rate: self.rate,
        }
    }
}

impl<T, M: MutationOperator<T>> Generation<T> for MutationOnly<M> {
    fn apply<P, R>(&mut self, population: &mut P, rng: &mut R) -> usize
    where
        P: Variation<T>,
        R: Rng,
    {
        let count = binomial(population.mutable_size(), self.rate, rng);
        for i in 0..count {
            self.mutation.mutate(population.candidate_mut(i), rng);
            population.update_fitness(i);
        }
        count
    }
}
