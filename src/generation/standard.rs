use super::{Generation, Variation, binomial, cross_prefix};
use crate::error::{ConfigError, check_rate};
use crate::{CrossoverOperator, MutationOperator, Split};
use rand::Rng;
use tracing::instrument;

/// Crossover and mutation applied independently.
///
/// A binomial number of pairs is crossed, then every selected individual is
/// mutated with probability `mutation_rate` regardless of whether it was
/// crossed. An individual may see both operators, one, or neither.
#[derive(Debug, Clone)]
pub struct CrossoverMutation<C, M> {
    crossover: C,
    mutation: M,
    crossover_rate: f64,
    mutation_rate: f64,
}

impl<C, M> CrossoverMutation<C, M> {
    /// Fails unless both rates are in `[0, 1]`.
    #[instrument(level = "debug", skip(crossover, mutation))]
    pub fn new(
        crossover: C,
        crossover_rate: f64,
        mutation: M,
        mutation_rate: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            crossover,
            mutation,
            crossover_rate: check_rate("crossover rate", crossover_rate)?,
            mutation_rate: check_rate("mutation rate", mutation_rate)?,
        })
    }

    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }
}

impl<C: Split, M: Split> Split for CrossoverMutation<C, M> {
    fn split(&self) -> Self {
        Self {
            crossover: self.crossover.split(),
            mutation: self.mutation.split(),
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
        }
    }
}

impl<T, C, M> Generation<T> for CrossoverMutation<C, M>
where
    C: CrossoverOperator<T>,
    M: MutationOperator<T>,
{
    fn apply<P, R>(&mut self, population: &mut P, rng: &mut R) -> usize
    where
        P: Variation<T>,
        R: Rng,
    {
        let n = population.mutable_size();
        let pairs = binomial(n / 2, self.crossover_rate, rng);
        cross_prefix::<T, _, _, _>(&mut self.crossover, population, pairs, rng);

        let crossed = 2 * pairs;
        let mut evaluations = 0;
        for i in 0..n {
            let mutate = rng.random::<f64>() < self.mutation_rate;
            if mutate {
                self.mutation.mutate(population.candidate_mut(i), rng);
            }
            if mutate || i < crossed {
                population.update_fitness(i);
                evaluations += 1;
            }
        }
        evaluations
    }
}
