use super::{Generation, Variation, binomial, cross_prefix};
use crate::error::{ConfigError, check_rate};
use crate::{CrossoverOperator, MutationOperator, Split};
use rand::Rng;
use tracing::instrument;

/// Crossover and mutation never applied to the same individual in one
/// generation.
///
/// Individuals left out of crossover are mutated at `M / (1 − C)`, so the
/// unconditional mutation probability is still `M`. Requires `C + M ≤ 1`.
#[derive(Debug, Clone)]
pub struct ExclusiveCrossoverMutation<C, M> {
    crossover: C,
    mutation: M,
    crossover_rate: f64,
    mutation_rate: f64,
    /// Mutation probability among individuals that were not crossed.
    adjusted_mutation_rate: f64,
}

impl<C, M> ExclusiveCrossoverMutation<C, M> {
    /// Fails unless both rates are in `[0, 1]` and sum to at most 1.
    #[instrument(level = "debug", skip(crossover, mutation))]
    pub fn new(
        crossover: C,
        crossover_rate: f64,
        mutation: M,
        mutation_rate: f64,
    ) -> Result<Self, ConfigError> {
        let crossover_rate = check_rate("crossover rate", crossover_rate)?;
        let mutation_rate = check_rate("mutation rate", mutation_rate)?;
        if crossover_rate + mutation_rate > 1.0 {
            return Err(ConfigError::InvalidRateSum {
                crossover: crossover_rate,
                mutation: mutation_rate,
            });
        }
        let adjusted_mutation_rate = if mutation_rate == 0.0 {
            0.0
        } else {
            // C + M ≤ 1 bounds this by 1 up to rounding
            (mutation_rate / (1.0 - crossover_rate)).min(1.0)
        };
        Ok(Self {
            crossover,
            mutation,
            crossover_rate,
            mutation_rate,
            adjusted_mutation_rate,
        })
    }

    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn adjusted_mutation_rate(&self) -> f64 {
        self.adjusted_mutation_rate
    }
}

impl<C: Split, M: Split> Split for ExclusiveCrossoverMutation<C, M> {
    fn split(&self) -> Self {
        Self {
            crossover: self.crossover.split(),
            mutation: self.mutation.split(),
            crossover_rate: self.crossover_rate,
            mutation_rate: self.mutation_rate,
            adjusted_mutation_rate: self.adjusted_mutation_rate,
        }
    }
}

impl<T, C, M> Generation<T> for ExclusiveCrossoverMutation<C, M>
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
        for i in 0..crossed {
            population.update_fitness(i);
        }

        let mutated = binomial(n - crossed, self.adjusted_mutation_rate, rng);
        for i in crossed..crossed + mutated {
            self.mutation.mutate(population.candidate_mut(i), rng);
            population.update_fitness(i);
        }
        crossed + mutated
    }
}
