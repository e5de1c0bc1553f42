//! Self-adaptive variation.
//!
//! Each individual carries its own crossover rate, mutation rate and step
//! size. The rates are used directly as that individual's Bernoulli
//! probabilities, and all three evolve by Gaussian mutation alongside the
//! genome. Build the population over [`Adaptive<T>`] with
//! [`AdaptiveInitializer`] and [`AdaptiveFitness`] wrapping the plain
//! collaborators.

use super::{Generation, Variation};
use crate::error::ConfigError;
use crate::{CrossoverOperator, FitnessFunction, Initializer, MutationOperator, Split};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Per-individual variation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveParameters {
    pub crossover_rate: f64,
    pub mutation_rate: f64,
    /// Standard deviation of the Gaussian applied to the rates.
    pub sigma: f64,
}

impl AdaptiveParameters {
    pub const MIN_RATE: f64 = 0.1;
    pub const MAX_RATE: f64 = 1.0;
    pub const MIN_SIGMA: f64 = 0.01;
    pub const MAX_SIGMA: f64 = 0.2;

    /// Fails if a rate is outside `[0.1, 1]` or `sigma` outside `[0.01, 0.2]`.
    pub fn new(crossover_rate: f64, mutation_rate: f64, sigma: f64) -> Result<Self, ConfigError> {
        let rates = Self::MIN_RATE..=Self::MAX_RATE;
        if !rates.contains(&crossover_rate) {
            return Err(ConfigError::invalid_parameter(
                "adaptive crossover rate",
                crossover_rate,
                "in [0.1, 1]",
            ));
        }
        if !rates.contains(&mutation_rate) {
            return Err(ConfigError::invalid_parameter(
                "adaptive mutation rate",
                mutation_rate,
                "in [0.1, 1]",
            ));
        }
        if !(Self::MIN_SIGMA..=Self::MAX_SIGMA).contains(&sigma) {
            return Err(ConfigError::invalid_parameter(
                "adaptive sigma",
                sigma,
                "in [0.01, 0.2]",
            ));
        }
        Ok(Self {
            crossover_rate,
            mutation_rate,
            sigma,
        })
    }

    /// Uniformly random parameters within the allowed ranges.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            crossover_rate: rng.random_range(Self::MIN_RATE..=Self::MAX_RATE),
            mutation_rate: rng.random_range(Self::MIN_RATE..=Self::MAX_RATE),
            sigma: rng.random_range(Self::MIN_SIGMA..=Self::MAX_SIGMA),
        }
    }
}

/// A genome with its own [`AdaptiveParameters`].
///
/// Equality and hashing look at the genome only, so two individuals that
/// differ only in their parameters count as the same candidate for elitism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adaptive<T> {
    pub genome: T,
    pub params: AdaptiveParameters,
}

impl<T: PartialEq> PartialEq for Adaptive<T> {
    fn eq(&self, other: &Self) -> bool {
        self.genome == other.genome
    }
}

impl<T: Eq> Eq for Adaptive<T> {}

impl<T: Hash> Hash for Adaptive<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.genome.hash(state);
    }
}

/// Gaussian mutation of [`AdaptiveParameters`].
///
/// Stateless; one value per strategy, passed by reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateMutation {
    step: f64,
}

impl Default for RateMutation {
    fn default() -> Self {
        Self { step: 0.01 }
    }
}

impl RateMutation {
    /// `step` is the standard deviation applied to `sigma` itself.
    pub fn new(step: f64) -> Result<Self, ConfigError> {
        if !(step > 0.0 && step.is_finite()) {
            return Err(ConfigError::invalid_parameter(
                "sigma mutation step",
                step,
                "positive and finite",
            ));
        }
        Ok(Self { step })
    }

    /// `σ ← clamp(σ + N(0, step))`, then each rate `r ← clamp(r + σ·N(0, 1))`.
    pub fn mutate<R: Rng + ?Sized>(&self, params: &mut AdaptiveParameters, rng: &mut R) {
        let n: f64 = StandardNormal.sample(rng);
        params.sigma = (params.sigma + self.step * n).clamp(
            AdaptiveParameters::MIN_SIGMA,
            AdaptiveParameters::MAX_SIGMA,
        );
        let sigma = params.sigma;
        let perturb = |rate: f64, rng: &mut R| {
            let n: f64 = StandardNormal.sample(rng);
            (rate + sigma * n).clamp(AdaptiveParameters::MIN_RATE, AdaptiveParameters::MAX_RATE)
        };
        params.crossover_rate = perturb(params.crossover_rate, rng);
        params.mutation_rate = perturb(params.mutation_rate, rng);
    }
}

/// Wraps an initializer to attach random [`AdaptiveParameters`].
#[derive(Debug, Clone)]
pub struct AdaptiveInitializer<I> {
    inner: I,
}

impl<I> AdaptiveInitializer<I> {
    pub fn new(inner: I) -> Self {
        Self { inner }
    }
}

impl<I: Split> Split for AdaptiveInitializer<I> {
    fn split(&self) -> Self {
        Self {
            inner: self.inner.split(),
        }
    }
}

impl<T, I: Initializer<T>> Initializer<Adaptive<T>> for AdaptiveInitializer<I> {
    fn create_candidate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Adaptive<T> {
        let genome = self.inner.create_candidate(rng);
        Adaptive {
            genome,
            params: AdaptiveParameters::random(rng),
        }
    }
}

/// Evaluates an [`Adaptive`] individual by its genome.
#[derive(Debug, Clone)]
pub struct AdaptiveFitness<FF> {
    inner: FF,
}

impl<FF> AdaptiveFitness<FF> {
    pub fn new(inner: FF) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &FF {
        &self.inner
    }
}

impl<T, FF: FitnessFunction<T>> FitnessFunction<Adaptive<T>> for AdaptiveFitness<FF> {
    type Fitness = FF::Fitness;

    fn fitness(&self, candidate: &Adaptive<T>) -> Self::Fitness {
        self.inner.fitness(&candidate.genome)
    }

    fn cost(&self, candidate: &Adaptive<T>) -> f64 {
        self.inner.cost(&candidate.genome)
    }

    fn is_minimum_cost(&self, cost: f64) -> bool {
        self.inner.is_minimum_cost(cost)
    }
}

/// Placeholder crossover for [`SelfAdaptive::mutation_only`]. Never invoked.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCrossover;

impl Split for NoCrossover {
    fn split(&self) -> Self {
        Self
    }
}

impl<T> CrossoverOperator<T> for NoCrossover {
    fn cross<R: Rng + ?Sized>(&mut self, _first: &mut T, _second: &mut T, _rng: &mut R) {}
}

/// Variation driven by each individual's own parameters.
///
/// Adjacent slots `(2i, 2i + 1)` are crossed with the first one's crossover
/// rate; every slot is then mutated with its own mutation rate. Afterwards all
/// parameters go through [`RateMutation`]. Only slots whose genome changed are
/// re-evaluated.
#[derive(Debug, Clone)]
pub struct SelfAdaptive<C, M> {
    crossover: Option<C>,
    mutation: M,
    rates: RateMutation,
    modified: Vec<bool>,
}

impl<M> SelfAdaptive<NoCrossover, M> {
    pub fn mutation_only(mutation: M) -> Self {
        Self {
            crossover: None,
            mutation,
            rates: RateMutation::default(),
            modified: Vec::new(),
        }
    }
}

impl<C, M> SelfAdaptive<C, M> {
    pub fn new(crossover: C, mutation: M) -> Self {
        Self {
            crossover: Some(crossover),
            mutation,
            rates: RateMutation::default(),
            modified: Vec::new(),
        }
    }

    pub fn with_rate_mutation(mut self, rates: RateMutation) -> Self {
        self.rates = rates;
        self
    }
}

impl<C: Split, M: Split> Split for SelfAdaptive<C, M> {
    fn split(&self) -> Self {
        Self {
            crossover: self.crossover.as_ref().map(Split::split),
            mutation: self.mutation.split(),
            rates: self.rates,
            modified: Vec::new(),
        }
    }
}

impl<T, C, M> Generation<Adaptive<T>> for SelfAdaptive<C, M>
where
    C: CrossoverOperator<T>,
    M: MutationOperator<T>,
{
    fn apply<P, R>(&mut self, population: &mut P, rng: &mut R) -> usize
    where
        P: Variation<Adaptive<T>>,
        R: Rng,
    {
        let n = population.mutable_size();
        self.modified.clear();
        self.modified.resize(n, false);

        if let Some(crossover) = &mut self.crossover {
            for i in (0..n.saturating_sub(1)).step_by(2) {
                let rate = population.candidate_mut(i).params.crossover_rate;
                if rng.random::<f64>() < rate {
                    let (a, b) = population.candidate_pair_mut(i, i + 1);
                    crossover.cross(&mut a.genome, &mut b.genome, rng);
                    self.modified[i] = true;
                    self.modified[i + 1] = true;
                }
            }
        }

        for i in 0..n {
            let individual = population.candidate_mut(i);
            if rng.random::<f64>() < individual.params.mutation_rate {
                self.mutation.mutate(&mut individual.genome, rng);
                self.modified[i] = true;
            }
            self.rates.mutate(&mut individual.params, rng);
        }

        let mut evaluations = 0;
        for (i, _) in self.modified.iter().enumerate().filter(|(_, m)| **m) {
            population.update_fitness(i);
            evaluations += 1;
        }
        evaluations
    }
}
