use super::SelectionOperator;
use super::weighted::{Sampling, WeightFunction, WeightedSelection};
use crate::fitness::{Adjusted, FitnessVector};
use rand::RngCore;
use std::fmt::Debug;
use std::sync::Arc;

/// Fitness-proportional weighting.
///
/// Unshifted, every fitness must be strictly positive. Shifted, weights are
/// `f − min f + 1` and any sign is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Proportional {
    shift: bool,
}

impl WeightFunction for Proportional {
    fn weigh(&mut self, fitness: &dyn FitnessVector, weights: &mut Vec<f64>) {
        weights.clear();
        if self.shift {
            let shifted = Adjusted::shifted(fitness);
            weights.extend((0..shifted.len()).map(|i| shifted.value(i)));
        } else {
            weights.extend((0..fitness.len()).map(|i| fitness.value(i)));
        }
    }
}

impl Proportional {
    /// Weights are the raw fitness values.
    pub fn raw() -> Self {
        Self { shift: false }
    }

    /// Weights are `f − min f + 1`.
    pub fn shifted() -> Self {
        Self { shift: true }
    }

    pub fn is_shifted(&self) -> bool {
        self.shift
    }
}

/// Roulette-wheel selection: probability proportional to fitness.
///
/// Every output index is an independent draw.
#[derive(Debug, Clone)]
pub struct FitnessProportionalSelection(WeightedSelection<Proportional>);

impl FitnessProportionalSelection {
    pub fn new() -> Self {
        Self(WeightedSelection::with_weights(Proportional::raw(), Sampling::Roulette))
    }

    /// Roulette wheel over `f − min f + 1`.
    pub fn shifted() -> Self {
        Self(WeightedSelection::with_weights(Proportional::shifted(), Sampling::Roulette))
    }

    pub fn weight_function(&self) -> &Proportional {
        self.0.weight_function()
    }
}

impl Default for FitnessProportionalSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionOperator for FitnessProportionalSelection {
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    ) {
        self.0.select(fitness, selected, rng);
    }

    fn init(&mut self, generations: usize) {
        self.0.init(generations);
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(Self(WeightedSelection::with_weights(
            *self.weight_function(),
            Sampling::Roulette,
        )))
    }
}

/// Fitness-proportional weighting sampled with equally spaced pointers.
///
/// Each index is selected either `floor(M·p)` or `ceil(M·p)` times for `M`
/// outputs.
#[derive(Debug, Clone)]
pub struct StochasticUniversalSampling(WeightedSelection<Proportional>);

impl StochasticUniversalSampling {
    pub fn new() -> Self {
        Self(WeightedSelection::with_weights(Proportional::raw(), Sampling::Universal))
    }

    /// Stochastic universal sampling over `f − min f + 1`.
    pub fn shifted() -> Self {
        Self(WeightedSelection::with_weights(Proportional::shifted(), Sampling::Universal))
    }

    pub fn weight_function(&self) -> &Proportional {
        self.0.weight_function()
    }
}

impl Default for StochasticUniversalSampling {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionOperator for StochasticUniversalSampling {
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    ) {
        self.0.select(fitness, selected, rng);
    }

    fn init(&mut self, generations: usize) {
        self.0.init(generations);
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(Self(WeightedSelection::with_weights(
            *self.weight_function(),
            Sampling::Universal,
        )))
    }
}

/// Transforms a fitness value into a non-negative selection weight.
pub trait FitnessBias: Send + Sync {
    fn bias(&self, fitness: f64) -> f64;
}

impl<F> FitnessBias for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn bias(&self, fitness: f64) -> f64 {
        self(fitness)
    }
}

/// Weighting by a caller supplied bias function.
///
/// Bias functions are stateless, so split copies share one instance.
#[derive(Clone)]
pub struct Biased {
    bias: Arc<dyn FitnessBias>,
}

impl Debug for Biased {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Biased").finish_non_exhaustive()
    }
}

impl WeightFunction for Biased {
    fn weigh(&mut self, fitness: &dyn FitnessVector, weights: &mut Vec<f64>) {
        weights.clear();
        weights.extend((0..fitness.len()).map(|i| self.bias.bias(fitness.value(i))));
    }
}

/// Fitness-proportional selection over `bias(f)`.
pub type BiasedSelection = WeightedSelection<Biased>;

impl WeightedSelection<Biased> {
    pub fn biased(bias: impl FitnessBias + 'static) -> Self {
        Self::with_weights(
            Biased {
                bias: Arc::new(bias),
            },
            Sampling::Roulette,
        )
    }
}
