//! Wrappers that transform fitness before delegating to another operator.

use super::SelectionOperator;
use crate::error::ConfigError;
use crate::fitness::{Adjusted, FitnessVector};
use rand::RngCore;
use tracing::instrument;

/// Shifts fitness to `f − min f + 1` before delegating.
///
/// Makes proportional operators safe for fitness of any sign.
#[derive(Debug)]
pub struct FitnessShifter {
    inner: Box<dyn SelectionOperator>,
}

impl FitnessShifter {
    pub fn new(inner: impl SelectionOperator + 'static) -> Self {
        Self {
            inner: Box::new(inner),
        }
    }
}

impl SelectionOperator for FitnessShifter {
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    ) {
        if selected.is_empty() {
            return;
        }
        let shifted = Adjusted::shifted(fitness);
        self.inner.select(&shifted, selected, rng);
    }

    fn init(&mut self, generations: usize) {
        self.inner.init(generations);
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(Self {
            inner: self.inner.split(),
        })
    }
}

/// Sigma scaling: `f' = f − (mean − c·σ)`, floored at a small positive value.
///
/// Keeps selection pressure roughly constant as the population converges.
/// With zero variance every individual gets the same weight.
#[derive(Debug)]
pub struct SigmaScaling {
    inner: Box<dyn SelectionOperator>,
    c: f64,
}

impl SigmaScaling {
    pub const DEFAULT_SCALE: f64 = 2.0;
    /// Smallest scaled fitness handed to the inner operator.
    pub const FLOOR: f64 = 1.0e-4;

    /// Wraps `inner` with the conventional scale factor of 2.
    pub fn new(inner: impl SelectionOperator + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            c: Self::DEFAULT_SCALE,
        }
    }

    /// Fails unless `c` is positive and finite.
    #[instrument(level = "debug", skip(inner))]
    pub fn with_scale(
        inner: impl SelectionOperator + 'static,
        c: f64,
    ) -> Result<Self, ConfigError> {
        if !(c > 0.0 && c.is_finite()) {
            return Err(ConfigError::invalid_parameter(
                "sigma scaling factor",
                c,
                "positive and finite",
            ));
        }
        Ok(Self {
            inner: Box::new(inner),
            c,
        })
    }

    pub fn scale(&self) -> f64 {
        self.c
    }
}

impl SelectionOperator for SigmaScaling {
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    ) {
        if selected.is_empty() {
            return;
        }
        let (mean, sd) = mean_and_sd(fitness);
        let scaled = Adjusted::offset(fitness, self.c * sd - mean, Some(Self::FLOOR));
        self.inner.select(&scaled, selected, rng);
    }

    fn init(&mut self, generations: usize) {
        self.inner.init(generations);
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(Self {
            inner: self.inner.split(),
            c: self.c,
        })
    }
}

/// Population mean and standard deviation.
fn mean_and_sd(fitness: &dyn FitnessVector) -> (f64, f64) {
    let n = fitness.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = (0..n).map(|i| fitness.value(i)).sum::<f64>() / n as f64;
    let var = (0..n)
        .map(|i| {
            let d = fitness.value(i) - mean;
            d * d
        })
        .sum::<f64>()
        / n as f64;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_statistics() {
        let fitness = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let (mean, sd) = mean_and_sd(&fitness);
        assert_eq!(mean, 5.0);
        assert_eq!(sd, 2.0);
    }
}
