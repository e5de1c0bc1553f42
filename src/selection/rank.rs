//! Rank-based weighting.
//!
//! Individuals are ranked by ascending fitness with a stable sort, so equal
//! fitness keeps population order. Rank 0 is the least fit. The weight depends
//! on the rank only, which makes these operators indifferent to the sign and
//! scale of fitness.

use super::weighted::{Sampling, WeightFunction, WeightedSelection};
use crate::error::ConfigError;
use crate::fitness::FitnessVector;
use tracing::instrument;

/// Fills `order` with population indices sorted by ascending fitness.
fn rank_order(fitness: &dyn FitnessVector, order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..fitness.len());
    order.sort_by(|&a, &b| fitness.compare(a, b));
}

/// Linear ranking: `w(r) = 2 − c + 2·r·(c − 1)/(N − 1)` for `c` in `[1, 2]`.
///
/// `c` is the expected number of copies of the best individual; `c = 1` is
/// uniform.
#[derive(Debug, Clone)]
pub struct LinearRank {
    c: f64,
    order: Vec<usize>,
}

impl LinearRank {
    pub fn pressure(&self) -> f64 {
        self.c
    }
}

impl WeightFunction for LinearRank {
    fn weigh(&mut self, fitness: &dyn FitnessVector, weights: &mut Vec<f64>) {
        let n = fitness.len();
        weights.clear();
        weights.resize(n, 1.0);
        if n < 2 {
            return;
        }
        rank_order(fitness, &mut self.order);
        let base = 2.0 - self.c;
        let step = 2.0 * (self.c - 1.0) / (n - 1) as f64;
        for (r, &i) in self.order.iter().enumerate() {
            weights[i] = base + step * r as f64;
        }
    }
}

/// Exponential ranking: `w(r) = c^(N − 1 − r)` for `c` in `(0, 1)`.
#[derive(Debug, Clone)]
pub struct ExponentialRank {
    c: f64,
    order: Vec<usize>,
}

impl ExponentialRank {
    pub fn base(&self) -> f64 {
        self.c
    }
}

impl WeightFunction for ExponentialRank {
    fn weigh(&mut self, fitness: &dyn FitnessVector, weights: &mut Vec<f64>) {
        let n = fitness.len();
        weights.clear();
        weights.resize(n, 1.0);
        if n < 2 {
            return;
        }
        rank_order(fitness, &mut self.order);
        // Walk from the best (weight 1) down, multiplying by c each rank.
        let mut w = 1.0;
        for &i in self.order.iter().rev() {
            weights[i] = w;
            w *= self.c;
        }
    }
}

pub type LinearRankSelection = WeightedSelection<LinearRank>;

pub type ExponentialRankSelection = WeightedSelection<ExponentialRank>;

impl WeightedSelection<LinearRank> {
    /// Fails unless `1 ≤ c ≤ 2`.
    #[instrument(level = "debug")]
    pub fn linear_rank(c: f64) -> Result<Self, ConfigError> {
        if !(1.0..=2.0).contains(&c) {
            return Err(ConfigError::invalid_parameter(
                "linear rank pressure",
                c,
                "in [1, 2]",
            ));
        }
        Ok(Self::with_weights(
            LinearRank {
                c,
                order: Vec::new(),
            },
            Sampling::Roulette,
        ))
    }
}

impl WeightedSelection<ExponentialRank> {
    /// Fails unless `0 < c < 1`.
    #[instrument(level = "debug")]
    pub fn exponential_rank(c: f64) -> Result<Self, ConfigError> {
        if !(c > 0.0 && c < 1.0) {
            return Err(ConfigError::invalid_parameter(
                "exponential rank base",
                c,
                "in (0, 1)",
            ));
        }
        Ok(Self::with_weights(
            ExponentialRank {
                c,
                order: Vec::new(),
            },
            Sampling::Roulette,
        ))
    }
}
