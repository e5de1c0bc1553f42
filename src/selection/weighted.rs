//! Cumulative-weight sampling shared by every weighted operator.
//!
//! A weighted operator is a [`WeightFunction`] (fitness → per-individual weight)
//! combined with a [`Sampling`] mode that turns the normalised running sum of
//! those weights into output indices.

use super::SelectionOperator;
use crate::fitness::FitnessVector;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Maps a fitness vector to non-negative selection weights.
pub trait WeightFunction: Clone + Debug + Send + 'static {
    /// Overwrites `weights` with one unnormalised weight per individual.
    fn weigh(&mut self, fitness: &dyn FitnessVector, weights: &mut Vec<f64>);

    /// Resets per-run state.
    fn init(&mut self, _generations: usize) {}
}

/// How output indices are drawn from the running sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sampling {
    /// One uniform draw and a binary search per output index.
    #[default]
    Roulette,
    /// One uniform offset and equally spaced pointers, then a shuffle.
    Universal,
}

/// A [`WeightFunction`] paired with a [`Sampling`] mode.
#[derive(Debug, Clone)]
pub struct WeightedSelection<W> {
    weights: W,
    sampling: Sampling,
    running: Vec<f64>,
}

impl<W: WeightFunction> WeightedSelection<W> {
    pub fn with_weights(weights: W, sampling: Sampling) -> Self {
        Self {
            weights,
            sampling,
            running: Vec::new(),
        }
    }

    /// Switches to stochastic universal sampling.
    pub fn universal(mut self) -> Self {
        self.sampling = Sampling::Universal;
        self
    }

    pub fn sampling(&self) -> Sampling {
        self.sampling
    }

    pub fn weight_function(&self) -> &W {
        &self.weights
    }
}

impl<W: WeightFunction> SelectionOperator for WeightedSelection<W> {
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    ) {
        if selected.is_empty() {
            return;
        }
        debug_assert!(!fitness.is_empty(), "selection from an empty population");
        self.weights.weigh(fitness, &mut self.running);
        normalize_running_sum(&mut self.running);
        match self.sampling {
            Sampling::Roulette => roulette(&self.running, selected, rng),
            Sampling::Universal => universal(&self.running, selected, rng),
        }
    }

    fn init(&mut self, generations: usize) {
        self.weights.init(generations);
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(Self::with_weights(self.weights.clone(), self.sampling))
    }
}

/// Turns raw weights into a running sum whose last entry is exactly 1.
///
/// Falls back to uniform weights when the total is not a positive finite
/// number.
pub(crate) fn normalize_running_sum(weights: &mut [f64]) {
    let n = weights.len();
    if n == 0 {
        return;
    }
    let mut total = 0.0;
    for w in weights.iter_mut() {
        debug_assert!(*w >= 0.0 || w.is_nan(), "negative selection weight {w}");
        total += *w;
        *w = total;
    }
    if !(total > 0.0 && total.is_finite()) {
        tracing::warn!(total, "degenerate selection weights, falling back to uniform");
        for (i, w) in weights.iter_mut().enumerate() {
            *w = (i + 1) as f64 / n as f64;
        }
        return;
    }
    for w in weights.iter_mut() {
        *w /= total;
    }
    weights[n - 1] = 1.0;
}

/// Index of the bucket containing `u`: the first entry strictly greater.
#[inline]
fn bucket(running: &[f64], u: f64) -> usize {
    running
        .partition_point(|&c| c <= u)
        .min(running.len() - 1)
}

/// Independent draws, each located by binary search.
pub(crate) fn roulette(running: &[f64], selected: &mut [usize], rng: &mut dyn RngCore) {
    for s in selected.iter_mut() {
        let u: f64 = rng.random();
        *s = bucket(running, u);
    }
}

/// Stochastic universal sampling.
///
/// Pointers `(u + j) / M` for one uniform `u` walk the running sum once. The
/// walk emits equal indices in runs, so the result is shuffled.
pub(crate) fn universal(running: &[f64], selected: &mut [usize], rng: &mut dyn RngCore) {
    let m = selected.len() as f64;
    let last = running.len() - 1;
    let u: f64 = rng.random();
    let mut i = 0;
    for (j, s) in selected.iter_mut().enumerate() {
        let pointer = (u + j as f64) / m;
        while i < last && running[i] <= pointer {
            i += 1;
        }
        *s = i;
    }
    selected.shuffle(rng);
}
