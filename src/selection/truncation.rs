use super::SelectionOperator;
use crate::error::ConfigError;
use crate::fitness::FitnessVector;
use rand::{Rng, RngCore};
use std::cmp::Ordering;
use tracing::instrument;

/// Uniform selection among the `k` fittest individuals.
///
/// The top `k` are found with a randomised three-way quickselect in expected
/// O(N), without sorting. When several individuals tie at the boundary, just
/// enough of them are admitted to make the set exactly `k` (or the population
/// size, if smaller).
#[derive(Debug, Clone)]
pub struct TruncationSelection {
    k: usize,
    order: Vec<usize>,
}

impl TruncationSelection {
    /// Fails if `k` is zero.
    #[instrument(level = "debug")]
    pub fn new(k: usize) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::InvalidTruncationSize);
        }
        Ok(Self {
            k,
            order: Vec::new(),
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl SelectionOperator for TruncationSelection {
    fn select(
        &mut self,
        fitness: &dyn FitnessVector,
        selected: &mut [usize],
        rng: &mut dyn RngCore,
    ) {
        if selected.is_empty() {
            return;
        }
        let n = fitness.len();
        debug_assert!(n > 0, "selection from an empty population");
        let k = self.k.min(n);
        self.order.clear();
        self.order.extend(0..n);
        if k < n {
            partition_top_k(fitness, &mut self.order, k, rng);
        }
        let top = &self.order[..k];
        for s in selected.iter_mut() {
            *s = top[rng.random_range(0..k)];
        }
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(Self {
            k: self.k,
            order: Vec::new(),
        })
    }
}

/// Rearranges `order` so its first `k` entries index the `k` fittest
/// individuals, in no particular order.
fn partition_top_k(
    fitness: &dyn FitnessVector,
    order: &mut [usize],
    k: usize,
    rng: &mut dyn RngCore,
) {
    let mut lo = 0;
    let mut hi = order.len();
    while hi - lo > 1 {
        let pivot = median_of_three(fitness, order, lo, hi, rng);
        // [lo, gt) fitter than pivot, [gt, lt) tied with it, [lt, hi) less fit
        let mut gt = lo;
        let mut i = lo;
        let mut lt = hi;
        while i < lt {
            match fitness.compare(order[i], pivot) {
                Ordering::Greater => {
                    order.swap(gt, i);
                    gt += 1;
                    i += 1;
                }
                Ordering::Less => {
                    lt -= 1;
                    order.swap(i, lt);
                }
                Ordering::Equal => i += 1,
            }
        }
        if k < gt {
            hi = gt;
        } else if k <= lt {
            return;
        } else {
            lo = lt;
        }
    }
}

/// Individual with the median fitness among three random positions of
/// `order[lo..hi]`.
fn median_of_three(
    fitness: &dyn FitnessVector,
    order: &[usize],
    lo: usize,
    hi: usize,
    rng: &mut dyn RngCore,
) -> usize {
    let a = order[rng.random_range(lo..hi)];
    let b = order[rng.random_range(lo..hi)];
    let c = order[rng.random_range(lo..hi)];
    let (mut x, mut y, mut z) = (a, b, c);
    if fitness.compare(x, y) == Ordering::Greater {
        std::mem::swap(&mut x, &mut y);
    }
    if fitness.compare(y, z) == Ordering::Greater {
        std::mem::swap(&mut y, &mut z);
    }
    if fitness.compare(x, y) == Ordering::Greater {
        std::mem::swap(&mut x, &mut y);
    }
    y
}
