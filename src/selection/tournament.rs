use super::SelectionOperator;
use crate::error::ConfigError;
use crate::fitness::FitnessVector;
use rand::{Rng, RngCore};
use std::cmp::Ordering;
use tracing::instrument;

/// Best of `k` uniform draws, with replacement.
///
/// Only relative comparisons are used, so any fitness sign works. Ties go to
/// the earliest draw. Larger `k` means stronger selection pressure.
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelection {
    size: usize,
}

impl TournamentSelection {
    /// Fails if `size` is zero.
    #[instrument(level = "debug")]
    pub fn new(size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::InvalidTournamentSize);
        }
        Ok(Self { size })
    }

    /// Binary tournament.
    pub fn binary() -> Self {
        Self { size: 2 }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl SelectionOperator for TournamentSelection {
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
        for s in selected.iter_mut() {
            let mut winner = rng.random_range(0..n);
            for _ in 1..self.size {
                let challenger = rng.random_range(0..n);
                if fitness.compare(challenger, winner) == Ordering::Greater {
                    winner = challenger;
                }
            }
            *s = winner;
        }
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(*self)
    }
}
