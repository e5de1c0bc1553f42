use super::SelectionOperator;
use crate::fitness::FitnessVector;
use rand::{Rng, RngCore};

/// Uniform selection that ignores fitness.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelection;

impl RandomSelection {
    pub fn new() -> Self {
        Self
    }
}

impl SelectionOperator for RandomSelection {
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
            *s = rng.random_range(0..n);
        }
    }

    fn split(&self) -> Box<dyn SelectionOperator> {
        Box::new(*self)
    }
}
