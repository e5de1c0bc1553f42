//! Thread-safe record of the best solution found across cooperating runs.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};

/// A solution paired with its cost under the minimisation problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionCostPair<T> {
    pub solution: T,
    pub cost: f64,
    /// True when `cost` is the known theoretical minimum.
    pub is_known_optimal: bool,
}

/// Shared sink for progress across split copies of an algorithm.
///
/// Wrap it in an `Arc` and hand the same instance to every copy. Finding a
/// known optimum in one copy pauses all of them.
#[derive(Debug)]
pub struct ProgressTracker<T> {
    best: Mutex<Option<SolutionCostPair<T>>>,
    found_best: AtomicBool,
    stopped: AtomicBool,
}

impl<T> Default for ProgressTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProgressTracker<T> {
    pub fn new() -> Self {
        Self {
            best: Mutex::new(None),
            found_best: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Records `pair` if its cost is strictly lower than the best so far.
    ///
    /// Returns whether the pair was accepted.
    pub fn update(&self, pair: SolutionCostPair<T>) -> bool {
        let mut best = self.best.lock();
        if best.as_ref().is_some_and(|b| b.cost <= pair.cost) {
            return false;
        }
        if pair.is_known_optimal {
            self.found_best.store(true, Ordering::Release);
        }
        tracing::info!(cost = pair.cost, optimal = pair.is_known_optimal, "new best solution");
        *best = Some(pair);
        true
    }

    /// Cost of the best solution so far, or infinity when none exists.
    pub fn cost(&self) -> f64 {
        self.best.lock().as_ref().map_or(f64::INFINITY, |b| b.cost)
    }

    pub fn did_find_best(&self) -> bool {
        self.found_best.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Asks every algorithm sharing this tracker to stop at its next
    /// generation boundary.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Clears a previous [`stop`](Self::stop) request.
    pub fn start(&self) {
        self.stopped.store(false, Ordering::Release);
    }
}

impl<T: Clone> ProgressTracker<T> {
    pub fn best(&self) -> Option<SolutionCostPair<T>> {
        self.best.lock().clone()
    }
}
