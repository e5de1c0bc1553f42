//! Bounded set of the best distinct candidates seen so far.

use crate::error::ConfigError;
use crate::fitness::Fitness;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// Array-backed binary min-heap of at most `capacity` candidates keyed by
/// fitness.
///
/// The root is always the least fit elite, so deciding whether a newcomer
/// belongs costs one comparison and admitting it costs O(log k). A side set of
/// member candidates keeps two equal candidates from occupying separate slots;
/// unchanged survivors are offered again every generation and would otherwise
/// fill the set with copies.
#[derive(Debug, Clone)]
pub struct EliteSet<T, F> {
    heap: Vec<(T, F)>,
    members: HashSet<T>,
    capacity: usize,
}

impl<T, F> EliteSet<T, F>
where
    T: Clone + Eq + Hash,
    F: Fitness,
{
    /// Fails if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::InvalidEliteCapacity);
        }
        Ok(Self {
            heap: Vec::with_capacity(capacity),
            members: HashSet::with_capacity(capacity),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() == self.capacity
    }

    pub fn contains(&self, candidate: &T) -> bool {
        self.members.contains(candidate)
    }

    /// Fitness of the least fit elite.
    pub fn min_fitness(&self) -> Option<F> {
        self.heap.first().map(|(_, f)| *f)
    }

    /// Offers a candidate, copying it if admitted.
    ///
    /// Admitted when it is not already present and either the set has room or
    /// its fitness strictly exceeds the current minimum, which it then
    /// replaces. Returns whether the candidate was admitted.
    pub fn offer(&mut self, candidate: &T, fitness: F) -> bool {
        if self.heap.len() < self.capacity {
            if self.members.contains(candidate) {
                return false;
            }
            self.members.insert(candidate.clone());
            self.heap.push((candidate.clone(), fitness));
            self.sift_up(self.heap.len() - 1);
            return true;
        }
        if fitness.fitness_cmp(&self.heap[0].1) != Ordering::Greater
            || self.members.contains(candidate)
        {
            return false;
        }
        let (evicted, _) = std::mem::replace(&mut self.heap[0], (candidate.clone(), fitness));
        self.members.remove(&evicted);
        self.members.insert(candidate.clone());
        self.sift_down(0);
        true
    }

    /// Elites in heap order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, F)> + '_ {
        self.heap.iter().map(|(t, f)| (t, *f))
    }

    pub fn clear(&mut self) {
        self.heap.clear();
        self.members.clear();
    }

    fn less(&self, a: usize, b: usize) -> bool {
        self.heap[a].1.fitness_cmp(&self.heap[b].1) == Ordering::Less
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.heap.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && self.less(right, left) {
                right
            } else {
                left
            };
            if !self.less(child, i) {
                break;
            }
            self.heap.swap(i, child);
            i = child;
        }
    }
}
