//! Parent and child buffers, elitism and best-ever tracking.
//!
//! One generation moves the population through
//! [`select`](Population::select) → variation through [`Variation`] →
//! [`replace`](Population::replace). [`init`](Population::init) starts a run.

use crate::config::EaConfig;
use crate::elite::EliteSet;
use crate::error::ConfigError;
use crate::fitness::Fitness;
use crate::generation::Variation;
use crate::selection::SelectionOperator;
use crate::tracker::{ProgressTracker, SolutionCostPair};
use crate::{Candidate, FitnessFunction, Initializer, Split};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A candidate and the fitness most recently computed for it.
///
/// Members are only ever built from an evaluated candidate, so the fitness is
/// never stale or missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member<T, F> {
    pub candidate: T,
    pub fitness: F,
}

/// Best-ever fitness and the solution it belongs to.
type BestEver<T, F> = Option<(F, SolutionCostPair<T>)>;

/// Population of one evolutionary algorithm instance.
///
/// Holds MU parents and a child buffer of LAMBDA = MU − elite count slots.
/// With elitism the next parent generation is the LAMBDA children plus the
/// current elites.
pub struct Population<T, I, FF>
where
    FF: FitnessFunction<T>,
{
    parents: Vec<Member<T, FF::Fitness>>,
    children: Vec<Member<T, FF::Fitness>>,
    /// Child slots evaluated since the last `select`.
    fresh: Vec<bool>,
    selected: Vec<usize>,
    parent_fitness: Vec<FF::Fitness>,
    mu: usize,
    lambda: usize,
    elite: Option<EliteSet<T, FF::Fitness>>,
    selection: Box<dyn SelectionOperator>,
    initializer: I,
    fitness: Arc<FF>,
    tracker: Arc<ProgressTracker<T>>,
    best: BestEver<T, FF::Fitness>,
}

impl<T, I, FF> Population<T, I, FF>
where
    T: Candidate,
    I: Initializer<T>,
    FF: FitnessFunction<T>,
{
    pub fn new(
        config: &EaConfig,
        initializer: I,
        fitness: Arc<FF>,
        selection: Box<dyn SelectionOperator>,
        tracker: Arc<ProgressTracker<T>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let elite = match config.elite_count {
            0 => None,
            k => Some(EliteSet::new(k)?),
        };
        Ok(Self {
            parents: Vec::with_capacity(config.population_size),
            children: Vec::with_capacity(config.lambda()),
            fresh: Vec::with_capacity(config.lambda()),
            selected: Vec::with_capacity(config.lambda()),
            parent_fitness: Vec::with_capacity(config.population_size),
            mu: config.population_size,
            lambda: config.lambda(),
            elite,
            selection,
            initializer,
            fitness,
            tracker,
            best: None,
        })
    }

    /// Replaces the parents with MU fresh random candidates and resets the
    /// best-ever record, the elite set and the selection operator's run state.
    ///
    /// Returns the number of fitness evaluations performed.
    pub fn init<R: Rng>(&mut self, generations: usize, rng: &mut R) -> usize {
        self.selection.init(generations);

        let candidates: Vec<T> = (0..self.mu)
            .map(|_| self.initializer.create_candidate(rng))
            .collect();
        let ff = &*self.fitness;

        #[cfg(feature = "parallel")]
        let values: Vec<FF::Fitness> = candidates.par_iter().map(|c| ff.fitness(c)).collect();
        #[cfg(not(feature = "parallel"))]
        let values: Vec<FF::Fitness> = candidates.iter().map(|c| ff.fitness(c)).collect();

        self.parents.clear();
        self.parents.extend(
            candidates
                .into_iter()
                .zip(values)
                .map(|(candidate, fitness)| Member { candidate, fitness }),
        );
        self.children.clear();
        self.fresh.clear();

        self.best = None;
        if let Some(fittest) = self
            .parents
            .iter()
            .max_by(|a, b| a.fitness.fitness_cmp(&b.fitness))
        {
            offer_best(
                &mut self.best,
                ff,
                &self.tracker,
                &fittest.candidate,
                fittest.fitness,
            );
        }

        if let Some(elite) = &mut self.elite {
            elite.clear();
            for m in &self.parents {
                elite.offer(&m.candidate, m.fitness);
            }
        }

        tracing::debug!(
            population_size = self.mu,
            elites = self.elite.as_ref().map_or(0, |e| e.len()),
            "population initialized"
        );
        self.mu
    }

    /// Resets the selection operator for a continued run of `generations`
    /// without touching the parents.
    pub fn restart_selection(&mut self, generations: usize) {
        self.selection.init(generations);
    }

    /// Chooses LAMBDA parents with the selection operator and copies them into
    /// the child buffer.
    pub fn select<R: Rng>(&mut self, rng: &mut R) {
        debug_assert!(!self.parents.is_empty(), "select before init");
        self.parent_fitness.clear();
        self.parent_fitness
            .extend(self.parents.iter().map(|m| m.fitness));
        self.selected.clear();
        self.selected.resize(self.lambda, 0);
        self.selection
            .select(&self.parent_fitness, &mut self.selected, rng);

        self.children.clear();
        self.children
            .extend(self.selected.iter().map(|&i| self.parents[i].clone()));
        self.fresh.clear();
        self.fresh.resize(self.lambda, false);
    }

    /// Moves the child buffer into the parent array.
    ///
    /// With elitism the current elites are appended, then every freshly
    /// evaluated child is offered to the elite set.
    pub fn replace(&mut self) {
        let lambda = self.children.len();
        std::mem::swap(&mut self.parents, &mut self.children);
        self.children.clear();
        if let Some(elite) = &mut self.elite {
            self.parents.extend(elite.iter().map(|(candidate, fitness)| Member {
                candidate: candidate.clone(),
                fitness,
            }));
            for (m, _) in self.parents[..lambda]
                .iter()
                .zip(&self.fresh)
                .filter(|(_, fresh)| **fresh)
            {
                elite.offer(&m.candidate, m.fitness);
            }
        }
        self.fresh.clear();
    }

    /// True once a known optimum has been found or a stop was requested
    /// through the shared tracker.
    pub fn evolution_is_paused(&self) -> bool {
        self.tracker.did_find_best() || self.tracker.is_stopped()
    }

    /// Current number of parents.
    ///
    /// Under elitism this can fall below MU while the elite set is still
    /// filling, e.g. when the initial population contained duplicates.
    pub fn size(&self) -> usize {
        self.parents.len()
    }

    /// Nominal population size (MU).
    pub fn population_size(&self) -> usize {
        self.mu
    }

    pub fn lambda(&self) -> usize {
        self.lambda
    }

    pub fn is_initialized(&self) -> bool {
        !self.parents.is_empty()
    }

    pub fn parents(&self) -> &[Member<T, FF::Fitness>] {
        &self.parents
    }

    pub fn elites(&self) -> Option<&EliteSet<T, FF::Fitness>> {
        self.elite.as_ref()
    }

    /// Best solution this instance has produced since its last `init`.
    pub fn most_fit(&self) -> Option<&SolutionCostPair<T>> {
        self.best.as_ref().map(|(_, pair)| pair)
    }

    pub fn best_fitness(&self) -> Option<FF::Fitness> {
        self.best.as_ref().map(|(f, _)| *f)
    }

    pub fn tracker(&self) -> &Arc<ProgressTracker<T>> {
        &self.tracker
    }

    pub fn fitness_function(&self) -> &Arc<FF> {
        &self.fitness
    }

    pub fn selection(&self) -> &dyn SelectionOperator {
        self.selection.as_ref()
    }
}

impl<T, I, FF> Variation<T> for Population<T, I, FF>
where
    T: Candidate,
    I: Initializer<T>,
    FF: FitnessFunction<T>,
{
    fn mutable_size(&self) -> usize {
        self.children.len()
    }

    fn candidate_mut(&mut self, i: usize) -> &mut T {
        &mut self.children[i].candidate
    }

    fn candidate_pair_mut(&mut self, i: usize, j: usize) -> (&mut T, &mut T) {
        assert_ne!(i, j, "crossover needs two distinct slots");
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        let (head, tail) = self.children.split_at_mut(hi);
        let (a, b) = (&mut head[lo].candidate, &mut tail[0].candidate);
        if i < j { (a, b) } else { (b, a) }
    }

    /// Re-evaluates child slot `i` and reports it if it beats the best ever.
    fn update_fitness(&mut self, i: usize) {
        let member = &mut self.children[i];
        member.fitness = self.fitness.fitness(&member.candidate);
        self.fresh[i] = true;
        offer_best(
            &mut self.best,
            &*self.fitness,
            &self.tracker,
            &self.children[i].candidate,
            self.children[i].fitness,
        );
    }
}

impl<T, I, FF> Split for Population<T, I, FF>
where
    T: Candidate,
    I: Initializer<T>,
    FF: FitnessFunction<T>,
{
    /// Uninitialised copy with its own selection operator and initializer.
    ///
    /// The fitness function and the progress tracker are shared.
    fn split(&self) -> Self {
        Self {
            parents: Vec::with_capacity(self.mu),
            children: Vec::with_capacity(self.lambda),
            fresh: Vec::with_capacity(self.lambda),
            selected: Vec::with_capacity(self.lambda),
            parent_fitness: Vec::with_capacity(self.mu),
            mu: self.mu,
            lambda: self.lambda,
            elite: self.elite.as_ref().map(|e| {
                let mut e = e.clone();
                e.clear();
                e
            }),
            selection: self.selection.split(),
            initializer: self.initializer.split(),
            fitness: Arc::clone(&self.fitness),
            tracker: Arc::clone(&self.tracker),
            best: None,
        }
    }
}

/// Records `candidate` as the best ever when its fitness is strictly higher,
/// and forwards it to the tracker.
fn offer_best<T, FF>(
    best: &mut BestEver<T, FF::Fitness>,
    ff: &FF,
    tracker: &ProgressTracker<T>,
    candidate: &T,
    fitness: FF::Fitness,
) where
    T: Clone,
    FF: FitnessFunction<T>,
{
    if best
        .as_ref()
        .is_some_and(|(f, _)| fitness.fitness_cmp(f) != Ordering::Greater)
    {
        return;
    }
    let cost = ff.cost(candidate);
    let pair = SolutionCostPair {
        solution: candidate.clone(),
        cost,
        is_known_optimal: ff.is_minimum_cost(cost),
    };
    tracker.update(pair.clone());
    *best = Some((fitness, pair));
}
