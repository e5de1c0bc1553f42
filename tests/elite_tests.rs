//! Invariants of the bounded elite set.

use genpop::elite::EliteSet;
use rand::Rng;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;
use std::collections::HashSet;

/// Fitness as a fixed function of the candidate, distinct for ids below 101.
fn fitness_of(id: u32) -> i64 {
    (id as i64 * 37) % 101
}

#[test]
fn test_elite_set_holds_the_top_k_distinct_candidates() {
    let mut rng = Pcg64::seed_from_u64(42);
    for k in [1, 3, 10] {
        let mut elite = EliteSet::<u32, i64>::new(k).unwrap();
        let mut offered = HashSet::new();
        for _ in 0..500 {
            let id = rng.random_range(0..101);
            elite.offer(&id, fitness_of(id));
            offered.insert(id);

            assert!(elite.len() <= k);
            let mut expected: Vec<i64> = offered.iter().map(|&id| fitness_of(id)).collect();
            expected.sort_unstable_by(|a, b| b.cmp(a));
            expected.truncate(k);
            let mut held: Vec<i64> = elite.iter().map(|(_, f)| f).collect();
            held.sort_unstable_by(|a, b| b.cmp(a));
            assert_eq!(held, expected);
        }
    }
}

#[test]
fn test_elite_set_never_holds_duplicates() {
    let mut elite = EliteSet::<Vec<u8>, f64>::new(4).unwrap();
    assert!(elite.offer(&vec![1], 1.0));
    assert!(!elite.offer(&vec![1], 1.0));
    assert!(elite.offer(&vec![2], 2.0));
    assert!(!elite.offer(&vec![2], 5.0));
    assert_eq!(elite.len(), 2);

    let members: HashSet<&Vec<u8>> = elite.iter().map(|(c, _)| c).collect();
    assert_eq!(members.len(), elite.len());
}

#[test]
fn test_full_elite_set_rejects_ties_with_the_minimum() {
    let mut elite = EliteSet::<u32, f64>::new(2).unwrap();
    elite.offer(&1, 1.0);
    elite.offer(&2, 2.0);
    assert!(elite.is_full());
    assert_eq!(elite.min_fitness(), Some(1.0));

    assert!(!elite.offer(&3, 1.0));
    assert!(!elite.contains(&3));

    assert!(elite.offer(&4, 1.5));
    assert!(!elite.contains(&1));
    assert!(elite.contains(&4));
    assert_eq!(elite.min_fitness(), Some(1.5));
}

#[test]
fn test_evicted_candidate_can_return() {
    let mut elite = EliteSet::<u32, i64>::new(1).unwrap();
    elite.offer(&7, 3);
    elite.offer(&8, 4);
    assert!(!elite.contains(&7));
    elite.clear();
    assert!(elite.is_empty());
    assert!(elite.offer(&7, 3));
    assert!(elite.contains(&7));
}
