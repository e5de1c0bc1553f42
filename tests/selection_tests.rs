//! Behavioural tests for the selection operators.

use genpop::SelectionOperator;
use genpop::selection::{
    BiasedSelection, BoltzmannSelection, CoolingSchedule, ExponentialRankSelection,
    FitnessProportionalSelection, FitnessShifter, LinearRankSelection, RandomSelection,
    SigmaScaling, StochasticUniversalSampling, TournamentSelection, TruncationSelection,
};
use rand::RngCore;
use rand::prelude::SeedableRng;
use rand_pcg::Pcg64;

/// Replays a fixed list of uniform draws in `[0, 1)`, cycling when exhausted.
struct FixedDraws {
    words: Vec<u64>,
    next: usize,
}

impl FixedDraws {
    fn new(draws: &[f64]) -> Self {
        // f64 sampling keeps the top 53 bits of a u64
        let words = draws
            .iter()
            .map(|&u| ((u * (1u64 << 53) as f64) as u64) << 11)
            .collect();
        Self { words, next: 0 }
    }
}

impl RngCore for FixedDraws {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let word = self.words[self.next % self.words.len()];
        self.next += 1;
        word
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

fn all_operators() -> Vec<Box<dyn SelectionOperator>> {
    vec![
        Box::new(FitnessProportionalSelection::new()),
        Box::new(StochasticUniversalSampling::new()),
        Box::new(FitnessProportionalSelection::shifted()),
        Box::new(StochasticUniversalSampling::shifted()),
        Box::new(LinearRankSelection::linear_rank(1.5).unwrap()),
        Box::new(LinearRankSelection::linear_rank(2.0).unwrap().universal()),
        Box::new(ExponentialRankSelection::exponential_rank(0.9).unwrap()),
        Box::new(BoltzmannSelection::boltzmann(
            CoolingSchedule::exponential(10.0, 0.9, 0.1).unwrap(),
        )),
        Box::new(BiasedSelection::biased(|f: f64| f * f)),
        Box::new(TournamentSelection::binary()),
        Box::new(TournamentSelection::new(5).unwrap()),
        Box::new(TruncationSelection::new(3).unwrap()),
        Box::new(RandomSelection::new()),
        Box::new(FitnessShifter::new(FitnessProportionalSelection::new())),
        Box::new(SigmaScaling::new(StochasticUniversalSampling::new())),
    ]
}

fn counts(selected: &[usize], n: usize) -> Vec<usize> {
    let mut counts = vec![0; n];
    for &i in selected {
        counts[i] += 1;
    }
    counts
}

// ============================================================================
// Output shape
// ============================================================================

#[test]
fn test_every_operator_fills_output_with_valid_indices() {
    let fitness = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
    let mut rng = Pcg64::seed_from_u64(42);
    for mut op in all_operators() {
        op.init(10);
        for m in [1, 7, 8, 50] {
            let mut selected = vec![usize::MAX; m];
            op.select(&fitness, &mut selected, &mut rng);
            assert!(
                selected.iter().all(|&i| i < fitness.len()),
                "{op:?} produced an out-of-range index: {selected:?}"
            );
        }
    }
}

#[test]
fn test_empty_output_is_a_no_op() {
    let fitness = vec![1.0, 2.0, 3.0];
    let mut rng = Pcg64::seed_from_u64(1);
    for mut op in all_operators() {
        let mut selected: Vec<usize> = Vec::new();
        op.select(&fitness, &mut selected, &mut rng);
        assert!(selected.is_empty());
    }
}

#[test]
fn test_single_individual_is_always_selected() {
    let fitness = vec![7.0];
    let mut rng = Pcg64::seed_from_u64(5);
    for mut op in all_operators() {
        let mut selected = vec![usize::MAX; 4];
        op.select(&fitness, &mut selected, &mut rng);
        assert_eq!(selected, vec![0; 4], "{op:?}");
    }
}

#[test]
fn test_integer_fitness_is_accepted() {
    let fitness: Vec<i64> = vec![10, 20, 30, 40];
    let mut rng = Pcg64::seed_from_u64(9);
    for mut op in all_operators() {
        let mut selected = vec![usize::MAX; 16];
        op.select(&fitness, &mut selected, &mut rng);
        assert!(selected.iter().all(|&i| i < 4), "{op:?}");
    }
}

// ============================================================================
// Fixed draws
// ============================================================================

#[test]
fn test_roulette_draws_land_in_the_first_bucket_exceeding_them() {
    // Running sum [0.1, 0.3, 0.6, 1.0]
    let fitness = vec![1.0, 2.0, 3.0, 4.0];
    let mut op = FitnessProportionalSelection::new();

    let mut rng = FixedDraws::new(&[0.05, 0.25, 0.55, 0.95]);
    let mut selected = vec![0; 4];
    op.select(&fitness, &mut selected, &mut rng);
    assert_eq!(selected, vec![0, 1, 2, 3]);

    let mut rng = FixedDraws::new(&[0.05, 0.35, 0.65, 0.95]);
    let mut selected = vec![0; 4];
    op.select(&fitness, &mut selected, &mut rng);
    assert_eq!(selected, vec![0, 2, 3, 3]);
}

#[test]
fn test_zero_weight_individuals_are_never_drawn() {
    let fitness = vec![0.0, 1.0, 0.0, 1.0];
    let mut op = FitnessProportionalSelection::new();
    let mut rng = FixedDraws::new(&[0.0, 0.4999, 0.5, 0.9999]);
    let mut selected = vec![0; 4];
    op.select(&fitness, &mut selected, &mut rng);
    assert_eq!(selected, vec![1, 1, 3, 3]);
}

// ============================================================================
// Distribution
// ============================================================================

#[test]
fn test_sus_selects_each_equal_individual_exactly_once() {
    let n = 10;
    let fitness = vec![1.0; n];
    let mut op = StochasticUniversalSampling::new();
    let mut rng = Pcg64::seed_from_u64(11);
    for _ in 0..100 {
        let mut selected = vec![0; n];
        op.select(&fitness, &mut selected, &mut rng);
        assert_eq!(counts(&selected, n), vec![1; n]);
    }
}

#[test]
fn test_sus_counts_stay_within_one_of_expectation() {
    // Expected copies: 8 * [0.1, 0.2, 0.3, 0.4] = [0.8, 1.6, 2.4, 3.2]
    let fitness = vec![1.0, 2.0, 3.0, 4.0];
    let mut op = StochasticUniversalSampling::new();
    let mut rng = Pcg64::seed_from_u64(12);
    for _ in 0..200 {
        let mut selected = vec![0; 8];
        op.select(&fitness, &mut selected, &mut rng);
        let c = counts(&selected, 4);
        for (i, expected) in [0.8_f64, 1.6, 2.4, 3.2].iter().enumerate() {
            let got = c[i] as f64;
            assert!(
                got >= expected.floor() && got <= expected.ceil(),
                "index {i} selected {got} times, expected about {expected}"
            );
        }
    }
}

#[test]
fn test_sus_output_is_shuffled() {
    let fitness = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
    let mut op = StochasticUniversalSampling::new();
    let mut rng = Pcg64::seed_from_u64(13);
    let sorted: Vec<usize> = (0..8).collect();
    let mut saw_unsorted = false;
    for _ in 0..20 {
        let mut selected = vec![0; 8];
        op.select(&fitness, &mut selected, &mut rng);
        saw_unsorted |= selected != sorted;
    }
    assert!(saw_unsorted, "SUS output was never permuted");
}

#[test]
fn test_roulette_and_sus_sample_differently() {
    let n = 10;
    let fitness = vec![1.0; n];
    let mut rng = Pcg64::seed_from_u64(26);
    let mut roulette = FitnessProportionalSelection::new();
    let mut sus = StochasticUniversalSampling::new().split();
    let mut roulette_repeated = false;
    for _ in 0..50 {
        let mut selected = vec![0; n];
        sus.select(&fitness, &mut selected, &mut rng);
        assert_eq!(counts(&selected, n), vec![1; n]);
        roulette.select(&fitness, &mut selected, &mut rng);
        roulette_repeated |= counts(&selected, n) != vec![1; n];
    }
    assert!(roulette_repeated, "roulette never drew an index twice");
}

#[test]
fn test_shifted_constructors_shift_weights() {
    let roulette = FitnessProportionalSelection::new();
    let sus = StochasticUniversalSampling::new();
    assert!(!roulette.weight_function().is_shifted());
    assert!(!sus.weight_function().is_shifted());

    let roulette = FitnessProportionalSelection::shifted();
    let sus = StochasticUniversalSampling::shifted();
    assert!(roulette.weight_function().is_shifted());
    assert!(sus.weight_function().is_shifted());
}

#[test]
fn test_proportional_selection_tracks_fitness_ratio() {
    let fitness = vec![2.0, 1.0];
    let mut rng = Pcg64::seed_from_u64(14);
    let operators: [Box<dyn SelectionOperator>; 2] = [
        Box::new(FitnessProportionalSelection::new()),
        Box::new(StochasticUniversalSampling::new()),
    ];
    for mut op in operators {
        let mut selected = vec![0; 60_000];
        op.select(&fitness, &mut selected, &mut rng);
        let c = counts(&selected, 2);
        let ratio = c[0] as f64 / c[1] as f64;
        assert!((1.9..2.1).contains(&ratio), "ratio {ratio} for {op:?}");
    }
}

#[test]
fn test_unshifted_proportional_with_all_zero_fitness_is_uniform() {
    let fitness = vec![0.0; 4];
    let mut op = FitnessProportionalSelection::new();
    let mut rng = Pcg64::seed_from_u64(15);
    let mut selected = vec![0; 40_000];
    op.select(&fitness, &mut selected, &mut rng);
    for c in counts(&selected, 4) {
        assert!((9_000..11_000).contains(&c), "count {c}");
    }
}

#[test]
fn test_shifted_proportional_handles_negative_fitness() {
    // Shift by 1 - min gives weights [1, 101, 201]
    let fitness = vec![-200.0, -100.0, 0.0];
    let mut op = FitnessProportionalSelection::shifted();
    let mut rng = Pcg64::seed_from_u64(16);
    let mut selected = vec![0; 30_300];
    op.select(&fitness, &mut selected, &mut rng);
    let c = counts(&selected, 3);
    assert!(c[0] < 300, "worst selected {} times", c[0]);
    assert!(c[2] > c[1]);
}

#[test]
fn test_linear_rank_pressure_two_never_picks_the_worst() {
    let fitness = vec![5.0, -100.0, 3.0, 8.0];
    let mut op = LinearRankSelection::linear_rank(2.0).unwrap();
    let mut rng = Pcg64::seed_from_u64(17);
    let mut selected = vec![0; 5_000];
    op.select(&fitness, &mut selected, &mut rng);
    assert_eq!(counts(&selected, 4)[1], 0);
}

#[test]
fn test_biased_selection_applies_bias_to_fitness() {
    // Bias 0 for everything but the last individual
    let fitness = vec![1.0, 2.0, 3.0];
    let mut op = BiasedSelection::biased(|f: f64| if f > 2.5 { 1.0 } else { 0.0 });
    let mut rng = Pcg64::seed_from_u64(18);
    let mut selected = vec![0; 100];
    op.select(&fitness, &mut selected, &mut rng);
    assert!(selected.iter().all(|&i| i == 2));
}

#[test]
fn test_truncation_one_always_picks_the_unique_maximum() {
    let fitness = vec![0.3, 0.9, 0.1, 0.95, 0.2, -4.0, 0.94];
    let mut op = TruncationSelection::new(1).unwrap();
    let mut rng = Pcg64::seed_from_u64(19);
    for m in [1, 5, 100] {
        let mut selected = vec![0; m];
        op.select(&fitness, &mut selected, &mut rng);
        assert!(selected.iter().all(|&i| i == 3), "{selected:?}");
    }
}

#[test]
fn test_truncation_only_picks_from_the_top_k() {
    let fitness: Vec<i64> = vec![4, 8, 1, 7, 3, 9, 2, 6, 5, 0];
    let mut op = TruncationSelection::new(3).unwrap();
    let mut rng = Pcg64::seed_from_u64(20);
    let mut selected = vec![0; 3_000];
    op.select(&fitness, &mut selected, &mut rng);
    let c = counts(&selected, fitness.len());
    for (i, &count) in c.iter().enumerate() {
        if [1, 3, 5].contains(&i) {
            assert!(count > 800, "top individual {i} selected {count} times");
        } else {
            assert_eq!(count, 0, "individual {i} is outside the top 3");
        }
    }
}

#[test]
fn test_truncation_larger_than_population_is_uniform() {
    let fitness = vec![1.0, 2.0, 3.0];
    let mut op = TruncationSelection::new(10).unwrap();
    let mut rng = Pcg64::seed_from_u64(21);
    let mut selected = vec![0; 3_000];
    op.select(&fitness, &mut selected, &mut rng);
    assert!(counts(&selected, 3).iter().all(|&c| c > 800));
}

#[test]
fn test_tournament_pressure_grows_with_size() {
    let fitness: Vec<f64> = (0..10).map(|i| i as f64).collect();
    let mut rng = Pcg64::seed_from_u64(22);
    let mut previous = 0;
    for k in [1, 2, 4, 8] {
        let mut op = TournamentSelection::new(k).unwrap();
        let mut selected = vec![0; 20_000];
        op.select(&fitness, &mut selected, &mut rng);
        let best = counts(&selected, 10)[9];
        assert!(best > previous, "k={k}: best selected {best} times, previously {previous}");
        previous = best;
    }
}

#[test]
fn test_boltzmann_sharpens_as_it_cools() {
    let fitness = vec![0.0, 1.0];
    let schedule = CoolingSchedule::exponential(10.0, 0.5, 0.05).unwrap();
    let mut op = BoltzmannSelection::boltzmann(schedule);
    op.init(100);
    let mut rng = Pcg64::seed_from_u64(23);

    let mut selected = vec![0; 10_000];
    op.select(&fitness, &mut selected, &mut rng);
    let hot = counts(&selected, 2)[1];

    for _ in 0..20 {
        op.select(&fitness, &mut selected, &mut rng);
    }
    let cold = counts(&selected, 2)[1];
    assert!(hot < 6_000, "hot {hot}");
    assert!(cold > 9_900, "cold {cold}");
}

#[test]
fn test_sigma_scaling_with_identical_fitness_is_uniform() {
    let fitness = vec![3.0; 4];
    let mut op = SigmaScaling::new(FitnessProportionalSelection::new());
    let mut rng = Pcg64::seed_from_u64(24);
    let mut selected = vec![0; 40_000];
    op.select(&fitness, &mut selected, &mut rng);
    for c in counts(&selected, 4) {
        assert!((9_000..11_000).contains(&c), "count {c}");
    }
}

// ============================================================================
// Run state and split
// ============================================================================

#[test]
fn test_boltzmann_init_restores_initial_temperature() {
    let schedule = CoolingSchedule::linear(5.0, 1.0, 0.5).unwrap();
    let mut op = BoltzmannSelection::boltzmann(schedule);
    op.init(10);
    assert_eq!(op.temperature(), 5.0);

    let fitness = vec![1.0, 2.0];
    let mut rng = Pcg64::seed_from_u64(25);
    let mut selected = vec![0; 2];
    for _ in 0..10 {
        op.select(&fitness, &mut selected, &mut rng);
    }
    assert_eq!(op.temperature(), 0.5);

    op.init(10);
    assert_eq!(op.temperature(), 5.0);
}

#[test]
fn test_split_copies_do_not_touch_the_original() {
    let schedule = CoolingSchedule::exponential(8.0, 0.5, 0.01).unwrap();
    let mut original = BoltzmannSelection::boltzmann(schedule);
    original.init(50);
    let before = original.temperature();

    let fitness = vec![1.0, 5.0, 2.0, 4.0];
    let mut copies = [original.split(), original.split()];
    for (seed, copy) in copies.iter_mut().enumerate() {
        let mut rng = Pcg64::seed_from_u64(seed as u64);
        let mut selected = vec![0; 16];
        for _ in 0..10 {
            copy.select(&fitness, &mut selected, &mut rng);
        }
    }
    assert_eq!(original.temperature(), before);
}

#[test]
fn test_split_copies_run_on_separate_threads() {
    let mut original: Box<dyn SelectionOperator> =
        Box::new(LinearRankSelection::linear_rank(1.8).unwrap());
    original.init(10);
    let fitness: Vec<f64> = (0..32).map(|i| i as f64).collect();

    let results: Vec<Vec<usize>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|seed| {
                let mut op = original.split();
                let fitness = &fitness;
                s.spawn(move || {
                    let mut rng = Pcg64::seed_from_u64(seed);
                    let mut selected = vec![0; 64];
                    op.select(fitness, &mut selected, &mut rng);
                    selected
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for selected in &results {
        assert_eq!(selected.len(), 64);
        assert!(selected.iter().all(|&i| i < 32));
    }
}
