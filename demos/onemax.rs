use genpop::algorithms::generational::GenerationalEa;
use genpop::generation::CrossoverMutation;
use genpop::selection::{BoltzmannSelection, CoolingSchedule, SigmaScaling, TournamentSelection};
use genpop::{
    CrossoverOperator, EaConfig, FitnessFunction, Initializer, MutationOperator, SelectionOperator,
    Split,
};
use rand::Rng;

const BITS: usize = 128;

#[derive(Clone)]
struct RandomBits;

impl Split for RandomBits {
    fn split(&self) -> Self {
        RandomBits
    }
}

impl Initializer<Vec<bool>> for RandomBits {
    fn create_candidate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<bool> {
        (0..BITS).map(|_| rng.random()).collect()
    }
}

#[derive(Clone)]
struct BitFlip;

impl Split for BitFlip {
    fn split(&self) -> Self {
        BitFlip
    }
}

impl MutationOperator<Vec<bool>> for BitFlip {
    fn mutate<R: Rng + ?Sized>(&mut self, c: &mut Vec<bool>, rng: &mut R) {
        let rate = 1.0 / c.len() as f64;
        for bit in c.iter_mut() {
            if rng.random::<f64>() < rate {
                *bit = !*bit;
            }
        }
    }
}

#[derive(Clone)]
struct Uniform;

impl Split for Uniform {
    fn split(&self) -> Self {
        Uniform
    }
}

impl CrossoverOperator<Vec<bool>> for Uniform {
    fn cross<R: Rng + ?Sized>(&mut self, a: &mut Vec<bool>, b: &mut Vec<bool>, rng: &mut R) {
        for (x, y) in a.iter_mut().zip(b.iter_mut()) {
            if rng.random() {
                std::mem::swap(x, y);
            }
        }
    }
}

struct OneMax;

impl FitnessFunction<Vec<bool>> for OneMax {
    type Fitness = i64;

    fn fitness(&self, c: &Vec<bool>) -> i64 {
        c.iter().filter(|&&b| b).count() as i64
    }

    fn cost(&self, c: &Vec<bool>) -> f64 {
        c.iter().filter(|&&b| !b).count() as f64
    }

    fn is_minimum_cost(&self, cost: f64) -> bool {
        cost == 0.0
    }
}

fn run(name: &str, selection: Box<dyn SelectionOperator>) {
    let mut ea = GenerationalEa::builder()
        .config(EaConfig::new(100).with_elite_count(2).with_seed(42))
        .initializer(RandomBits)
        .fitness_function(OneMax)
        .selection(selection)
        .generation(CrossoverMutation::new(Uniform, 0.7, BitFlip, 1.0).expect("valid rates"))
        .build()
        .expect("valid configuration");

    match ea.optimize(1_000) {
        Some(best) => println!(
            "{name}: cost {} after {} generations ({} evaluations){}",
            best.cost,
            ea.total_generations(),
            ea.total_evaluations(),
            if best.is_known_optimal { ", optimum reached" } else { "" }
        ),
        None => println!("{name}: no run"),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    run("tournament", Box::new(TournamentSelection::binary()));
    run(
        "sigma-scaled tournament",
        Box::new(SigmaScaling::new(TournamentSelection::new(3).expect("positive size"))),
    );
    run(
        "boltzmann",
        Box::new(BoltzmannSelection::boltzmann(
            CoolingSchedule::exponential(20.0, 0.99, 0.5).expect("valid schedule"),
        )),
    );
}
