//! Boltzmann selection.
//!
//! Weights are `exp(f / t)` where the temperature `t` cools after every
//! selection call. High temperatures select almost uniformly; as `t` falls the
//! fittest individuals dominate. Weights are computed as `exp((f − max f) / t)`,
//! which gives the same distribution without overflowing.
//!
//! The temperature is per-run state: [`init`](super::SelectionOperator::init)
//! restores `t0`, and split copies carry their own temperature.

use super::weighted::{Sampling, WeightFunction, WeightedSelection};
use crate::error::ConfigError;
use crate::fitness::{FitnessVector, max_value};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Temperature schedule for [`Boltzmann`] weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CoolingSchedule {
    /// `t ← max(t − rate, t_min)` after each generation.
    Linear { t0: f64, rate: f64, t_min: f64 },
    /// `t ← max(t · rate, t_min)` after each generation, `rate` in `(0, 1)`.
    Exponential { t0: f64, rate: f64, t_min: f64 },
}

impl CoolingSchedule {
    pub fn linear(t0: f64, rate: f64, t_min: f64) -> Result<Self, ConfigError> {
        check_temperatures(t0, t_min)?;
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(ConfigError::invalid_parameter(
                "linear cooling rate",
                rate,
                "positive and finite",
            ));
        }
        Ok(Self::Linear { t0, rate, t_min })
    }

    pub fn exponential(t0: f64, rate: f64, t_min: f64) -> Result<Self, ConfigError> {
        check_temperatures(t0, t_min)?;
        if !(rate > 0.0 && rate < 1.0) {
            return Err(ConfigError::invalid_parameter(
                "exponential cooling rate",
                rate,
                "in (0, 1)",
            ));
        }
        Ok(Self::Exponential { t0, rate, t_min })
    }

    pub fn initial_temperature(&self) -> f64 {
        match *self {
            Self::Linear { t0, .. } | Self::Exponential { t0, .. } => t0,
        }
    }

    /// Temperature after one cooling step from `t`.
    pub fn cool(&self, t: f64) -> f64 {
        match *self {
            Self::Linear { rate, t_min, .. } => (t - rate).max(t_min),
            Self::Exponential { rate, t_min, .. } => (t * rate).max(t_min),
        }
    }
}

fn check_temperatures(t0: f64, t_min: f64) -> Result<(), ConfigError> {
    if !(t0 > 0.0 && t0.is_finite()) {
        return Err(ConfigError::invalid_parameter(
            "initial temperature",
            t0,
            "positive and finite",
        ));
    }
    if !(t_min > 0.0 && t_min <= t0) {
        return Err(ConfigError::invalid_parameter(
            "minimum temperature",
            t_min,
            "positive and at most the initial temperature",
        ));
    }
    Ok(())
}

/// Boltzmann weighting with its current temperature.
#[derive(Debug, Clone)]
pub struct Boltzmann {
    schedule: CoolingSchedule,
    temperature: f64,
}

impl Boltzmann {
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn schedule(&self) -> CoolingSchedule {
        self.schedule
    }
}

impl WeightFunction for Boltzmann {
    fn weigh(&mut self, fitness: &dyn FitnessVector, weights: &mut Vec<f64>) {
        let max = max_value(fitness);
        let t = self.temperature;
        weights.clear();
        weights.extend((0..fitness.len()).map(|i| ((fitness.value(i) - max) / t).exp()));
        self.temperature = self.schedule.cool(t);
    }

    fn init(&mut self, _generations: usize) {
        self.temperature = self.schedule.initial_temperature();
    }
}

pub type BoltzmannSelection = WeightedSelection<Boltzmann>;

impl WeightedSelection<Boltzmann> {
    #[instrument(level = "debug")]
    pub fn boltzmann(schedule: CoolingSchedule) -> Self {
        Self::with_weights(
            Boltzmann {
                schedule,
                temperature: schedule.initial_temperature(),
            },
            Sampling::Roulette,
        )
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.weight_function().temperature()
    }
}
