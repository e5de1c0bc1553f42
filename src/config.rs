//! Run configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Sizes and seeding for one evolutionary algorithm instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EaConfig {
    /// Number of parents kept each generation (MU).
    pub population_size: usize,
    /// Number of best-ever individuals carried over unchanged. Zero disables
    /// elitism.
    pub elite_count: usize,
    /// Seed for the driver's generator. `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for EaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_count: 0,
            seed: None,
        }
    }
}

impl EaConfig {
    pub fn new(population_size: usize) -> Self {
        Self {
            population_size,
            ..Self::default()
        }
    }

    pub fn with_elite_count(mut self, elite_count: usize) -> Self {
        self.elite_count = elite_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of individuals produced by variation each generation (LAMBDA).
    pub fn lambda(&self) -> usize {
        self.population_size.saturating_sub(self.elite_count)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::InvalidPopulationSize {
                size: self.population_size,
            });
        }
        if self.elite_count >= self.population_size {
            return Err(ConfigError::InvalidEliteCount {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        Ok(())
    }
}
