//! Configuration errors.
//!
//! Every constructor that validates parameters returns [`ConfigError`]. Once a
//! component is built the generational loop has no error path.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("InvalidPopulationSize: population size must be at least 1. size = {size}")]
    InvalidPopulationSize { size: usize },
    #[error(
        "InvalidEliteCount: elite count must be smaller than the population size. elite_count = {elite_count}, population_size = {population_size}"
    )]
    InvalidEliteCount {
        elite_count: usize,
        population_size: usize,
    },
    #[error("InvalidEliteCapacity: elite set capacity must be at least 1")]
    InvalidEliteCapacity,
    #[error("InvalidRate: {name} must be in [0, 1]. value = {value}")]
    InvalidRate { name: &'static str, value: f64 },
    #[error(
        "InvalidRateSum: crossover and mutation rates must sum to at most 1. crossover = {crossover}, mutation = {mutation}"
    )]
    InvalidRateSum { crossover: f64, mutation: f64 },
    #[error("InvalidParameter: {name} must be {expected}. value = {value}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("InvalidTournamentSize: tournament size must be at least 1")]
    InvalidTournamentSize,
    #[error("InvalidTruncationSize: truncation k must be at least 1")]
    InvalidTruncationSize,
    #[error("MissingCollaborator: no {name} was provided")]
    MissingCollaborator { name: &'static str },
}

impl ConfigError {
    pub(crate) fn invalid_rate(name: &'static str, value: f64) -> Self {
        Self::InvalidRate { name, value }
    }

    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: f64,
        expected: &'static str,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value,
            expected,
        }
    }

    pub(crate) fn missing(name: &'static str) -> Self {
        Self::MissingCollaborator { name }
    }
}

/// Checks that `value` is a probability.
pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::invalid_rate(name, value))
    }
}
