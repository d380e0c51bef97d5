//! K-best search configuration.

use crate::annealing::floor_tolerance;
use crate::error::KBestError;

/// Configuration for the K-best search.
///
/// # Defaults
///
/// ```
/// use u_kbest::search::KBestConfig;
///
/// let config = KBestConfig::default();
/// assert_eq!(config.population_size, 5);
/// assert_eq!(config.start_temperature, 10.0);
/// assert_eq!(config.end_temperature, 1.0);
/// assert_eq!(config.temperature_drop, 3.0);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_kbest::search::KBestConfig;
///
/// let config = KBestConfig::default()
///     .with_population_size(8)
///     .with_temperatures(4.0, 0.5, 0.5)
///     .with_performance_threshold(0.75)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KBestConfig {
    /// Number of distinct candidates kept (k).
    ///
    /// Also the number of consecutive unsuccessful adaptive trials that
    /// triggers a cooling step.
    pub population_size: usize,

    /// Temperature at the start of the adaptive phase.
    pub start_temperature: f64,

    /// Floor temperature. The search ends after `population_size`
    /// unsuccessful trials at this temperature.
    pub end_temperature: f64,

    /// Amount subtracted from the temperature at each cooling step.
    ///
    /// `start_temperature - end_temperature` must be a whole multiple of it.
    pub temperature_drop: f64,

    /// Minimum performance for a candidate to enter the population during
    /// seeding.
    pub performance_threshold: f64,

    /// Hard budget on objective evaluations across both phases. 0 = no limit.
    pub max_trials: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for KBestConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            start_temperature: 10.0,
            end_temperature: 1.0,
            temperature_drop: 3.0,
            performance_threshold: 0.9,
            max_trials: 0,
            seed: None,
        }
    }
}

impl KBestConfig {
    pub fn with_population_size(mut self, k: usize) -> Self {
        self.population_size = k;
        self
    }

    /// Sets start temperature, floor and cooling step together.
    pub fn with_temperatures(mut self, start: f64, end: f64, drop: f64) -> Self {
        self.start_temperature = start;
        self.end_temperature = end;
        self.temperature_drop = drop;
        self
    }

    pub fn with_performance_threshold(mut self, threshold: f64) -> Self {
        self.performance_threshold = threshold;
        self
    }

    pub fn with_max_trials(mut self, n: usize) -> Self {
        self.max_trials = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cooling steps from start to floor.
    pub fn cooling_steps(&self) -> usize {
        ((self.start_temperature - self.end_temperature) / self.temperature_drop).round() as usize
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), KBestError> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if !self.end_temperature.is_finite() || self.end_temperature <= 0.0 {
            return Err(invalid(format!(
                "end_temperature must be positive and finite, got {}",
                self.end_temperature
            )));
        }
        if !self.start_temperature.is_finite() || self.start_temperature < self.end_temperature {
            return Err(invalid(format!(
                "start_temperature ({}) must be finite and not below end_temperature ({})",
                self.start_temperature, self.end_temperature
            )));
        }
        if !self.temperature_drop.is_finite() || self.temperature_drop <= 0.0 {
            return Err(invalid(format!(
                "temperature_drop must be positive and finite, got {}",
                self.temperature_drop
            )));
        }

        // The floor is detected by equality, so it has to be reachable in
        // whole steps.
        let span = self.start_temperature - self.end_temperature;
        let steps = (span / self.temperature_drop).round();
        if (span - steps * self.temperature_drop).abs() > floor_tolerance(self.temperature_drop) {
            return Err(invalid(format!(
                "start_temperature - end_temperature ({span}) is not a multiple of temperature_drop ({})",
                self.temperature_drop
            )));
        }

        if self.performance_threshold.is_nan() {
            return Err(invalid("performance_threshold must not be NaN"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> KBestError {
    KBestError::InvalidConfig(message.into())
}
