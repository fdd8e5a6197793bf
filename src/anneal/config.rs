//! Annealing configuration.

use crate::allocation::Allocation;
use crate::error::ConfigError;

/// Configuration for an allocation annealing run.
///
/// # Examples
///
/// ```
/// use u_allocate::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(2.0)
///     .with_cooling_rate(0.99)
///     .with_max_iterations(1000)
///     .with_diversification_cap(0.3)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnealConfig {
    /// Starting temperature. Higher values accept worse moves more often.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1]. `1.0` disables cooling.
    pub cooling_rate: f64,

    /// Lower bound on the temperature, applied after every cooling step.
    pub temperature_floor: f64,

    /// Maximum number of iterations.
    pub max_iterations: usize,

    /// Neighbors requested per iteration.
    pub candidates_per_iteration: usize,

    /// Maximum weight any single asset may hold.
    pub diversification_cap: f64,

    /// Attempts the neighbor generator may spend per iteration.
    pub max_generation_attempts: usize,

    /// Half-width of the uniform perturbation applied to each weight.
    pub noise_scale: f64,

    /// How far the initial weights may sum from 1.
    pub sum_tolerance: f64,

    /// Score candidates on the rayon pool (requires the `parallel` feature).
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            cooling_rate: 0.9975,
            temperature_floor: 1e-8,
            max_iterations: 500,
            candidates_per_iteration: 10,
            diversification_cap: 0.25,
            max_generation_attempts: 1000,
            noise_scale: 0.05,
            sum_tolerance: 1e-6,
            parallel: false,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_temperature_floor(mut self, floor: f64) -> Self {
        self.temperature_floor = floor;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_candidates_per_iteration(mut self, n: usize) -> Self {
        self.candidates_per_iteration = n;
        self
    }

    pub fn with_diversification_cap(mut self, cap: f64) -> Self {
        self.diversification_cap = cap;
        self
    }

    pub fn with_max_generation_attempts(mut self, n: usize) -> Self {
        self.max_generation_attempts = n;
        self
    }

    pub fn with_noise_scale(mut self, scale: f64) -> Self {
        self.noise_scale = scale;
        self
    }

    pub fn with_sum_tolerance(mut self, tol: f64) -> Self {
        self.sum_tolerance = tol;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the parameters, independent of any allocation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(ConfigError::InitialTemperature(self.initial_temperature));
        }
        if !(self.cooling_rate > 0.0 && self.cooling_rate <= 1.0) {
            return Err(ConfigError::CoolingRate(self.cooling_rate));
        }
        if !(self.temperature_floor > 0.0 && self.temperature_floor.is_finite()) {
            return Err(ConfigError::TemperatureFloor(self.temperature_floor));
        }
        if self.initial_temperature < self.temperature_floor {
            return Err(ConfigError::TemperatureBelowFloor {
                initial: self.initial_temperature,
                floor: self.temperature_floor,
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::MaxIterations);
        }
        if self.candidates_per_iteration == 0 {
            return Err(ConfigError::CandidatesPerIteration);
        }
        if !(self.diversification_cap > 0.0 && self.diversification_cap <= 1.0) {
            return Err(ConfigError::DiversificationCap(self.diversification_cap));
        }
        if self.max_generation_attempts == 0 {
            return Err(ConfigError::MaxGenerationAttempts);
        }
        // the draw spans [-noise_scale, noise_scale], whose width must be finite
        if !(self.noise_scale >= 0.0 && (2.0 * self.noise_scale).is_finite()) {
            return Err(ConfigError::NoiseScale(self.noise_scale));
        }
        if !(self.sum_tolerance > 0.0 && self.sum_tolerance.is_finite()) {
            return Err(ConfigError::SumTolerance(self.sum_tolerance));
        }
        Ok(())
    }

    /// Validates the parameters and checks that `initial` is a feasible
    /// starting point: weights sum to 1 within `sum_tolerance` and none
    /// exceeds `diversification_cap`.
    ///
    /// The initial allocation is never repaired.
    pub fn validate_initial(&self, initial: &Allocation) -> Result<(), ConfigError> {
        self.validate()?;

        let total = initial.total();
        if (total - 1.0).abs() > self.sum_tolerance {
            return Err(ConfigError::WeightsDoNotSumToOne { total });
        }

        if let Some((asset, weight)) = initial
            .iter()
            .find(|&(_, w)| w > self.diversification_cap)
        {
            return Err(ConfigError::CapExceeded {
                asset: asset.to_string(),
                weight,
                cap: self.diversification_cap,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealConfig::default();
        assert!((config.initial_temperature - 1.0).abs() < 1e-12);
        assert!((config.cooling_rate - 0.9975).abs() < 1e-12);
        assert_eq!(config.max_iterations, 500);
        assert_eq!(config.candidates_per_iteration, 10);
        assert!((config.diversification_cap - 0.25).abs() < 1e-12);
        assert_eq!(config.max_generation_attempts, 1000);
        assert!((config.temperature_floor - 1e-8).abs() < 1e-20);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(AnnealConfig::default().validate().is_ok());
        assert!(AnnealConfig::default()
            .with_cooling_rate(1.0)
            .validate()
            .is_ok());
        assert!(AnnealConfig::default().with_noise_scale(0.0).validate().is_ok());
    }

    #[test]
    fn test_validate_bad_temperature() {
        let config = AnnealConfig::default().with_initial_temperature(0.0);
        assert_eq!(config.validate(), Err(ConfigError::InitialTemperature(0.0)));
        let config = AnnealConfig::default().with_initial_temperature(f64::INFINITY);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_cooling_rate() {
        for rate in [0.0, -0.5, 1.01, f64::NAN] {
            let config = AnnealConfig::default().with_cooling_rate(rate);
            assert!(
                matches!(config.validate(), Err(ConfigError::CoolingRate(_))),
                "rate {rate} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_zero_counts() {
        let config = AnnealConfig::default().with_max_iterations(0);
        assert_eq!(config.validate(), Err(ConfigError::MaxIterations));
        let config = AnnealConfig::default().with_candidates_per_iteration(0);
        assert_eq!(config.validate(), Err(ConfigError::CandidatesPerIteration));
        let config = AnnealConfig::default().with_max_generation_attempts(0);
        assert_eq!(config.validate(), Err(ConfigError::MaxGenerationAttempts));
    }

    #[test]
    fn test_validate_bad_cap() {
        for cap in [0.0, 1.5, -0.1] {
            let config = AnnealConfig::default().with_diversification_cap(cap);
            assert!(matches!(
                config.validate(),
                Err(ConfigError::DiversificationCap(_))
            ));
        }
        assert!(AnnealConfig::default()
            .with_diversification_cap(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_bad_noise_and_floor() {
        let config = AnnealConfig::default().with_noise_scale(-0.01);
        assert!(matches!(config.validate(), Err(ConfigError::NoiseScale(_))));
        let config = AnnealConfig::default().with_temperature_floor(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TemperatureFloor(_))
        ));
    }

    #[test]
    fn test_validate_initial_temperature_below_floor() {
        let config = AnnealConfig::default().with_initial_temperature(1e-12);
        assert_eq!(
            config.validate(),
            Err(ConfigError::TemperatureBelowFloor {
                initial: 1e-12,
                floor: 1e-8,
            })
        );
        let config = AnnealConfig::default()
            .with_initial_temperature(1e-8)
            .with_temperature_floor(1e-8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_noise_range_must_be_finite() {
        for scale in [1e308, f64::MAX, f64::INFINITY, f64::NAN] {
            let config = AnnealConfig::default().with_noise_scale(scale);
            assert!(
                matches!(config.validate(), Err(ConfigError::NoiseScale(_))),
                "noise_scale {scale} should be rejected"
            );
        }
        assert!(AnnealConfig::default()
            .with_noise_scale(1e307)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_initial_sum() {
        let config = AnnealConfig::default().with_diversification_cap(1.0);
        let alloc = Allocation::from_pairs([("a", 0.5), ("b", 0.4)]).unwrap();
        assert!(matches!(
            config.validate_initial(&alloc),
            Err(ConfigError::WeightsDoNotSumToOne { .. })
        ));
    }

    #[test]
    fn test_validate_initial_cap() {
        let config = AnnealConfig::default().with_diversification_cap(0.2);
        let alloc = Allocation::equal_weight(["a", "b", "c", "d"]).unwrap();
        match config.validate_initial(&alloc) {
            Err(ConfigError::CapExceeded { asset, weight, cap }) => {
                assert_eq!(asset, "a");
                assert!((weight - 0.25).abs() < 1e-12);
                assert!((cap - 0.2).abs() < 1e-12);
            }
            other => panic!("expected CapExceeded, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_initial_at_cap_boundary() {
        let config = AnnealConfig::default();
        let alloc = Allocation::equal_weight(["a", "b", "c", "d"]).unwrap();
        assert!(config.validate_initial(&alloc).is_ok());
    }
}
