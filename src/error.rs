//! Error types.
//!
//! Only caller input can fail. Degenerate situations inside the search
//! (zero-sum perturbations, infeasible caps, empty batches) are ordinary
//! outcomes and never surface here.

use thiserror::Error;

/// An allocation could not be constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("allocation has no assets")]
    Empty,

    #[error("duplicate asset: {0}")]
    DuplicateAsset(String),

    #[error("invalid weight {weight} for asset {asset}")]
    InvalidWeight { asset: String, weight: f64 },
}

/// An annealing run was configured with invalid parameters or an
/// unacceptable initial allocation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("initial_temperature must be positive and finite, got {0}")]
    InitialTemperature(f64),

    #[error("cooling_rate must be in (0, 1], got {0}")]
    CoolingRate(f64),

    #[error("max_iterations must be positive")]
    MaxIterations,

    #[error("candidates_per_iteration must be positive")]
    CandidatesPerIteration,

    #[error("diversification_cap must be in (0, 1], got {0}")]
    DiversificationCap(f64),

    #[error("max_generation_attempts must be positive")]
    MaxGenerationAttempts,

    #[error("noise_scale must be non-negative with a finite perturbation range, got {0}")]
    NoiseScale(f64),

    #[error("temperature_floor must be positive and finite, got {0}")]
    TemperatureFloor(f64),

    #[error("initial_temperature {initial} is below temperature_floor {floor}")]
    TemperatureBelowFloor { initial: f64, floor: f64 },

    #[error("sum_tolerance must be positive and finite, got {0}")]
    SumTolerance(f64),

    #[error("invalid initial allocation: {0}")]
    InitialAllocation(#[from] AllocationError),

    #[error("initial weights sum to {total}, expected 1")]
    WeightsDoNotSumToOne { total: f64 },

    #[error("initial weight {weight} for {asset} exceeds diversification cap {cap}")]
    CapExceeded { asset: String, weight: f64, cap: f64 },
}
