//! Feasible neighbor generation.
//!
//! # Algorithm
//!
//! Each attempt:
//!
//! 1. Perturb every weight by an independent draw from
//!    `U[-noise_scale, noise_scale]`, clamping at zero
//! 2. Discard the attempt if the perturbed weights sum to exactly zero
//!    (or overflow)
//! 3. Renormalize so the weights sum to one
//! 4. Reject if any weight exceeds the diversification cap
//! 5. Reject if this exact weight vector was already produced in this call
//!
//! Generation stops once `target_count` candidates are collected or
//! `max_attempts` attempts are spent. A short or empty batch is a normal
//! result. In particular, when `diversification_cap < 1 / n` no normalized
//! vector over `n` assets is feasible and every call returns empty.
//!
//! Duplicate rejection compares weight vectors bit for bit. With continuous
//! perturbations collisions are rare, so it is not a meaningful uniqueness
//! guarantee.

use std::collections::HashSet;

use rand::Rng;

use super::config::AnnealConfig;
use crate::allocation::Allocation;

/// Candidates produced by one [`NeighborGenerator::generate`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborBatch {
    /// Feasible, pairwise-distinct allocations in generation order.
    pub candidates: Vec<Allocation>,

    /// Attempts spent, never more than `max_attempts`.
    pub attempts: usize,
}

impl NeighborBatch {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

/// Produces capped allocations near a given allocation.
///
/// The generator knows nothing about scoring.
///
/// # Examples
///
/// ```
/// use u_allocate::anneal::NeighborGenerator;
/// use u_allocate::random::create_rng;
/// use u_allocate::Allocation;
///
/// let alloc = Allocation::equal_weight(["a", "b", "c", "d", "e"]).unwrap();
/// let generator = NeighborGenerator::new(0.05, 10, 0.3, 1000);
/// let batch = generator.generate(&alloc, &mut create_rng(42));
///
/// assert!(batch.len() <= 10);
/// for candidate in &batch.candidates {
///     assert!((candidate.total() - 1.0).abs() < 1e-9);
///     assert!(candidate.max_weight().1 <= 0.3);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NeighborGenerator {
    /// Half-width of the uniform perturbation. Only its magnitude matters.
    pub noise_scale: f64,

    /// Candidates wanted per call.
    pub target_count: usize,

    /// Maximum weight for any single asset.
    pub diversification_cap: f64,

    /// Attempt budget per call.
    pub max_attempts: usize,
}

impl NeighborGenerator {
    /// Creates a generator. Any `noise_scale` is accepted; a negative one
    /// perturbs like its absolute value, and attempts whose perturbed
    /// weights overflow are discarded like zero-sum ones.
    pub fn new(
        noise_scale: f64,
        target_count: usize,
        diversification_cap: f64,
        max_attempts: usize,
    ) -> Self {
        Self {
            noise_scale,
            target_count,
            diversification_cap,
            max_attempts,
        }
    }

    /// Builds a generator from the neighborhood fields of `config`.
    pub fn from_config(config: &AnnealConfig) -> Self {
        Self::new(
            config.noise_scale,
            config.candidates_per_iteration,
            config.diversification_cap,
            config.max_generation_attempts,
        )
    }

    /// Generates up to `target_count` feasible neighbors of `allocation`.
    pub fn generate<R: Rng>(&self, allocation: &Allocation, rng: &mut R) -> NeighborBatch {
        let mut candidates = Vec::with_capacity(self.target_count);
        let mut seen: HashSet<Vec<u64>> = HashSet::new();
        let mut attempts = 0usize;

        while candidates.len() < self.target_count && attempts < self.max_attempts {
            attempts += 1;

            let mut weights: Vec<f64> = allocation
                .weights()
                .iter()
                .map(|&w| {
                    let perturbation = rng.random_range(-1.0f64..=1.0) * self.noise_scale;
                    (w + perturbation).max(0.0)
                })
                .collect();

            let total: f64 = weights.iter().sum();
            if total == 0.0 || !total.is_finite() {
                continue;
            }

            for w in &mut weights {
                *w /= total;
            }

            if weights.iter().any(|&w| w > self.diversification_cap) {
                continue;
            }

            if !seen.insert(weight_key(&weights)) {
                continue;
            }

            candidates.push(allocation.with_weights(weights));
        }

        NeighborBatch {
            candidates,
            attempts,
        }
    }
}

/// Exact-equality key for a weight vector. `-0.0` and `0.0` compare equal.
fn weight_key(weights: &[f64]) -> Vec<u64> {
    weights
        .iter()
        .map(|&w| if w == 0.0 { 0 } else { w.to_bits() })
        .collect()
}
