//! Annealing execution loop.
//!
//! # Algorithm
//!
//! 1. current = best = initial allocation, temperature = `initial_temperature`
//! 2. At each iteration:
//!    a. Generate a batch of feasible neighbors of the current allocation
//!    b. Stop if the batch is empty (nothing feasible nearby)
//!    c. Score the batch and take its highest-scoring candidate
//!    d. Accept it if it improves on the current score, otherwise with
//!       probability `exp(delta / temperature)`
//!    e. Update the best allocation, record a trace entry
//!    f. Cool: `temperature = max(temperature * cooling_rate, temperature_floor)`
//! 3. Stop after `max_iterations`, on an empty batch, or when cancelled
//!
//! Picking the best of a batch and then applying the Metropolis test is a
//! greedy-batch hybrid rather than textbook SA, which tests one random
//! neighbor per step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::AnnealConfig;
use super::neighbor::NeighborGenerator;
use super::types::{Candidate, Termination, TraceRecord};
use crate::allocation::Allocation;
use crate::error::ConfigError;
use crate::random::rng_from_seed;
use crate::score::ScoreFunction;

/// Result of an annealing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealResult {
    /// The best allocation found.
    pub best: Allocation,

    /// Score of the best allocation.
    pub best_score: f64,

    /// Score of the initial allocation.
    pub initial_score: f64,

    /// Number of completed iterations (equals `trace.len()`).
    pub iterations: usize,

    /// Temperature after the last cooling step.
    pub final_temperature: f64,

    /// Number of accepted batch winners, improving or not.
    pub accepted_moves: usize,

    /// Number of batch winners that improved on the current score.
    pub improving_moves: usize,

    /// Why the run stopped.
    pub termination: Termination,

    /// One record per completed iteration, in order.
    pub trace: Vec<TraceRecord>,
}

/// Runs batch simulated annealing over allocations.
///
/// # Examples
///
/// ```
/// use u_allocate::anneal::{AnnealConfig, AnnealRunner};
/// use u_allocate::{Allocation, AttractivenessTable};
///
/// let table: AttractivenessTable = [("A", 1.3), ("B", 1.2), ("C", 1.1), ("D", 1.4), ("E", 0.9)]
///     .into_iter()
///     .collect();
/// let initial = Allocation::equal_weight(["A", "B", "C", "D", "E"]).unwrap();
/// let config = AnnealConfig::default()
///     .with_diversification_cap(0.35)
///     .with_max_iterations(200)
///     .with_seed(7);
///
/// let result = AnnealRunner::run(&initial, &table, &config).unwrap();
/// assert!(result.best_score >= result.initial_score);
/// assert!(result.best.max_weight().1 <= 0.35);
/// ```
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs the optimization with a generator seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] before any iteration when `config` is
    /// invalid or `initial` is not a feasible start. In particular an
    /// initial weight above `diversification_cap` is rejected with
    /// [`ConfigError::CapExceeded`] rather than producing an empty run; a
    /// feasible start with no feasible neighbors (e.g. four equal weights
    /// under a cap of exactly 0.25) ends at iteration 0 with
    /// [`Termination::Exhausted`] and the initial allocation as best.
    pub fn run<S: ScoreFunction + ?Sized>(
        initial: &Allocation,
        scorer: &S,
        config: &AnnealConfig,
    ) -> Result<AnnealResult, ConfigError> {
        Self::run_with_cancel(initial, scorer, config, None)
    }

    /// Runs with an optional stop flag.
    ///
    /// The flag is checked once per iteration. When raised, the run ends
    /// with [`Termination::Cancelled`] and returns the best allocation found
    /// so far.
    pub fn run_with_cancel<S: ScoreFunction + ?Sized>(
        initial: &Allocation,
        scorer: &S,
        config: &AnnealConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult, ConfigError> {
        let mut rng = rng_from_seed(config.seed);
        Self::run_with_rng(initial, scorer, config, &mut rng, cancel)
    }

    /// Runs with a caller-supplied generator. `config.seed` is ignored.
    #[tracing::instrument(level = "debug", name = "Allocation Anneal", skip_all)]
    pub fn run_with_rng<S: ScoreFunction + ?Sized, R: Rng>(
        initial: &Allocation,
        scorer: &S,
        config: &AnnealConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult, ConfigError> {
        config.validate_initial(initial)?;

        let generator = NeighborGenerator::from_config(config);

        let mut current = initial.clone();
        let mut current_score = scorer.score(&current);
        let initial_score = current_score;
        let mut best = current.clone();
        let mut best_score = current_score;

        let mut temperature = config.initial_temperature;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut termination = Termination::Completed;
        let mut trace = Vec::with_capacity(config.max_iterations);

        tracing::debug!(
            assets = initial.len(),
            initial_score,
            temperature,
            cooling_rate = config.cooling_rate,
            cap = config.diversification_cap,
            max_iterations = config.max_iterations,
            "annealing started"
        );

        for iteration in 0..config.max_iterations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    termination = Termination::Cancelled;
                    break;
                }
            }

            let batch = generator.generate(&current, rng);
            if batch.is_empty() {
                tracing::debug!(
                    iteration,
                    attempts = batch.attempts,
                    "no feasible neighbor, stopping"
                );
                termination = Termination::Exhausted;
                break;
            }

            let scored = score_batch(scorer, batch.candidates, config.parallel);
            let Some(winner) = select_best(scored) else {
                termination = Termination::Exhausted;
                break;
            };

            let delta = winner.score - current_score;
            let accepted = if delta > 0.0 {
                improving_moves += 1;
                true
            } else {
                metropolis_accept(delta, temperature, rng)
            };

            if accepted {
                current = winner.allocation;
                current_score = winner.score;
                accepted_moves += 1;

                if current_score > best_score {
                    best = current.clone();
                    best_score = current_score;
                }
            }

            tracing::trace!(iteration, temperature, delta, accepted, current_score);

            trace.push(TraceRecord {
                iteration,
                current_score,
                best_score,
                temperature,
                accepted,
            });

            temperature = cool(temperature, config);
        }

        tracing::debug!(
            ?termination,
            iterations = trace.len(),
            best_score,
            accepted_moves,
            "annealing finished"
        );

        Ok(AnnealResult {
            best,
            best_score,
            initial_score,
            iterations: trace.len(),
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            termination,
            trace,
        })
    }
}

/// Probability of accepting a move that changes the score by `delta`.
///
/// Improvements (`delta > 0`) are always accepted; anything else is
/// accepted with probability `exp(delta / temperature)`, which is 1 for
/// `delta == 0`.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    if delta > 0.0 {
        1.0
    } else {
        (delta / temperature).exp()
    }
}

/// Metropolis test for a non-improving move. Consumes one uniform draw.
fn metropolis_accept<R: Rng>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    rng.random_range(0.0..1.0) < (delta / temperature).exp()
}

/// Geometric cooling, floored so the next `exp(delta / temperature)` is safe.
fn cool(temperature: f64, config: &AnnealConfig) -> f64 {
    (temperature * config.cooling_rate).max(config.temperature_floor)
}

/// Highest-scoring candidate; ties keep the earliest.
fn select_best(candidates: Vec<Candidate>) -> Option<Candidate> {
    let mut iter = candidates.into_iter();
    let mut best = iter.next()?;
    for c in iter {
        if c.score > best.score {
            best = c;
        }
    }
    Some(best)
}

#[cfg(feature = "parallel")]
fn score_batch<S: ScoreFunction + ?Sized>(
    scorer: &S,
    allocations: Vec<Allocation>,
    parallel: bool,
) -> Vec<Candidate> {
    if parallel {
        allocations
            .into_par_iter()
            .map(|allocation| {
                let score = scorer.score(&allocation);
                Candidate { allocation, score }
            })
            .collect()
    } else {
        score_sequential(scorer, allocations)
    }
}

#[cfg(not(feature = "parallel"))]
fn score_batch<S: ScoreFunction + ?Sized>(
    scorer: &S,
    allocations: Vec<Allocation>,
    _parallel: bool,
) -> Vec<Candidate> {
    score_sequential(scorer, allocations)
}

fn score_sequential<S: ScoreFunction + ?Sized>(
    scorer: &S,
    allocations: Vec<Allocation>,
) -> Vec<Candidate> {
    allocations
        .into_iter()
        .map(|allocation| {
            let score = scorer.score(&allocation);
            Candidate { allocation, score }
        })
        .collect()
}
