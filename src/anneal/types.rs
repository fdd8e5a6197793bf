//! Value types produced by an annealing run.

use crate::allocation::Allocation;

/// A candidate allocation paired with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub allocation: Allocation,
    pub score: f64,
}

/// One completed iteration of the annealing loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceRecord {
    /// Zero-based iteration index.
    pub iteration: usize,

    /// Score of the current allocation after the acceptance test.
    pub current_score: f64,

    /// Best score seen up to and including this iteration.
    pub best_score: f64,

    /// Temperature used for this iteration's acceptance test.
    pub temperature: f64,

    /// Whether the batch winner replaced the current allocation.
    pub accepted: bool,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Ran for `max_iterations`.
    Completed,

    /// The neighbor generator returned no feasible candidate.
    Exhausted,

    /// The stop flag was raised.
    Cancelled,
}
