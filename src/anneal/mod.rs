//! Batch simulated annealing over capped allocations.
//!
//! Each iteration draws a batch of feasible neighbors of the current
//! allocation, keeps the highest-scoring one, and accepts it with the
//! Metropolis rule. Temperature cools geometrically down to a floor. The
//! run ends after a fixed number of iterations, when no feasible neighbor
//! can be generated, or when an external stop flag is raised.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod neighbor;
mod runner;
mod types;

pub use config::AnnealConfig;
pub use neighbor::{NeighborBatch, NeighborGenerator};
pub use runner::{acceptance_probability, AnnealResult, AnnealRunner};
pub use types::{Candidate, Termination, TraceRecord};
