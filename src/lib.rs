//! Capped portfolio weight allocation by batch simulated annealing.
//!
//! Given a set of assets, an initial weight allocation, and a
//! [`ScoreFunction`], the annealer searches nearby allocations for a higher
//! score while keeping every weight under a diversification cap.
//!
//! - **Allocation**: an ordered, immutable asset -> weight mapping.
//! - **ScoreFunction**: a pure objective. [`AttractivenessTable`] scores an
//!   allocation as the weighted sum of per-asset attractiveness values.
//! - **NeighborGenerator**: random perturb-and-renormalize moves that respect
//!   the cap, with a bounded attempt budget.
//! - **AnnealRunner**: the acceptance and cooling loop, returning the best
//!   allocation and a per-iteration trace.
//!
//! # Architecture
//!
//! The crate holds no market-data, ranking, persistence or plotting code.
//! Attractiveness values come from the caller and the trace is handed back
//! for whatever renders it. All randomness flows through an explicit,
//! seedable generator (see [`random`]).
//!
//! # Examples
//!
//! ```
//! use u_allocate::anneal::{AnnealConfig, AnnealRunner};
//! use u_allocate::{Allocation, AttractivenessTable};
//!
//! let table = AttractivenessTable::new()
//!     .with("AAPL", 1.3)
//!     .with("GOOGL", 1.2)
//!     .with("MSFT", 1.1)
//!     .with("AMZN", 1.4);
//! let initial = Allocation::equal_weight(["AAPL", "GOOGL", "MSFT", "AMZN"]).unwrap();
//!
//! let config = AnnealConfig::default().with_diversification_cap(0.4).with_seed(42);
//! let result = AnnealRunner::run(&initial, &table, &config).unwrap();
//!
//! assert!(result.best_score >= 1.25);
//! ```

pub mod allocation;
pub mod anneal;
pub mod error;
pub mod random;
pub mod score;

pub use allocation::Allocation;
pub use error::{AllocationError, ConfigError};
pub use score::{AttractivenessTable, ScoreFunction};
