//! Allocation scoring.
//!
//! The annealer maximizes whatever [`ScoreFunction`] it is handed. The
//! usual objective is [`AttractivenessTable`]: a weight-weighted sum of
//! externally supplied per-asset attractiveness values.

use std::collections::HashMap;

use crate::allocation::Allocation;

/// Evaluates an allocation. Higher is better.
///
/// Implementations must be pure: same allocation, same score, no side
/// effects. The runner calls this many times per iteration and, with the
/// `parallel` feature, from several threads at once.
///
/// Any `Fn(&Allocation) -> f64 + Send + Sync` closure is a score function.
///
/// # Examples
///
/// ```
/// use u_allocate::{Allocation, ScoreFunction};
///
/// // Reward concentration in the first asset.
/// let first_heavy = |a: &Allocation| a.weights()[0];
/// let alloc = Allocation::from_pairs([("x", 0.7), ("y", 0.3)]).unwrap();
/// assert_eq!(first_heavy.score(&alloc), 0.7);
/// ```
pub trait ScoreFunction: Send + Sync {
    /// Scores `allocation`.
    fn score(&self, allocation: &Allocation) -> f64;
}

impl<F> ScoreFunction for F
where
    F: Fn(&Allocation) -> f64 + Send + Sync,
{
    fn score(&self, allocation: &Allocation) -> f64 {
        self(allocation)
    }
}

/// Per-asset attractiveness values with a fallback for unlisted assets.
///
/// Scores an allocation as `sum(weight_i * attractiveness_i)`.
///
/// # Examples
///
/// ```
/// use u_allocate::{Allocation, AttractivenessTable, ScoreFunction};
///
/// let table = AttractivenessTable::new()
///     .with("AAPL", 1.3)
///     .with("AMZN", 1.4);
/// let alloc = Allocation::from_pairs([("AAPL", 0.5), ("AMZN", 0.25), ("IBM", 0.25)]).unwrap();
/// // IBM falls back to the default of 1.0
/// let expected = 0.5 * 1.3 + 0.25 * 1.4 + 0.25 * 1.0;
/// assert!((table.score(&alloc) - expected).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttractivenessTable {
    values: HashMap<String, f64>,
    default_value: f64,
}

impl Default for AttractivenessTable {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            default_value: 1.0,
        }
    }
}

impl AttractivenessTable {
    /// An empty table; every asset scores the default of 1.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the value for `asset`.
    pub fn with(mut self, asset: impl Into<String>, value: f64) -> Self {
        self.values.insert(asset.into(), value);
        self
    }

    /// Sets the value used for assets missing from the table.
    pub fn with_default(mut self, value: f64) -> Self {
        self.default_value = value;
        self
    }

    /// Attractiveness of `asset`.
    pub fn value(&self, asset: &str) -> f64 {
        self.values.get(asset).copied().unwrap_or(self.default_value)
    }

    /// Fallback value for unlisted assets.
    pub fn default_value(&self) -> f64 {
        self.default_value
    }

    /// Number of explicitly listed assets.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when no asset is listed explicitly.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for AttractivenessTable {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(a, v)| (a.into(), v)).collect(),
            default_value: 1.0,
        }
    }
}

impl ScoreFunction for AttractivenessTable {
    fn score(&self, allocation: &Allocation) -> f64 {
        allocation.iter().map(|(asset, w)| w * self.value(asset)).sum()
    }
}
