//! Portfolio weight allocation.

use std::collections::{BTreeMap, HashSet};

use crate::error::AllocationError;

/// A mapping from asset identifier to non-negative weight.
///
/// Asset order is fixed at construction and preserved by every allocation
/// derived from this one. Perturbation draws are consumed in that order,
/// which is what makes seeded runs reproducible.
///
/// Allocations are immutable: the search never edits one in place, it
/// builds a new one.
///
/// Construction checks that identifiers are unique and that weights are
/// finite and non-negative. Whether the weights sum to one and respect a
/// diversification cap is a property of the run, checked by
/// [`AnnealConfig::validate_initial`](crate::anneal::AnnealConfig::validate_initial).
///
/// # Examples
///
/// ```
/// use u_allocate::Allocation;
///
/// let alloc = Allocation::equal_weight(["AAPL", "GOOGL", "MSFT", "AMZN"]).unwrap();
/// assert_eq!(alloc.len(), 4);
/// assert_eq!(alloc.get("MSFT"), Some(0.25));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<(String, f64)>", into = "Vec<(String, f64)>")
)]
pub struct Allocation {
    assets: Vec<String>,
    weights: Vec<f64>,
}

impl Allocation {
    /// Builds an allocation from `(asset, weight)` pairs, keeping their order.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, AllocationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut assets = Vec::new();
        let mut weights = Vec::new();
        let mut seen = HashSet::new();

        for (asset, weight) in pairs {
            let asset = asset.into();
            if !weight.is_finite() || weight < 0.0 {
                return Err(AllocationError::InvalidWeight { asset, weight });
            }
            if !seen.insert(asset.clone()) {
                return Err(AllocationError::DuplicateAsset(asset));
            }
            assets.push(asset);
            weights.push(weight);
        }

        if assets.is_empty() {
            return Err(AllocationError::Empty);
        }

        Ok(Self { assets, weights })
    }

    /// Builds an allocation that splits weight evenly across `assets`.
    pub fn equal_weight<I, S>(assets: I) -> Result<Self, AllocationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let assets: Vec<String> = assets.into_iter().map(Into::into).collect();
        let w = 1.0 / assets.len().max(1) as f64;
        Self::from_pairs(assets.into_iter().map(|a| (a, w)))
    }

    /// Derives a new allocation over the same assets with `weights`.
    ///
    /// `weights` must be index-aligned with [`assets`](Self::assets).
    pub(crate) fn with_weights(&self, weights: Vec<f64>) -> Self {
        debug_assert_eq!(weights.len(), self.assets.len());
        Self {
            assets: self.assets.clone(),
            weights,
        }
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Always `false` for a constructed allocation.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Asset identifiers in allocation order.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Weights, index-aligned with [`assets`](Self::assets).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of `asset`, or `None` if it is not part of the allocation.
    pub fn get(&self, asset: &str) -> Option<f64> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .map(|i| self.weights[i])
    }

    /// Iterates `(asset, weight)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.assets
            .iter()
            .map(String::as_str)
            .zip(self.weights.iter().copied())
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// The largest single weight together with its asset.
    pub fn max_weight(&self) -> (&str, f64) {
        self.iter()
            .fold(("", f64::NEG_INFINITY), |acc, (a, w)| {
                if w > acc.1 {
                    (a, w)
                } else {
                    acc
                }
            })
    }

    /// An ordered map view, for collaborators that want keyed output.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(a, w)| (a.to_string(), w)).collect()
    }
}

impl TryFrom<Vec<(String, f64)>> for Allocation {
    type Error = AllocationError;

    fn try_from(pairs: Vec<(String, f64)>) -> Result<Self, Self::Error> {
        Self::from_pairs(pairs)
    }
}

impl From<Allocation> for Vec<(String, f64)> {
    fn from(alloc: Allocation) -> Self {
        alloc.assets.into_iter().zip(alloc.weights).collect()
    }
}
