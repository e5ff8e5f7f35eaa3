//! Datasets
//!
//! This module implements the sample store that backs a loaded dataset and the row views that
//! select from it. A [`Dataset`] owns exactly one [`SampleStore`]; any number of
//! [`DatasetView`]s borrow it. A view is nothing more than an ordered list of physical row
//! indices, so splitting, bootstrapping or extracting the out-of-bag rows of a view never copies
//! the underlying matrix.
//!
//! The split engine used to grow decision trees (threshold enumeration, entropy, information
//! gain and partitioning) is implemented directly on [`DatasetView`].
use ndarray::Array2;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

mod impl_dataset;
mod impl_split;
mod keys;

pub use keys::{FeatureKey, FeatureKeys};

/// Immutable row-major matrix of `f64` values
///
/// The store is the single backing matrix of one dataset. Its shape is fixed once created.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct SampleStore {
    records: Array2<f64>,
}

/// Root dataset
///
/// Owns the sample store and the named feature keys describing its columns. Views created with
/// [`Dataset::view`] borrow the store and can not outlive the dataset.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    store: SampleStore,
    keys: FeatureKeys,
}

/// Reindirection layer over a borrowed sample store
///
/// Row `i` of the view is row `references[i]` of the store. Every reference is a valid row index
/// of the store.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    store: &'a SampleStore,
    references: Vec<usize>,
}

/// The two views produced by splitting on a column and threshold
#[derive(Debug, Clone)]
pub struct SplitPair<'a> {
    /// Rows with `row[column] <= threshold`
    pub le: DatasetView<'a>,
    /// Rows with `row[column] > threshold`
    pub g: DatasetView<'a>,
}

/// Distribution of rows over the two sides of a threshold
///
/// Both masses are fractions of the rows of the enumerated view, an empty view has both masses
/// set to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProbabilityMap {
    /// Fraction of rows with a value less than or equal to the threshold
    pub le: f64,
    /// Fraction of rows with a value greater than the threshold
    pub g: f64,
}

impl ProbabilityMap {
    /// Entropy of the distribution in base 10
    pub fn entropy(&self) -> f64 {
        entropy(&[self.g, self.le])
    }

    /// Majority decision of a distribution over a decision column
    ///
    /// Returns `true` if strictly more rows are above the threshold than below, exact ties
    /// resolve to `false`.
    pub fn majority(&self) -> bool {
        self.le < self.g
    }
}

/// Best threshold found for an attribute column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InformationGain {
    pub gain: f64,
    pub threshold: f64,
}

/// Entropy in base 10 of a list of probability masses
///
/// Masses equal to zero are skipped, so an empty list or a single mass of one yield zero.
pub fn entropy(masses: &[f64]) -> f64 {
    masses
        .iter()
        .filter(|mass| **mass > 0.0)
        .fold(0.0, |entropy, mass| entropy - mass * mass.log10())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn entropy_of_probability_masses() {
        assert_abs_diff_eq!(entropy(&[]), 0.0);
        assert_abs_diff_eq!(entropy(&[1.0]), 0.0);

        // zero masses do not contribute
        assert_abs_diff_eq!(
            entropy(&[0.5, 0.5, 0.0]),
            0.301029995663981,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            entropy(&[0.1, 0.2, 0.3, 0.4]),
            0.55583362792012,
            epsilon = 1e-9
        );
    }

    #[test]
    fn probability_map_entropy_and_majority() {
        let empty = ProbabilityMap::default();
        assert_eq!(empty.entropy(), 0.0);
        assert!(!empty.majority());

        let pure = ProbabilityMap { le: 0.0, g: 1.0 };
        assert_eq!(pure.entropy(), 0.0);
        assert!(pure.majority());

        let even = ProbabilityMap { le: 0.5, g: 0.5 };
        assert_abs_diff_eq!(even.entropy(), 0.301029995663981, epsilon = 1e-9);
        // ties go to `false`
        assert!(!even.majority());
    }
}
