//! `grove` provides the data layer of a random forest toolkit.
//!
//! A loaded [`Dataset`] owns a single immutable [`SampleStore`] of `f64` records. Training never
//! copies it: every subset used while growing trees (bootstrap samples, out-of-bag sets, the two
//! halves of a split) is a [`DatasetView`], an ordered list of row indices into the store.
//!
//! The split engine lives on [`DatasetView`] as well:
//!
//!  * [`DatasetView::enumerate_threshold`] summarizes a column as a [`ProbabilityMap`]
//!  * [`DatasetView::information_gain`] searches the best threshold of an attribute column
//!  * [`DatasetView::split`] partitions a view on a threshold
//!  * [`DatasetView::bootstrap_sample`] and [`DatasetView::out_of_bag_set`] build the bagging sets
//!
//! Algorithms built on top of this crate (the trees and forests in `grove-forest`) follow the
//! hyper-parameter pattern of [`ParamGuard`] and the traits in [`traits`].
//!
//! ```
//! use grove::Dataset;
//! use ndarray::array;
//!
//! let dataset = Dataset::new(array![[0., 1.], [0., 2.], [1., 3.], [1., 4.]]);
//! let best = dataset.view().information_gain(0, 1);
//! assert_eq!(best.threshold, 2.);
//! ```

pub mod dataset;
pub mod error;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{
    entropy, Dataset, DatasetView, FeatureKey, FeatureKeys, InformationGain, ProbabilityMap,
    SampleStore, SplitPair,
};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;
