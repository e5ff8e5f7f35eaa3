//!
//! # Random forests
//! `grove-forest` grows bagged forests of binary decision trees on top of the
//! [`grove`] dataset views.
//!
//! # The big picture
//!
//! Every tree of a forest is grown on a bootstrap sample of the training rows. At every node a
//! random subset of the split keys is evaluated and the node splits on the key and threshold with
//! the highest information gain, until no evaluated key gains anything. A forest classifies a row
//! by majority vote of its trees.
//!
//! Training never copies the sample store: bootstrap samples and the halves of every split are
//! [`grove::DatasetView`]s of the same store, shared read-only by all worker threads.
//!
//! # Current state
//!
//! `grove-forest` currently provides
//!
//!  * [`RandomTree`], a single tree with growth, classification and [Graphviz](RandomTree::draw)
//!    output
//!  * [`RandomForest`], grown concurrently by a thread pool with [`ForestParams`]
//!  * a compact little-endian binary format for trees and forests, see [`serialize`]
//!  * growth over shards of a dataset exchanged by message passing, see [`distributed`]
//!
//! ## Example
//!
//! ```rust
//! use grove::{prelude::*, Dataset, FeatureKeys};
//! use grove_forest::RandomForest;
//! use ndarray::{array, Array2};
//!
//! let records = Array2::from_shape_fn((100, 3), |(row, column)| match column {
//!     0 => (row % 10 >= 6) as usize as f64,
//!     1 => (row % 10) as f64,
//!     _ => (row % 7) as f64,
//! });
//! let dataset = Dataset::new(records);
//!
//! let forest = RandomForest::params(0, FeatureKeys::numbered(1..3))
//!     .tree_count(10)
//!     .keys_per_node(2)
//!     .fit(&dataset.view())?;
//!
//! assert!(forest.classify(&array![0., 8., 1.]));
//! assert!(!forest.classify(&array![0., 2., 1.]));
//! # Ok::<(), grove_forest::ForestError>(())
//! ```

pub mod distributed;
mod error;
mod random_forest;
mod random_tree;
pub mod serialize;

pub use error::{ForestError, Result};
pub use random_forest::*;
pub use random_tree::*;
