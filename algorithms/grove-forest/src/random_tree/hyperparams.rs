use grove::{FeatureKeys, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{ForestError, Result};
use crate::RandomTree;

/// The set of hyperparameters that can be specified for growing a
/// [random tree](struct.RandomTree.html).
///
/// ### Example
///
/// ```rust
/// use grove::{prelude::*, Dataset, FeatureKeys};
/// use grove_forest::RandomTree;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[0., 1.], [0., 2.], [1., 3.], [1., 4.]]);
/// let keys = FeatureKeys::new().with("A", 1);
///
/// let tree = RandomTree::params(0, keys).seed(7).fit(&dataset.view()).unwrap();
/// assert!(tree.classify(&array![0., 4.]));
/// assert!(!tree.classify(&array![0., 1.5]));
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct TreeValidParams {
    decision_column: usize,
    split_keys: FeatureKeys,
    keys_per_node: Option<usize>,
    seed: u64,
}

impl TreeValidParams {
    pub fn decision_column(&self) -> usize {
        self.decision_column
    }

    pub fn split_keys(&self) -> &FeatureKeys {
        &self.split_keys
    }

    /// Number of keys sampled at each node, the rounded up square root of the number of split
    /// keys unless set explicitly
    pub fn keys_per_node(&self) -> usize {
        self.keys_per_node
            .unwrap_or_else(|| default_keys_per_node(self.split_keys.len()))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct TreeParams(TreeValidParams);

impl TreeParams {
    pub fn new(decision_column: usize, split_keys: FeatureKeys) -> Self {
        Self(TreeValidParams {
            decision_column,
            split_keys,
            keys_per_node: None,
            seed: 42,
        })
    }

    /// Sets the number of keys drawn at random and evaluated at every node
    pub fn keys_per_node(mut self, keys_per_node: usize) -> Self {
        self.0.keys_per_node = Some(keys_per_node);
        self
    }

    /// Sets the seed of the random number generator used to sample keys
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl ParamGuard for TreeParams {
    type Checked = TreeValidParams;
    type Error = ForestError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let keys_per_node = self.0.keys_per_node();
        if keys_per_node == 0 {
            Err(grove::Error::Parameters("keys_per_node must be at least one".into()).into())
        } else if keys_per_node > self.0.split_keys.len() {
            Err(grove::Error::NotEnoughKeys {
                available: self.0.split_keys.len(),
                requested: keys_per_node,
            }
            .into())
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl RandomTree {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `keys_per_node = ceil(sqrt(split_keys.len()))`
    /// * `seed = 42`
    pub fn params(decision_column: usize, split_keys: FeatureKeys) -> TreeParams {
        TreeParams::new(decision_column, split_keys)
    }
}

pub(crate) fn default_keys_per_node(n_keys: usize) -> usize {
    ((n_keys as f64).sqrt().ceil() as usize).max(1)
}
