use grove::{FeatureKeys, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{ForestError, Result};
use crate::random_tree::default_keys_per_node;
use crate::RandomForest;

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ForestValidParams {
    decision_column: usize,
    split_keys: FeatureKeys,
    tree_count: usize,
    bootstrap_size: Option<usize>,
    keys_per_node: Option<usize>,
    n_workers: Option<usize>,
    seed: u64,
}

impl ForestValidParams {
    pub fn decision_column(&self) -> usize {
        self.decision_column
    }

    pub fn split_keys(&self) -> &FeatureKeys {
        &self.split_keys
    }

    pub fn tree_count(&self) -> usize {
        self.tree_count
    }

    /// Rows drawn for every tree, `None` draws as many rows as the training view holds
    pub fn bootstrap_size(&self) -> Option<usize> {
        self.bootstrap_size
    }

    pub fn keys_per_node(&self) -> usize {
        self.keys_per_node
            .unwrap_or_else(|| default_keys_per_node(self.split_keys.len()))
    }

    /// Size of the worker pool, rayon's current thread count unless set explicitly
    pub fn n_workers(&self) -> usize {
        self.n_workers.unwrap_or_else(rayon::current_num_threads)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Copy of the parameters growing from another seed
    pub(crate) fn reseeded(&self, seed: u64) -> Self {
        ForestValidParams {
            seed,
            ..self.clone()
        }
    }
}

/// The set of hyperparameters that can be specified for growing a
/// [random forest](struct.RandomForest.html).
///
/// ### Example
///
/// ```rust
/// use grove::{prelude::*, Dataset, FeatureKeys};
/// use grove_forest::RandomForest;
/// use ndarray::Array2;
///
/// let records = Array2::from_shape_fn((40, 3), |(row, column)| match column {
///     0 => (row >= 20) as usize as f64,
///     1 => row as f64,
///     _ => (row % 3) as f64,
/// });
/// let dataset = Dataset::new(records);
///
/// let forest = RandomForest::params(0, FeatureKeys::numbered(1..3))
///     .tree_count(16)
///     .keys_per_node(2)
///     .n_workers(2)
///     .fit(&dataset.view())
///     .unwrap();
/// assert_eq!(forest.len(), 16);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct ForestParams(ForestValidParams);

impl ForestParams {
    pub fn new(decision_column: usize, split_keys: FeatureKeys) -> Self {
        Self(ForestValidParams {
            decision_column,
            split_keys,
            tree_count: 100,
            bootstrap_size: None,
            keys_per_node: None,
            n_workers: None,
            seed: 42,
        })
    }

    /// Sets the number of trees in the forest
    pub fn tree_count(mut self, tree_count: usize) -> Self {
        self.0.tree_count = tree_count;
        self
    }

    /// Sets the number of rows drawn with replacement for every tree
    pub fn bootstrap_size(mut self, bootstrap_size: usize) -> Self {
        self.0.bootstrap_size = Some(bootstrap_size);
        self
    }

    /// Sets the number of keys drawn at random and evaluated at every node
    pub fn keys_per_node(mut self, keys_per_node: usize) -> Self {
        self.0.keys_per_node = Some(keys_per_node);
        self
    }

    /// Sets the number of threads growing trees
    pub fn n_workers(mut self, n_workers: usize) -> Self {
        self.0.n_workers = Some(n_workers);
        self
    }

    /// Sets the master seed from which every worker seeds its generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

impl ParamGuard for ForestParams {
    type Checked = ForestValidParams;
    type Error = ForestError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        let params = &self.0;

        if params.tree_count == 0 {
            invalid("tree_count must be at least one")
        } else if params.bootstrap_size == Some(0) {
            invalid("bootstrap_size must be at least one")
        } else if params.keys_per_node() == 0 {
            invalid("keys_per_node must be at least one")
        } else if params.n_workers == Some(0) {
            invalid("n_workers must be at least one")
        } else if params.keys_per_node() > params.split_keys.len() {
            Err(grove::Error::NotEnoughKeys {
                available: params.split_keys.len(),
                requested: params.keys_per_node(),
            }
            .into())
        } else {
            Ok(params)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

fn invalid<T>(message: &str) -> Result<T> {
    Err(grove::Error::Parameters(message.to_string()).into())
}

impl RandomForest {
    /// Defaults are provided if the optional parameters are not specified:
    /// * `tree_count = 100`
    /// * `bootstrap_size`: the number of rows of the training view
    /// * `keys_per_node = ceil(sqrt(split_keys.len()))`
    /// * `n_workers = rayon::current_num_threads()`
    /// * `seed = 42`
    pub fn params(decision_column: usize, split_keys: FeatureKeys) -> ForestParams {
        ForestParams::new(decision_column, split_keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_parameter_error(result: Result<ForestValidParams>) -> bool {
        matches!(
            result,
            Err(ForestError::BaseCrate(grove::Error::Parameters(_)))
        )
    }

    #[test]
    fn default_params() {
        let params = RandomForest::params(0, FeatureKeys::numbered(1..10)).check_unwrap();
        assert_eq!(params.tree_count(), 100);
        assert_eq!(params.bootstrap_size(), None);
        assert_eq!(params.keys_per_node(), 3);
        assert_eq!(params.n_workers(), rayon::current_num_threads());
        assert_eq!(params.seed(), 42);
        assert_eq!(params.reseeded(43).seed(), 43);
    }

    #[test]
    fn invalid_params() {
        let params = || RandomForest::params(0, FeatureKeys::numbered(1..5));

        assert!(is_parameter_error(params().tree_count(0).check()));
        assert!(is_parameter_error(params().bootstrap_size(0).check()));
        assert!(is_parameter_error(params().keys_per_node(0).check()));
        assert!(is_parameter_error(params().n_workers(0).check()));
        assert!(matches!(
            params().keys_per_node(5).check(),
            Err(ForestError::BaseCrate(grove::Error::NotEnoughKeys {
                available: 4,
                requested: 5
            }))
        ));
        assert!(params().keys_per_node(4).n_workers(3).check().is_ok());
    }
}
