use grove::{
    dataset::{DatasetView, FeatureKey, FeatureKeys, SplitPair},
    traits::{BinaryClassifier, Fit},
};
use log::trace;
use ndarray::{ArrayBase, Data, Ix1};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use super::{Node, NodeIter, TreeValidParams};
use crate::error::{ForestError, Result};

/// Action label of the root node
pub const ROOT_ACTION: &str = "<root>";

/// A fitted binary decision tree
///
/// The tree is grown greedily: at every node a random subset of the split keys is drawn and the
/// node splits on the key and threshold with the highest information gain. Growth stops at a node
/// when none of the drawn keys gains any information, the node then becomes a leaf voting for the
/// majority of its rows. There is no depth limit.
///
/// A tree without root is valid and classifies every row as `false`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RandomTree {
    root: Option<Node>,
}

impl RandomTree {
    /// Empty tree
    pub fn new() -> Self {
        RandomTree { root: None }
    }

    pub fn from_root(root: Node) -> Self {
        RandomTree { root: Some(root) }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Grow a tree on `view`, predicting `decision_column` from the columns of `keys`
    ///
    /// Fails if fewer than `keys_per_node` keys are available or if the decision column or a key
    /// is out of bounds for the view.
    pub fn grow<R: Rng + ?Sized>(
        view: &DatasetView<'_>,
        keys: &FeatureKeys,
        keys_per_node: usize,
        decision_column: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if keys.len() < keys_per_node {
            return Err(grove::Error::NotEnoughKeys {
                available: keys.len(),
                requested: keys_per_node,
            }
            .into());
        }
        let ncols = view.ncols();
        let max_column = keys.max_column().unwrap_or(0).max(decision_column);
        if max_column >= ncols {
            return Err(grove::Error::ColumnOutOfBounds {
                column: max_column,
                ncols,
            }
            .into());
        }

        Ok(Self::grow_unchecked(
            view,
            keys,
            keys_per_node,
            decision_column,
            rng,
        ))
    }

    /// Grow a tree without validating the inputs
    ///
    /// An empty tree is returned if fewer than `keys_per_node` keys are available.
    ///
    /// # Panics
    ///
    /// If the decision column or a key is out of bounds for the view
    pub fn grow_unchecked<R: Rng + ?Sized>(
        view: &DatasetView<'_>,
        keys: &FeatureKeys,
        keys_per_node: usize,
        decision_column: usize,
        rng: &mut R,
    ) -> Self {
        if keys.len() < keys_per_node {
            return RandomTree::new();
        }

        let grower = Grower {
            keys,
            keys_per_node,
            decision_column,
        };
        RandomTree::from_root(grower.grow(view, ROOT_ACTION.to_string(), rng))
    }

    /// Classify a single row, degenerate trees vote `false`
    ///
    /// An empty tree, a split without children or a split column outside of the row all
    /// classify as `false`.
    pub fn classify<S: Data<Elem = f64>>(&self, row: &ArrayBase<S, Ix1>) -> bool {
        self.try_classify(row).unwrap_or(false)
    }

    /// Classify a single row, reporting degenerate trees as errors
    pub fn try_classify<S: Data<Elem = f64>>(&self, row: &ArrayBase<S, Ix1>) -> Result<bool> {
        let mut node = self.root.as_ref().ok_or(ForestError::EmptyTree)?;
        loop {
            match node {
                Node::Leaf { classification, .. } => return Ok(*classification),
                Node::Split {
                    column,
                    threshold,
                    children,
                    ..
                } => {
                    let children = children.as_ref().ok_or(ForestError::UnlinkedSplit)?;
                    let value = row.get(*column).ok_or(grove::Error::ColumnOutOfBounds {
                        column: *column,
                        ncols: row.len(),
                    })?;
                    node = &children[(*value > *threshold) as usize];
                }
            }
        }
    }

    /// Render the tree as an undirected Graphviz graph
    ///
    /// Nodes are numbered in level order, every node line is followed by the edges to its
    /// children. An empty tree draws as the empty string.
    pub fn draw(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut output = String::from("graph G{\n");
        let mut last_id = 0;
        for (id, node) in self.iter_nodes().enumerate() {
            output.push_str(&format!("N{}[{}];\n", id, node.draw()));
            for _ in node.children() {
                last_id += 1;
                output.push_str(&format!("N{} -- N{};\n", id, last_id));
            }
        }
        output.push('}');
        output
    }

    /// Create a node iterator in level-order (BFT)
    pub fn iter_nodes(&self) -> NodeIter<'_> {
        NodeIter::new(self.root.as_ref())
    }

    pub fn num_nodes(&self) -> usize {
        self.iter_nodes().count()
    }

    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }

    /// Number of levels, zero for an empty tree
    pub fn depth(&self) -> usize {
        fn depth_of(node: &Node) -> usize {
            1 + node.children().iter().map(depth_of).max().unwrap_or(0)
        }
        self.root.as_ref().map(depth_of).unwrap_or(0)
    }
}

impl BinaryClassifier for RandomTree {
    fn classify<S: Data<Elem = f64>>(&self, row: &ArrayBase<S, Ix1>) -> bool {
        RandomTree::classify(self, row)
    }
}

impl Fit<ForestError> for TreeValidParams {
    type Object = RandomTree;

    fn fit(&self, dataset: &DatasetView<'_>) -> Result<Self::Object> {
        let mut rng = StdRng::seed_from_u64(self.seed());
        RandomTree::grow(
            dataset,
            self.split_keys(),
            self.keys_per_node(),
            self.decision_column(),
            &mut rng,
        )
    }
}

/// Recursive growth state shared by all nodes of one tree
struct Grower<'k> {
    keys: &'k FeatureKeys,
    keys_per_node: usize,
    decision_column: usize,
}

impl<'k> Grower<'k> {
    /// Grow the subtree of `view`
    ///
    /// Child actions read `"<key> <= <threshold>"` and `"<key> > <threshold>"`, the threshold
    /// printed with the shortest `f64` representation that reads back exactly, not a fixed number
    /// of digits. On equal gains the key drawn first wins.
    fn grow<R: Rng + ?Sized>(&self, view: &DatasetView<'_>, action: String, rng: &mut R) -> Node {
        let class_distribution = view.enumerate_threshold(self.decision_column, 0.0);

        let mut best: Option<(&FeatureKey, f64)> = None;
        let mut highest_gain = 0.0;
        for key in self.sample_keys(rng) {
            let ig = view.information_gain(self.decision_column, key.column());
            if ig.gain > highest_gain {
                highest_gain = ig.gain;
                best = Some((key, ig.threshold));
            }
        }

        match best {
            None => {
                let classification = class_distribution.majority();
                trace!(
                    "leaf {} with {} rows votes {}",
                    action,
                    view.nrows(),
                    classification
                );
                Node::leaf(action, classification)
            }
            Some((key, threshold)) => {
                trace!(
                    "split {} on {} at {} gaining {}",
                    action,
                    key.name(),
                    threshold,
                    highest_gain
                );
                let SplitPair { le, g } = view.split(key.column(), threshold);
                let le_node = self.grow(&le, format!("{} <= {}", key.name(), threshold), rng);
                let g_node = self.grow(&g, format!("{} > {}", key.name(), threshold), rng);

                Node::branch(action, key.column(), threshold, le_node, g_node)
            }
        }
    }

    /// Uniform random subset of `keys_per_node` distinct keys, in the order they were drawn
    fn sample_keys<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&'k FeatureKey> {
        let mut indices = Vec::with_capacity(self.keys_per_node);
        while indices.len() < self.keys_per_node {
            let index = rng.gen_range(0..self.keys.len());
            if !indices.contains(&index) {
                indices.push(index);
            }
        }

        indices
            .into_iter()
            .filter_map(|index| self.keys.get(index))
            .collect()
    }
}
