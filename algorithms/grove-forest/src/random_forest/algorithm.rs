use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use grove::traits::BinaryClassifier;
use ndarray::{ArrayBase, Data, Ix1};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::Result;
use crate::serialize::{read_u64, write_u64};
use crate::RandomTree;

/// Tally of the tree decisions for a single row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Votes {
    pub positive: usize,
    pub negative: usize,
}

impl Votes {
    /// Strict majority, ties vote `false`
    pub fn decision(&self) -> bool {
        self.positive > self.negative
    }
}

/// An unordered collection of independently grown random trees
///
/// Rows are classified by majority vote of all trees. A forest without trees classifies every row
/// as `false`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RandomForest {
    trees: Vec<RandomTree>,
}

impl RandomForest {
    pub fn new() -> Self {
        RandomForest { trees: Vec::new() }
    }

    pub fn from_trees(trees: Vec<RandomTree>) -> Self {
        RandomForest { trees }
    }

    pub fn trees(&self) -> &[RandomTree] {
        &self.trees
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn push(&mut self, tree: RandomTree) {
        self.trees.push(tree);
    }

    /// Move all trees of `other` into this forest
    pub fn append(&mut self, mut other: RandomForest) {
        self.trees.append(&mut other.trees);
    }

    pub fn votes<S: Data<Elem = f64>>(&self, row: &ArrayBase<S, Ix1>) -> Votes {
        let positive = self.trees.iter().filter(|tree| tree.classify(row)).count();
        Votes {
            positive,
            negative: self.trees.len() - positive,
        }
    }

    pub fn classify<S: Data<Elem = f64>>(&self, row: &ArrayBase<S, Ix1>) -> bool {
        self.votes(row).decision()
    }

    /// Write the number of trees followed by every tree
    pub fn serialize<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_u64(writer, self.trees.len() as u64)?;
        for tree in &self.trees {
            tree.serialize(writer)?;
        }
        Ok(())
    }

    /// Read a forest written by [`RandomForest::serialize`]
    pub fn deserialize<R: Read>(reader: &mut R) -> Result<Self> {
        let mut forest = RandomForest::new();
        forest.deserialize_append(reader)?;
        Ok(forest)
    }

    /// Read a serialized forest and append its trees, returning the number of trees read
    ///
    /// On error the trees read so far stay appended.
    pub fn deserialize_append<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let count = read_u64(reader)?;
        for _ in 0..count {
            self.trees.push(RandomTree::deserialize(reader)?);
        }
        Ok(count as usize)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.serialize(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut forest = RandomForest::new();
        forest.load_append(path)?;
        Ok(forest)
    }

    pub fn load_append<P: AsRef<Path>>(&mut self, path: P) -> Result<usize> {
        let mut reader = BufReader::new(File::open(path)?);
        self.deserialize_append(&mut reader)
    }
}

impl BinaryClassifier for RandomForest {
    fn classify<S: Data<Elem = f64>>(&self, row: &ArrayBase<S, Ix1>) -> bool {
        RandomForest::classify(self, row)
    }
}

impl From<Vec<RandomTree>> for RandomForest {
    fn from(trees: Vec<RandomTree>) -> Self {
        RandomForest::from_trees(trees)
    }
}

impl Extend<RandomTree> for RandomForest {
    fn extend<I: IntoIterator<Item = RandomTree>>(&mut self, iter: I) {
        self.trees.extend(iter)
    }
}
