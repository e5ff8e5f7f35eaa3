use std::iter::FromIterator;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A named column of a dataset
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureKey {
    name: String,
    column: usize,
}

impl FeatureKey {
    pub fn new<S: Into<String>>(name: S, column: usize) -> Self {
        FeatureKey {
            name: name.into(),
            column,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

/// Ordered list of named columns
///
/// Names are unique, inserting a name a second time replaces its column and keeps its position.
/// The order of the keys is the order in which random key subsets are drawn from.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureKeys {
    keys: Vec<FeatureKey>,
}

impl FeatureKeys {
    pub fn new() -> Self {
        FeatureKeys::default()
    }

    /// Keys `f<column>` for every column in `columns`
    ///
    /// ```
    /// use grove::FeatureKeys;
    ///
    /// let keys = FeatureKeys::numbered(1..4);
    /// assert_eq!(keys.column_of("f1"), Some(1));
    /// assert_eq!(keys.len(), 3);
    /// ```
    pub fn numbered(columns: Range<usize>) -> Self {
        columns
            .map(|column| (format!("f{}", column), column))
            .collect()
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, column: usize) {
        let name = name.into();
        match self.keys.iter_mut().find(|key| key.name == name) {
            Some(key) => key.column = column,
            None => self.keys.push(FeatureKey { name, column }),
        }
    }

    /// Adds a key, builder style
    pub fn with<S: Into<String>>(mut self, name: S, column: usize) -> Self {
        self.insert(name, column);
        self
    }

    /// Copy of the keys without the key called `name`
    pub fn without(&self, name: &str) -> Self {
        self.keys
            .iter()
            .filter(|key| key.name != name)
            .cloned()
            .collect()
    }

    /// Copy of the keys without any key mapping to `column`
    pub fn without_column(&self, column: usize) -> Self {
        self.keys
            .iter()
            .filter(|key| key.column != column)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FeatureKey> {
        self.keys.get(index)
    }

    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.keys
            .iter()
            .find(|key| key.name == name)
            .map(|key| key.column)
    }

    /// Largest column referenced by any key
    pub fn max_column(&self) -> Option<usize> {
        self.keys.iter().map(|key| key.column).max()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureKey> {
        self.keys.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, usize)> for FeatureKeys {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut keys = FeatureKeys::new();
        for (name, column) in iter {
            keys.insert(name, column);
        }
        keys
    }
}

impl FromIterator<FeatureKey> for FeatureKeys {
    fn from_iter<I: IntoIterator<Item = FeatureKey>>(iter: I) -> Self {
        iter.into_iter()
            .map(|key| (key.name, key.column))
            .collect()
    }
}
