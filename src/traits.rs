//! Provide traits for different classes of algorithms
//!

use crate::dataset::DatasetView;
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset view and creates a concept of some kind about it. The
/// view only selects rows of a shared sample store, so fitting never copies the records.
pub trait Fit<E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetView<'_>) -> Result<Self::Object, E>;
}

/// Predict with model
///
/// This trait assumes the `BinaryClassifier` implementation and provides additional input/output
/// combinations.
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

/// Binary decision of a single row
///
/// Classifiers in this crate only decide between `false` (class 0) and `true` (class 1).
pub trait BinaryClassifier {
    fn classify<S: Data<Elem = f64>>(&self, row: &ArrayBase<S, Ix1>) -> bool;
}

/// Classify every row of a dataset view, in view order
impl<'a, 'b, C: BinaryClassifier> Predict<&'b DatasetView<'a>, Array1<bool>> for C {
    fn predict(&self, x: &'b DatasetView<'a>) -> Array1<bool> {
        (0..x.nrows()).map(|i| self.classify(&x.row(i))).collect()
    }
}

/// Classify every row of a record matrix
impl<'b, S: Data<Elem = f64>, C: BinaryClassifier> Predict<&'b ArrayBase<S, Ix2>, Array1<bool>>
    for C
{
    fn predict(&self, x: &'b ArrayBase<S, Ix2>) -> Array1<bool> {
        x.rows().into_iter().map(|row| self.classify(&row)).collect()
    }
}
