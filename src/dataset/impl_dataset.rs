use super::{Dataset, DatasetView, FeatureKeys, SampleStore};
use crate::error::{Error, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2, Axis};

impl SampleStore {
    /// Store of `rows` by `columns` zeros
    pub fn zeros(rows: usize, columns: usize) -> Self {
        SampleStore {
            records: Array2::zeros((rows, columns)),
        }
    }

    /// Create a store from a record matrix, converting it to row-major layout if necessary
    pub fn from_records(records: Array2<f64>) -> Self {
        let records = if records.is_standard_layout() {
            records
        } else {
            records.as_standard_layout().into_owned()
        };

        SampleStore { records }
    }

    pub fn nrows(&self) -> usize {
        self.records.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.records.ncols()
    }

    pub fn records(&self) -> ArrayView2<'_, f64> {
        self.records.view()
    }

    /// Physical row of the store
    ///
    /// # Panics
    ///
    /// If `row` is out of bounds
    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.records.index_axis(Axis(0), row)
    }
}

impl Dataset {
    /// Create a dataset without feature keys
    pub fn new(records: Array2<f64>) -> Self {
        Dataset {
            store: SampleStore::from_records(records),
            keys: FeatureKeys::new(),
        }
    }

    /// Dataset of `rows` by `columns` zeros, to be filled with [`Dataset::records_mut`]
    pub fn zeros(rows: usize, columns: usize) -> Self {
        Dataset {
            store: SampleStore::zeros(rows, columns),
            keys: FeatureKeys::new(),
        }
    }

    /// Create a dataset from a list of equally sized rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let ncols = rows.first().map(Vec::len).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * ncols);
        for row in rows {
            if row.len() != ncols {
                return Err(Error::ShapeMismatch {
                    expected: ncols,
                    found: row.len(),
                });
            }
            flat.extend_from_slice(row);
        }

        let records = Array2::from_shape_vec((rows.len(), ncols), flat)?;
        Ok(Dataset::new(records))
    }

    /// Attach feature keys to the dataset
    ///
    /// Fails if a key refers to a column outside of the store.
    pub fn with_keys(mut self, keys: FeatureKeys) -> Result<Self> {
        if let Some(column) = keys.max_column() {
            if column >= self.ncols() {
                return Err(Error::ColumnOutOfBounds {
                    column,
                    ncols: self.ncols(),
                });
            }
        }
        self.keys = keys;
        Ok(self)
    }

    pub fn keys(&self) -> &FeatureKeys {
        &self.keys
    }

    /// All keys except the one(s) naming the decision column
    pub fn split_keys(&self, decision_column: usize) -> FeatureKeys {
        self.keys.without_column(decision_column)
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn nrows(&self) -> usize {
        self.store.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.store.ncols()
    }

    /// Mutable access to the records while no view borrows the store
    pub fn records_mut(&mut self) -> ArrayViewMut2<'_, f64> {
        self.store.records.view_mut()
    }

    /// Mutable physical row
    ///
    /// # Panics
    ///
    /// If `row` is out of bounds
    pub fn row_mut(&mut self, row: usize) -> ArrayViewMut1<'_, f64> {
        self.store.records.index_axis_mut(Axis(0), row)
    }

    /// Root view over all rows in store order
    pub fn view(&self) -> DatasetView<'_> {
        DatasetView::full(&self.store)
    }
}

impl From<Array2<f64>> for Dataset {
    fn from(records: Array2<f64>) -> Self {
        Dataset::new(records)
    }
}

impl<'a> DatasetView<'a> {
    /// View with the identity reference list `0..store.nrows()`
    pub fn full(store: &'a SampleStore) -> Self {
        DatasetView {
            store,
            references: (0..store.nrows()).collect(),
        }
    }

    /// View over the given physical rows
    ///
    /// Fails if a reference is not a row of the store.
    pub fn with_references(store: &'a SampleStore, references: Vec<usize>) -> Result<Self> {
        if let Some(&row) = references.iter().find(|&&row| row >= store.nrows()) {
            return Err(Error::RowOutOfBounds {
                row,
                nrows: store.nrows(),
            });
        }

        Ok(DatasetView { store, references })
    }

    /// View with `rows` references to the first row of the store
    pub(crate) fn zeroed(store: &'a SampleStore, rows: usize) -> Self {
        DatasetView {
            store,
            references: vec![0; rows],
        }
    }

    pub(crate) fn from_references_unchecked(store: &'a SampleStore, references: Vec<usize>) -> Self {
        DatasetView { store, references }
    }

    pub fn store(&self) -> &'a SampleStore {
        self.store
    }

    /// Number of rows in this view
    pub fn nrows(&self) -> usize {
        self.references.len()
    }

    pub fn ncols(&self) -> usize {
        self.store.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Row `row` of the view, i.e. physical row `references[row]`
    ///
    /// # Panics
    ///
    /// If `row` is out of bounds
    pub fn row(&self, row: usize) -> ArrayView1<'a, f64> {
        self.store.row(self.references[row])
    }

    /// Value in `column` of view row `row`
    ///
    /// # Panics
    ///
    /// If `row` or `column` are out of bounds
    pub fn value(&self, row: usize, column: usize) -> f64 {
        self.store.records[(self.references[row], column)]
    }

    pub fn references(&self) -> &[usize] {
        &self.references
    }

    /// Physical row index of view row `row`
    pub fn reference(&self, row: usize) -> Option<usize> {
        self.references.get(row).copied()
    }

    /// Point view row `row` to physical row `target`
    pub fn set_reference(&mut self, row: usize, target: usize) -> Result<()> {
        if target >= self.store.nrows() {
            return Err(Error::RowOutOfBounds {
                row: target,
                nrows: self.store.nrows(),
            });
        }
        let nrows = self.nrows();
        match self.references.get_mut(row) {
            Some(reference) => {
                *reference = target;
                Ok(())
            }
            None => Err(Error::RowOutOfBounds { row, nrows }),
        }
    }

    /// Resize the reference list
    ///
    /// Shrinking truncates in place, growing fills the new slots with references to physical
    /// row zero. The sample store is never touched.
    pub fn resize(&mut self, rows: usize) {
        self.references.resize(rows, 0);
    }

    /// Whether the physical row `row` is referenced by this view
    pub fn contains(&self, row: usize) -> bool {
        self.references.contains(&row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn counting(rows: usize) -> Dataset {
        let mut dataset = Dataset::zeros(rows, 1);
        for (i, mut row) in dataset.records_mut().outer_iter_mut().enumerate() {
            row[0] = (i + 1) as f64;
        }
        dataset
    }

    #[test]
    fn root_view_is_identity() {
        let dataset = Dataset::zeros(10, 10);
        let view = dataset.view();

        assert_eq!(view.nrows(), 10);
        assert_eq!(view.ncols(), 10);
        assert_eq!(view.references(), &(0..10).collect::<Vec<_>>()[..]);
        assert!(view.row(3).iter().all(|x| *x == 0.0));
    }

    #[test]
    fn derived_views_default_to_first_row() {
        let dataset = counting(10);
        let view = DatasetView::zeroed(dataset.store(), 5);

        assert_eq!(view.nrows(), 5);
        assert!(view.references().iter().all(|r| *r == 0));
        assert!((0..5).all(|i| view.value(i, 0) == 1.0));
        assert!(std::ptr::eq(view.store(), dataset.store()));
    }

    #[test]
    fn rows_are_read_through_the_reference_list() {
        let dataset = counting(10);
        let reversed = (0..10).rev().collect();
        let view = DatasetView::with_references(dataset.store(), reversed).unwrap();

        for i in 0..10 {
            assert_eq!(view.value(i, 0), (10 - i) as f64);
            assert_eq!(view.row(i)[0], (10 - i) as f64);
        }
    }

    #[test]
    fn references_are_validated() {
        let dataset = counting(3);
        assert!(matches!(
            DatasetView::with_references(dataset.store(), vec![0, 3]),
            Err(Error::RowOutOfBounds { row: 3, nrows: 3 })
        ));

        let mut view = dataset.view();
        assert!(view.set_reference(0, 2).is_ok());
        assert_eq!(view.reference(0), Some(2));
        assert!(view.set_reference(0, 3).is_err());
        assert!(view.set_reference(3, 0).is_err());
    }

    #[test]
    fn resize_truncates_and_zero_fills() {
        let dataset = counting(10);
        let mut view = dataset.view();

        view.resize(5);
        assert_eq!(view.references(), &[0, 1, 2, 3, 4]);
        assert!(view.contains(4));
        assert!(!view.contains(5));

        view.resize(10);
        assert_eq!(view.references(), &[0, 1, 2, 3, 4, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn datasets_from_rows() {
        let dataset = Dataset::from_rows(&[vec![1., 2.], vec![3., 4.]]).unwrap();
        assert_eq!(dataset.store().records(), array![[1., 2.], [3., 4.]]);

        assert!(matches!(
            Dataset::from_rows(&[vec![1., 2.], vec![3.]]),
            Err(Error::ShapeMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn keys_must_fit_the_store() {
        let keys = FeatureKeys::new().with("x", 0).with("A", 1);
        assert!(Dataset::zeros(2, 2).with_keys(keys.clone()).is_ok());
        assert!(matches!(
            Dataset::zeros(2, 1).with_keys(keys),
            Err(Error::ColumnOutOfBounds { column: 1, ncols: 1 })
        ));
    }

    #[test]
    fn column_major_records_become_row_major() {
        let records = array![[1., 2.], [3., 4.]].reversed_axes();
        let store = SampleStore::from_records(records);
        assert!(store.records().is_standard_layout());
        assert_eq!(store.row(0), array![1., 3.]);
    }
}
