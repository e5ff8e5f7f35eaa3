//! Error types in grove
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("invalid parameter {0}")]
    Parameters(String),
    /// Fewer candidate split keys than the number sampled at each node
    #[error("{requested} keys per node requested, but only {available} split keys are available")]
    NotEnoughKeys { available: usize, requested: usize },
    #[error("column {column} is out of bounds for a dataset with {ncols} columns")]
    ColumnOutOfBounds { column: usize, ncols: usize },
    #[error("row {row} is out of bounds for a sample store with {nrows} rows")]
    RowOutOfBounds { row: usize, nrows: usize },
    #[error("row of width {found} does not fit a dataset with {expected} columns")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
