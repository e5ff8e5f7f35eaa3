mod common;

use grove::prelude::*;
use grove_forest::distributed::{forest_path, train_sharded};
use grove_forest::RandomForest;
use ndarray::Array1;

#[test]
fn sharded_forest_combines_all_workers() {
    let _ = env_logger::builder().is_test(true).try_init();

    let train = common::blobs(90, 1);
    let valid = common::blobs(30, 2);
    let params = RandomForest::params(0, train.split_keys(0))
        .tree_count(8)
        .keys_per_node(2)
        .n_workers(2)
        .check_unwrap();

    let directory = tempfile::tempdir().unwrap();
    let forest = train_sharded(&train, &params, 3, directory.path()).unwrap();
    assert_eq!(forest.len(), 3 * 8);

    for rank in 1..=3 {
        let shard = RandomForest::load(forest_path(directory.path(), rank)).unwrap();
        assert_eq!(shard.len(), 8);
    }

    let predictions: Array1<bool> = forest.predict(&valid.view());
    let accuracy = common::accuracy(&valid, predictions.as_slice().unwrap());
    assert!(accuracy >= 0.9, "accuracy {:.2}", accuracy);
}

#[test]
fn more_workers_than_rows() {
    let train = common::blobs(1, 4);
    let params = RandomForest::params(0, train.split_keys(0))
        .tree_count(2)
        .check_unwrap();

    let directory = tempfile::tempdir().unwrap();
    let forest = train_sharded(&train, &params, 4, directory.path()).unwrap();
    assert_eq!(forest.len(), 8);
}
