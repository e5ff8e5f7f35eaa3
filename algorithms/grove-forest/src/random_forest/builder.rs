use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use grove::{dataset::DatasetView, traits::Fit};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::ThreadPoolBuilder;

use super::{ForestValidParams, RandomForest};
use crate::error::{ForestError, Result};
use crate::RandomTree;

/// Shared counter of the trees grown so far
///
/// Cloned handles observe the same counter, so a caller may keep one handle and watch another
/// build progress. The count never decreases.
#[derive(Debug, Clone, Default)]
pub struct Progress(Arc<AtomicUsize>);

impl Progress {
    pub fn new() -> Self {
        Progress::default()
    }

    /// Number of trees received by the coordinator
    pub fn grown(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn advance(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Work share of one growth task
#[derive(Debug)]
struct Task {
    trees: usize,
    rng: StdRng,
}

/// Split `tree_count` trees over at most `n_workers` tasks, each with its own generator seeded
/// from `seed`
fn plan_tasks(tree_count: usize, n_workers: usize, seed: u64) -> Vec<Task> {
    let n_tasks = n_workers.min(tree_count).max(1);
    let mut master = StdRng::seed_from_u64(seed);

    (0..n_tasks)
        .map(|task| Task {
            trees: tree_count / n_tasks + (task < tree_count % n_tasks) as usize,
            rng: StdRng::seed_from_u64(master.gen()),
        })
        .collect()
}

impl ForestValidParams {
    /// Grow the forest and report every received tree on `progress`
    ///
    /// Trees are grown by a pool of `n_workers` threads. Every task draws its bootstrap samples
    /// from `view` and publishes finished trees on a channel, the calling thread collects them in
    /// arrival order.
    pub fn grow(&self, view: &DatasetView<'_>, progress: &Progress) -> Result<RandomForest> {
        let ncols = view.ncols();
        let max_column = self
            .split_keys()
            .max_column()
            .unwrap_or(0)
            .max(self.decision_column());
        if max_column >= ncols {
            return Err(grove::Error::ColumnOutOfBounds {
                column: max_column,
                ncols,
            }
            .into());
        }

        let tree_count = self.tree_count();
        let bootstrap_size = self.bootstrap_size().unwrap_or_else(|| view.nrows());
        let keys_per_node = self.keys_per_node();
        let decision_column = self.decision_column();
        let keys = self.split_keys();

        let tasks = plan_tasks(tree_count, self.n_workers(), self.seed());
        let pool = ThreadPoolBuilder::new().num_threads(tasks.len()).build()?;
        debug!(
            "growing {} trees from {} bootstrap rows on {} workers",
            tree_count,
            bootstrap_size,
            tasks.len()
        );

        let (sender, receiver) = crossbeam_channel::unbounded::<RandomTree>();
        let forest = pool.in_place_scope(|scope| {
            for Task { trees, mut rng } in tasks {
                let sender = sender.clone();
                scope.spawn(move |_| {
                    for _ in 0..trees {
                        let sample = view.bootstrap_sample(bootstrap_size, &mut rng);
                        let tree = RandomTree::grow_unchecked(
                            &sample,
                            keys,
                            keys_per_node,
                            decision_column,
                            &mut rng,
                        );
                        if sender.send(tree).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(sender);

            let mut forest = RandomForest::new();
            for tree in receiver.iter().take(tree_count) {
                forest.push(tree);
                let grown = progress.advance();
                if grown % 10 == 0 {
                    debug!("{} of {} trees grown", grown, tree_count);
                }
            }
            forest
        });

        if forest.len() < tree_count {
            return Err(ForestError::Channel(format!(
                "only {} of {} trees were received",
                forest.len(),
                tree_count
            )));
        }
        info!("forest of {} trees grown", forest.len());

        Ok(forest)
    }
}

impl Fit<ForestError> for ForestValidParams {
    type Object = RandomForest;

    fn fit(&self, dataset: &DatasetView<'_>) -> Result<Self::Object> {
        self.grow(dataset, &Progress::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove::{Dataset, FeatureKeys, ParamGuard};
    use ndarray::Array2;

    fn separable(rows: usize) -> Dataset {
        Dataset::new(Array2::from_shape_fn((rows, 4), |(row, column)| match column {
            0 => (row % 10 >= 5) as usize as f64,
            1 => (row % 10) as f64,
            2 => (row * 7 % 13) as f64,
            _ => (row % 3) as f64,
        }))
    }

    #[test]
    fn work_is_split_evenly() {
        let shares = |tree_count, n_workers| -> Vec<usize> {
            plan_tasks(tree_count, n_workers, 0)
                .into_iter()
                .map(|task| task.trees)
                .collect()
        };

        assert_eq!(shares(10, 3), vec![4, 3, 3]);
        assert_eq!(shares(9, 3), vec![3, 3, 3]);
        assert_eq!(shares(2, 4), vec![1, 1]);
        assert_eq!(shares(1, 1), vec![1]);
    }

    #[test]
    fn grows_exactly_tree_count_trees() {
        let dataset = separable(60);
        for n_workers in 1..5 {
            let progress = Progress::new();
            let forest = RandomForest::params(0, FeatureKeys::numbered(1..4))
                .tree_count(13)
                .n_workers(n_workers)
                .check_unwrap()
                .grow(&dataset.view(), &progress)
                .unwrap();

            assert_eq!(forest.len(), 13);
            assert_eq!(progress.grown(), 13);
            assert!(forest.trees().iter().all(|tree| !tree.is_empty()));
        }
    }

    #[test]
    fn same_seed_grows_same_trees() {
        let dataset = separable(60);
        let params = RandomForest::params(0, FeatureKeys::numbered(1..4))
            .tree_count(12)
            .bootstrap_size(40)
            .n_workers(3)
            .seed(7);

        let drawings = |forest: RandomForest| {
            let mut drawings: Vec<_> = forest.trees().iter().map(RandomTree::draw).collect();
            drawings.sort();
            drawings
        };
        let first = drawings(params.fit(&dataset.view()).unwrap());
        let second = drawings(params.fit(&dataset.view()).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_out_of_bounds_columns() {
        let dataset = separable(10);
        let result = RandomForest::params(4, FeatureKeys::numbered(1..4))
            .tree_count(2)
            .fit(&dataset.view());
        assert!(matches!(
            result,
            Err(ForestError::BaseCrate(grove::Error::ColumnOutOfBounds {
                column: 4,
                ncols: 4
            }))
        ));
    }
}
