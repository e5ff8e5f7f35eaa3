//! Sharded forest growth
//!
//! The coordinator (rank 0) deals the rows of a dataset round robin to the worker ranks. Every
//! worker grows a forest on its shard, stores it as `forest_<rank>.bin` in a directory shared
//! with the coordinator and reports back. The coordinator then reads all worker forests into a
//! single combined forest.
//!
//! Ranks talk through a [`MessageChannel`]. [`LocalCluster`] connects ranks living in the same
//! process, [`train_sharded`] runs a complete build on one.
use std::path::{Path, PathBuf};

use grove::{traits::Fit, Dataset};
use log::{debug, info};
use ndarray::Array1;

use crate::error::{ForestError, Result};
use crate::{ForestValidParams, RandomForest};

mod local;

pub use local::{LocalCluster, LocalEndpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// A data row, or the end of the shard if its decision value is NaN
    Row,
    /// A worker finished writing its forest
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub kind: MessageKind,
    pub payload: Vec<f64>,
}

impl Message {
    pub fn row(values: Vec<f64>) -> Self {
        Message {
            kind: MessageKind::Row,
            payload: values,
        }
    }

    pub fn done() -> Self {
        Message {
            kind: MessageKind::Done,
            payload: Vec::new(),
        }
    }
}

/// Blocking point-to-point transport between ranks `0..size()`
pub trait MessageChannel {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    fn send(&self, to: usize, message: Message) -> Result<()>;

    /// Wait for the next message addressed to this rank
    fn recv(&self) -> Result<Message>;
}

/// Path of the forest file written by worker `rank`
pub fn forest_path<P: AsRef<Path>>(directory: P, rank: usize) -> PathBuf {
    directory.as_ref().join(format!("forest_{}.bin", rank))
}

/// Deal row `i` to worker `1 + i % workers`, then end every shard with a sentinel row
///
/// The sentinel has the width of the dataset and NaN in the decision column.
pub fn distribute_rows<C: MessageChannel>(
    channel: &C,
    dataset: &Dataset,
    decision_column: usize,
) -> Result<()> {
    if channel.size() < 2 {
        return Err(ForestError::Channel(
            "at least one worker rank is required".into(),
        ));
    }
    if decision_column >= dataset.ncols() {
        return Err(grove::Error::ColumnOutOfBounds {
            column: decision_column,
            ncols: dataset.ncols(),
        }
        .into());
    }

    let workers = channel.size() - 1;
    for (i, row) in dataset.store().records().outer_iter().enumerate() {
        channel.send(1 + i % workers, Message::row(row.to_vec()))?;
    }

    let mut sentinel = Array1::zeros(dataset.ncols());
    sentinel[decision_column] = f64::NAN;
    for worker in 1..=workers {
        channel.send(worker, Message::row(sentinel.to_vec()))?;
    }
    debug!(
        "dealt {} rows to {} workers",
        dataset.nrows(),
        workers
    );

    Ok(())
}

/// Receive rows up to the sentinel row
pub fn receive_shard<C: MessageChannel>(channel: &C, decision_column: usize) -> Result<Dataset> {
    let mut rows = Vec::new();
    let width = loop {
        let message = channel.recv()?;
        if message.kind != MessageKind::Row {
            return Err(ForestError::Channel(format!(
                "rank {} expected a row, received {:?}",
                channel.rank(),
                message.kind
            )));
        }
        match message.payload.get(decision_column) {
            Some(decision) if decision.is_nan() => break message.payload.len(),
            Some(_) => rows.push(message.payload),
            None => {
                return Err(grove::Error::ColumnOutOfBounds {
                    column: decision_column,
                    ncols: message.payload.len(),
                }
                .into())
            }
        }
    };

    if rows.is_empty() {
        Ok(Dataset::zeros(0, width))
    } else {
        Ok(Dataset::from_rows(&rows)?)
    }
}

/// Grow the forest of one worker rank and store it in `directory`
///
/// The worker seeds its generators with `params.seed() + rank`. `Done` is sent to the coordinator
/// once the forest file is complete.
pub fn run_worker<C: MessageChannel, P: AsRef<Path>>(
    channel: &C,
    params: &ForestValidParams,
    directory: P,
) -> Result<PathBuf> {
    let rank = channel.rank();
    let shard = receive_shard(channel, params.decision_column())?;
    debug!("worker {} received {} rows", rank, shard.nrows());

    let forest = params
        .reseeded(params.seed().wrapping_add(rank as u64))
        .fit(&shard.view())?;

    let path = forest_path(directory, rank);
    forest.save(&path)?;
    channel.send(0, Message::done())?;

    Ok(path)
}

/// Wait for every worker and combine their forests in rank order
pub fn collect_forests<C: MessageChannel, P: AsRef<Path>>(
    channel: &C,
    directory: P,
) -> Result<RandomForest> {
    let workers = channel.size().saturating_sub(1);

    let mut done = 0;
    while done < workers {
        let message = channel.recv()?;
        match message.kind {
            MessageKind::Done => done += 1,
            MessageKind::Row => {
                return Err(ForestError::Channel(
                    "coordinator received a row while waiting for workers".into(),
                ))
            }
        }
    }

    let mut forest = RandomForest::new();
    for rank in 1..=workers {
        let trees = forest.load_append(forest_path(&directory, rank))?;
        debug!("worker {} contributed {} trees", rank, trees);
    }
    info!(
        "combined forest of {} trees from {} workers",
        forest.len(),
        workers
    );

    Ok(forest)
}

/// Grow a forest on `workers` shards of `dataset` inside this process
///
/// Every worker grows `params.tree_count()` trees, the combined forest holds
/// `workers * params.tree_count()` trees. Forest files are exchanged through `directory`.
pub fn train_sharded<P: AsRef<Path>>(
    dataset: &Dataset,
    params: &ForestValidParams,
    workers: usize,
    directory: P,
) -> Result<RandomForest> {
    if workers == 0 {
        return Err(grove::Error::Parameters("workers must be at least one".into()).into());
    }
    // workers block until their shard is complete, so the coordinator must not fail halfway
    if params.decision_column() >= dataset.ncols() {
        return Err(grove::Error::ColumnOutOfBounds {
            column: params.decision_column(),
            ncols: dataset.ncols(),
        }
        .into());
    }

    let directory = directory.as_ref();
    let mut endpoints = LocalCluster::new(workers + 1).into_endpoints().into_iter();
    let coordinator = endpoints
        .next()
        .ok_or_else(|| ForestError::Channel("cluster without coordinator".into()))?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = endpoints
            .map(|endpoint| {
                scope.spawn(move || {
                    // unblocks the coordinator on failure, the error is reported on join
                    let mut guard = DoneGuard::new(&endpoint);
                    let result = run_worker(&endpoint, params, directory);
                    if result.is_ok() {
                        guard.disarm();
                    }
                    result
                })
            })
            .collect();

        let forest = distribute_rows(&coordinator, dataset, params.decision_column())
            .and_then(|_| collect_forests(&coordinator, directory));

        for handle in handles {
            handle
                .join()
                .map_err(|_| ForestError::Channel("worker thread panicked".into()))??;
        }
        forest
    })
}

/// Sends `Done` to the coordinator when dropped, also while unwinding from a panic
struct DoneGuard<'c, C: MessageChannel> {
    channel: &'c C,
    armed: bool,
}

impl<'c, C: MessageChannel> DoneGuard<'c, C> {
    fn new(channel: &'c C) -> Self {
        DoneGuard {
            channel,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl<C: MessageChannel> Drop for DoneGuard<'_, C> {
    fn drop(&mut self) {
        if self.armed {
            let _ = self.channel.send(0, Message::done());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove::{FeatureKeys, ParamGuard};
    use ndarray::array;

    #[test]
    fn rows_are_dealt_round_robin() {
        let dataset = Dataset::new(array![[0., 1.], [1., 2.], [0., 3.], [1., 4.], [0., 5.]]);
        let endpoints = LocalCluster::new(3).into_endpoints();

        distribute_rows(&endpoints[0], &dataset, 0).unwrap();

        let first = receive_shard(&endpoints[1], 0).unwrap();
        let second = receive_shard(&endpoints[2], 0).unwrap();
        assert_eq!(first.store().records(), array![[0., 1.], [0., 3.], [0., 5.]]);
        assert_eq!(second.store().records(), array![[1., 2.], [1., 4.]]);
    }

    #[test]
    fn empty_shards_keep_their_width() {
        let dataset = Dataset::new(array![[0., 1., 2.]]);
        let endpoints = LocalCluster::new(3).into_endpoints();

        distribute_rows(&endpoints[0], &dataset, 0).unwrap();
        let empty = receive_shard(&endpoints[2], 0).unwrap();
        assert_eq!(empty.nrows(), 0);
        assert_eq!(empty.ncols(), 3);
    }

    #[test]
    fn coordinator_needs_workers() {
        let dataset = Dataset::new(array![[0., 1.]]);
        let endpoints = LocalCluster::new(1).into_endpoints();
        assert!(matches!(
            distribute_rows(&endpoints[0], &dataset, 0),
            Err(ForestError::Channel(_))
        ));

        let params = RandomForest::params(0, FeatureKeys::numbered(1..2)).check_unwrap();
        assert!(train_sharded(&dataset, &params, 0, ".").is_err());
    }

    #[test]
    fn panicking_worker_still_reports_done() {
        let mut endpoints = LocalCluster::new(2).into_endpoints().into_iter();
        let coordinator = endpoints.next().unwrap();
        let worker = endpoints.next().unwrap();

        let handle = std::thread::spawn(move || {
            let _guard = DoneGuard::new(&worker);
            panic!("worker failed");
        });
        assert!(handle.join().is_err());
        assert_eq!(coordinator.recv().unwrap().kind, MessageKind::Done);

        // a disarmed guard stays silent
        let mut endpoints = LocalCluster::new(2).into_endpoints().into_iter();
        let coordinator = endpoints.next().unwrap();
        let worker = endpoints.next().unwrap();
        DoneGuard::new(&worker).disarm();
        worker.send(0, Message::row(vec![1.])).unwrap();
        assert_eq!(coordinator.recv().unwrap().kind, MessageKind::Row);
    }

    #[test]
    fn worker_rejects_unexpected_messages() {
        let endpoints = LocalCluster::new(2).into_endpoints();
        endpoints[0].send(1, Message::done()).unwrap();
        assert!(matches!(
            receive_shard(&endpoints[1], 0),
            Err(ForestError::Channel(_))
        ));
    }
}
