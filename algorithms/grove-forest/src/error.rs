use std::string::FromUtf8Error;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForestError>;

#[derive(Error, Debug)]
pub enum ForestError {
    #[error(transparent)]
    BaseCrate(#[from] grove::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("unknown node tag {0}")]
    InvalidNodeTag(u32),
    /// Split nodes have either no children or exactly two
    #[error("split node with {children} children")]
    MalformedNode { children: u64 },
    #[error("node action is not valid UTF-8: {0}")]
    InvalidAction(#[from] FromUtf8Error),
    #[error("the tree has no root")]
    EmptyTree,
    #[error("reached a split node without children")]
    UnlinkedSplit,
    #[error("could not build the worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("message channel failure: {0}")]
    Channel(String),
}
