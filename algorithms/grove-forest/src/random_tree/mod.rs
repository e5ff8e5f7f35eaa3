mod algorithm;
mod hyperparams;
mod iter;
mod node;

pub use algorithm::*;
pub use hyperparams::*;
pub use iter::*;
pub use node::*;
