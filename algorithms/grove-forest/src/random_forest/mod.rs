mod algorithm;
mod builder;
mod hyperparams;

pub use algorithm::*;
pub use builder::*;
pub use hyperparams::*;
