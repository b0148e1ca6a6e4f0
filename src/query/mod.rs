//! Query layer: filter compilation and the retrying page fetch.

pub mod compiler;
pub mod executor;

pub use compiler::{CompiledPredicate, SqlParam, compile};
pub use executor::{
    FetchOutcome, FetchSide, PageFetch, PageRequest, ProductSource, RetryPolicy, RetryingExecutor,
};
