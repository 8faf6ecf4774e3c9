pub mod parallel_processor;
pub mod partitioner;
pub mod reducer;

pub use parallel_processor::{FilePlan, ParallelProcessor, ProcessingOutcome};
pub use partitioner::Partitioner;
pub use reducer::{Reducer, Reduction};
