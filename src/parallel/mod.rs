pub mod batch;
pub mod pool;

pub use batch::{
    batch_ranges, resolve_batch, resolve_batch_chunked, resolve_batch_in, resolve_batch_sequential,
};
pub use pool::WorkerPool;
