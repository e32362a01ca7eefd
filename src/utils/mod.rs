/*!
# Utilities

Helpers that are not tied to a graph representation:
- [`WorkerPool`]: a fixed pool of threads mapping a function over a batch of items.
*/

pub mod pool;

pub use pool::{PoolResults, WorkerPool};
