//! Summary records folded from raw test cases.
//!
//! Two views over the same data:
//! - [`ExecutionStats`]: one record per execution, across its seeds
//! - [`SeedStats`]: one record per seed, across executions
//!
//! Both use unclamped raw-score sums, so WA scores (`<= 0`) pull averages down
//! by their actual value.

mod execution;
mod seed;

pub use execution::{aggregate_executions, ExecutionStats};
pub use seed::{aggregate_seeds, SeedStats};

/// Arithmetic mean that is `0` for an empty sample.
pub(crate) fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
