use rayon::prelude::*;

/// Number of samples from which [`ExecutionStrategy::Auto`] switches to parallel execution.
pub const AUTO_PARALLEL_THRESHOLD: usize = 100_000;

/// Controls how the per-row sweeps of a filter are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    ///
    /// Useful for small volumes, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Use the global Rayon thread pool to process rows in parallel.
    Parallel,

    /// Parallel for volumes with at least [`AUTO_PARALLEL_THRESHOLD`] samples, serial otherwise.
    #[default]
    Auto,
}

impl ExecutionStrategy {
    /// Whether a sweep over `num_samples` samples runs on the thread pool.
    pub fn is_parallel(&self, num_samples: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => num_samples >= AUTO_PARALLEL_THRESHOLD,
        }
    }
}

/// Apply `f` to every row of `dst` with the given strategy.
///
/// `dst` is split into consecutive rows of `row_len` elements and `f` receives
/// the row index together with the mutable row. Each row is visited exactly
/// once, so the result does not depend on the strategy.
pub fn for_each_row_with<T, F>(dst: &mut [T], row_len: usize, strategy: ExecutionStrategy, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if row_len == 0 {
        return;
    }

    if strategy.is_parallel(dst.len()) {
        dst.par_chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(idx, row)| f(idx, row));
    } else {
        dst.chunks_exact_mut(row_len)
            .enumerate()
            .for_each(|(idx, row)| f(idx, row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_parallel() {
        assert!(!ExecutionStrategy::Serial.is_parallel(usize::MAX));
        assert!(ExecutionStrategy::Parallel.is_parallel(1));
        assert!(!ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_THRESHOLD - 1));
        assert!(ExecutionStrategy::Auto.is_parallel(AUTO_PARALLEL_THRESHOLD));
    }

    #[test]
    fn test_for_each_row_serial_and_parallel() {
        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::Parallel] {
            let mut dst = vec![0usize; 6];
            for_each_row_with(&mut dst, 2, strategy, |r, row| {
                row.iter_mut().enumerate().for_each(|(c, v)| *v = r * 10 + c);
            });
            assert_eq!(dst, vec![0, 1, 10, 11, 20, 21]);
        }
    }

    #[test]
    fn test_for_each_row_serial_stays_on_caller() {
        let mut dst = vec![0u8; 2 * AUTO_PARALLEL_THRESHOLD];
        for_each_row_with(&mut dst, 64, ExecutionStrategy::Serial, |_, row| {
            assert!(rayon::current_thread_index().is_none());
            row.fill(1);
        });
        assert!(dst.iter().all(|v| *v == 1));

        for_each_row_with(&mut dst, 64, ExecutionStrategy::Parallel, |_, row| {
            assert!(rayon::current_thread_index().is_some());
            row.fill(2);
        });
        assert!(dst.iter().all(|v| *v == 2));
    }

    #[test]
    fn test_for_each_row_empty_row() {
        let mut dst = vec![1u8; 4];
        for_each_row_with(&mut dst, 0, ExecutionStrategy::Serial, |_, row| row.fill(0));
        assert_eq!(dst, vec![1, 1, 1, 1]);
    }
}
