use rayon::prelude::*;
use thiserror::Error;

/// Number of pixels from which [`ExecutionStrategy::Auto`] switches to the parallel path.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 100_000;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the rows of an image are scheduled.
///
/// Every strategy produces the same output; they only differ in throughput.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run sequentially on the current thread.
    Serial,

    /// Use the global Rayon thread pool and process rows in parallel.
    Parallel,

    /// Parallel for images with at least [`PARALLEL_PIXEL_THRESHOLD`] pixels, serial otherwise.
    #[default]
    Auto,

    /// Run on a local thread pool with `n` threads.
    ///
    /// # Warning
    /// Creates a new thread pool on every filter call, which has significant overhead.
    /// Multi-pass filters build it once with [`with_thread_pool`] and share it across passes.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Whether an image with `num_pixels` pixels runs on more than the calling thread.
    pub fn is_parallel(&self, num_pixels: usize) -> bool {
        match self {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel | ExecutionStrategy::Fixed(_) => true,
            ExecutionStrategy::Auto => num_pixels >= PARALLEL_PIXEL_THRESHOLD,
        }
    }
}

/// Run `op` with the thread pool selected by `strategy`.
///
/// For [`ExecutionStrategy::Fixed`] a local pool is built and `op` runs inside it with
/// [`ExecutionStrategy::Parallel`], so every parallel iterator `op` starts uses that pool.
/// Other strategies are passed to `op` unchanged on the calling thread.
pub fn with_thread_pool<R, F>(strategy: ExecutionStrategy, op: F) -> Result<R, ParallelError>
where
    R: Send,
    F: FnOnce(ExecutionStrategy) -> R + Send,
{
    match strategy {
        ExecutionStrategy::Fixed(0) => Err(ParallelError::InvalidThreadCount(0)),
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;
            Ok(pool.install(|| op(ExecutionStrategy::Parallel)))
        }
        s => Ok(op(s)),
    }
}

/// Apply `f` to every row of an interleaved image buffer with the given strategy.
///
/// # Arguments
///
/// * `strategy` - The execution strategy.
/// * `dst` - The destination buffer with shape (H, W, C).
/// * `cols` - The width of the image in pixels.
/// * `f` - Called with the row index and the mutable row slice of length `cols * C`.
///
/// Rows are disjoint, so `f` only needs shared access to whatever it reads.
pub fn for_each_row<T, const C: usize, F>(
    strategy: ExecutionStrategy,
    dst: &mut [T],
    cols: usize,
    f: F,
) -> Result<(), ParallelError>
where
    T: Send,
    F: Fn(usize, &mut [T]) + Send + Sync,
{
    if let ExecutionStrategy::Fixed(0) = strategy {
        return Err(ParallelError::InvalidThreadCount(0));
    }

    let row_len = cols * C;
    if dst.is_empty() || row_len == 0 {
        return Ok(());
    }

    let num_pixels = dst.len() / C;
    with_thread_pool(strategy, |strategy| {
        if strategy.is_parallel(num_pixels) {
            dst.par_chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        } else {
            dst.chunks_exact_mut(row_len)
                .enumerate()
                .for_each(|(r, row)| f(r, row));
        }
    })
}
