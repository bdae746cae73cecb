//! Shared thread pool for executing request handlers.
//!
//! Every mock gets its own TCP listener, but the threads that answer requests
//! are shared across all mocks in a test binary. Each request is handled on
//! its own pool thread so that a slow response never holds up the others.

use once_cell::sync::Lazy;
use threadfin::ThreadPool;

/// Get access to the shared thread pool.
pub(crate) fn pool() -> &'static ThreadPool {
    // Batches send all of their requests at once, so allow plenty of threads.
    static POOL: Lazy<ThreadPool> = Lazy::new(|| ThreadPool::builder().size(..256).build());

    &POOL
}
