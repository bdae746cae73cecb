//! Progress reporting for a running batch.

use crate::FetchError;
use std::{
    fmt,
    io::{self, Write},
    sync::{Arc, Mutex, PoisonError},
};

/// What happened in a batch, available once every fetch has finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Number of targets in the batch.
    pub requested: usize,

    /// Number of targets whose body was stored by this batch. Never more
    /// than `requested`, unlike `cache_size`.
    pub succeeded: usize,

    /// Number of targets that could not be fetched.
    pub failed: usize,

    /// Number of bodies in the cache after the batch. If the cache was shared
    /// with earlier batches this includes their entries too.
    pub cache_size: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} fetches failed, cache size: {}",
            self.failed, self.requested, self.cache_size
        )
    }
}

/// Receives progress events from a batch.
///
/// Events for different fetches may arrive from the same batch in any order,
/// but `started` always comes first and `finished` always comes last.
pub trait Reporter: Send + Sync {
    /// Called once before any fetch is dispatched.
    fn started(&self, count: usize);

    /// Called once for every fetch that fails.
    fn failed(&self, error: &FetchError);

    /// Called once after every fetch has finished.
    fn finished(&self, summary: &Summary);
}

impl<R: Reporter + ?Sized> Reporter for Arc<R> {
    fn started(&self, count: usize) {
        (**self).started(count)
    }

    fn failed(&self, error: &FetchError) {
        (**self).failed(error)
    }

    fn finished(&self, summary: &Summary) {
        (**self).finished(summary)
    }
}

/// Reports progress as human-readable lines.
///
/// The start and completion announcements go to one stream (standard output
/// by default) and failures to another (standard error by default).
pub struct ConsoleReporter {
    out: Mutex<Box<dyn Write + Send>>,
    err: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleReporter {
    /// Create a reporter writing to standard output and standard error.
    pub fn new() -> Self {
        Self::with_writers(io::stdout(), io::stderr())
    }

    /// Create a reporter writing announcements to `out` and failures to
    /// `err`.
    pub fn with_writers(
        out: impl Write + Send + 'static,
        err: impl Write + Send + 'static,
    ) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            err: Mutex::new(Box::new(err)),
        }
    }

    fn write_line(stream: &Mutex<Box<dyn Write + Send>>, line: fmt::Arguments<'_>) {
        let mut stream = stream.lock().unwrap_or_else(PoisonError::into_inner);

        if let Err(e) = writeln!(stream, "{}", line).and_then(|()| stream.flush()) {
            tracing::warn!("failed to write report line: {}", e);
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn started(&self, count: usize) {
        Self::write_line(&self.out, format_args!("Fetches started: {} targets", count));
    }

    fn failed(&self, error: &FetchError) {
        Self::write_line(&self.err, format_args!("{}", error));
    }

    fn finished(&self, summary: &Summary) {
        Self::write_line(
            &self.out,
            format_args!("All fetches finished, cache size: {}", summary.cache_size),
        );
    }
}

impl fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleReporter").finish()
    }
}
