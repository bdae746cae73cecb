//! Fetch a batch of URLs concurrently and collect what comes back.
//!
//! batchget generates a list of target URLs from a template, sends one HTTP
//! GET request per target all at the same time, and collects every successful
//! response body into a shared [`ResultCache`]. Once every request has either
//! succeeded or failed, it reports how many bodies the cache holds.
//!
//! A failed request (a timeout, a refused connection, a non-`2xx` status, an
//! unreadable body) is reported on its own and then forgotten. It never stops
//! the rest of the batch, and it is never retried.
//!
//! # Getting started
//!
//! ```no_run
//! use batchget::Batch;
//!
//! // Fetches https://example.com/data/0 through https://example.com/data/9,
//! // printing a line when the batch starts, one line per failure, and a line
//! // with the cache size at the end.
//! let cache_size = Batch::new()?.run(10);
//! # Ok::<(), batchget::Error>(())
//! ```
//!
//! Use [`Batch::builder`] to change the URL template, the per-request
//! timeout, where progress is reported to, or where bodies come from.
//!
//! # Feature flags
//!
//! The HTTP engine's feature flags are passed through:
//!
//! - `http2`: Enable HTTP/2 support. Enabled by default.
//! - `static-curl`: Link to a bundled copy of libcurl. Enabled by default.
//! - `static-ssl`: Link to a bundled copy of OpenSSL where applicable.
//! - `text-decoding`: Decode response bodies using the charset the server
//!   declares. Without it, bodies must be valid UTF-8. Enabled by default.
//!
//! # Logging
//!
//! batchget logs through the [tracing] crate, with one span per fetch carrying
//! the target's index and URL. Events are also emitted as [log] records, so
//! either kind of subscriber works.
//!
//! [log]: https://docs.rs/log
//! [tracing]: https://docs.rs/tracing

#![deny(unsafe_code)]
#![warn(
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    unused
)]

mod batch;
mod cache;
pub mod config;
pub mod error;
mod fetch;
mod info;
mod report;
pub mod source;
mod target;
mod util;

pub use crate::{
    batch::{Batch, BatchBuilder},
    cache::ResultCache,
    error::{Error, FetchError},
    fetch::fetch_and_store,
    info::version,
    report::{ConsoleReporter, Reporter, Summary},
    source::{HttpSource, Source},
    target::{Target, UrlTemplate},
};

/// Run a batch of `count` fetches using the default configuration.
///
/// Returns the number of response bodies collected.
///
/// This is a shorthand for `Batch::new()?.run(count)`. The cache is dropped
/// afterwards, so use [`Batch`] directly to get at the bodies themselves.
pub fn run(count: usize) -> Result<usize, Error> {
    Ok(Batch::new()?.run(count))
}
