//! The batch runner.

use crate::{
    cache::ResultCache,
    config::{Config, DEFAULT_TIMEOUT},
    fetch::fetch_and_store,
    report::{ConsoleReporter, Reporter, Summary},
    source::{HttpSource, Source},
    target::UrlTemplate,
    util::future::FutureExt,
    Error,
};
use futures_util::future::join_all;
use std::{fmt, sync::Arc, time::Duration};
use tracing_futures::Instrument;

/// A builder for [`Batch`] runners.
///
/// By default a batch fetches from `https://example.com/data/{index}` over
/// HTTP with a 30 second timeout, reports to standard output and standard
/// error, and starts out with an empty cache.
///
/// # Examples
///
/// ```no_run
/// use batchget::Batch;
/// use std::time::Duration;
///
/// let batch = Batch::builder()
///     .template("https://example.org/items/{index}")
///     .timeout(Duration::from_secs(5))
///     .build()?;
///
/// let cache_size = batch.run(25);
/// # Ok::<(), batchget::Error>(())
/// ```
pub struct BatchBuilder {
    template: UrlTemplate,
    timeout: Duration,
    source: Option<Arc<dyn Source>>,
    reporter: Option<Arc<dyn Reporter>>,
    cache: ResultCache,
    error: Option<Error>,
}

impl Default for BatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchBuilder {
    /// Create a new builder with all the default settings.
    pub fn new() -> Self {
        Self {
            template: UrlTemplate::default(),
            timeout: DEFAULT_TIMEOUT,
            source: None,
            reporter: None,
            cache: ResultCache::new(),
            error: None,
        }
    }

    /// Take the URL template and timeout from a configuration.
    pub fn config(mut self, config: &Config) -> Self {
        self.template = config.template.clone();
        self.timeout = config.timeout;
        self
    }

    /// Set the template used to derive each target's URL. Every `{index}` in
    /// the template is replaced with the target's index.
    ///
    /// An invalid template is reported when the batch is built.
    pub fn template(mut self, template: impl Into<String>) -> Self {
        match UrlTemplate::parse(template) {
            Ok(template) => self.template = template,
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(e);
                }
            }
        }

        self
    }

    /// Set the timeout for each individual fetch.
    ///
    /// Only used when the builder creates its own [`HttpSource`]; a source set
    /// with [`BatchBuilder::source`] keeps its own settings.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch bodies from a custom source instead of over HTTP.
    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Send progress events to a custom reporter.
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Arc::new(reporter));
        self
    }

    /// Collect bodies into an existing cache.
    pub fn cache(mut self, cache: ResultCache) -> Self {
        self.cache = cache;
        self
    }

    /// Build a [`Batch`] using the configured options.
    ///
    /// Fails if the URL template is invalid or if the HTTP client fails to
    /// initialize.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn build(self) -> Result<Batch, Error> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let source = match self.source {
            Some(source) => source,
            None => Arc::new(HttpSource::new(self.timeout)?),
        };

        Ok(Batch {
            template: self.template,
            source,
            reporter: self
                .reporter
                .unwrap_or_else(|| Arc::new(ConsoleReporter::new())),
            cache: self.cache,
        })
    }
}

impl fmt::Debug for BatchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchBuilder")
            .field("template", &self.template)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Runs batches of concurrent fetches into a shared cache.
///
/// Running a batch of `count` targets dispatches one fetch per target all at
/// once, with no limit on how many are in flight, and waits for every one of
/// them to finish. Successful bodies land in the cache; failures are handed
/// to the reporter and otherwise ignored. A failing target never stops or
/// slows down any other target.
///
/// The source, reporter and cache are all shared between the fetches of a
/// batch, and between batches run on the same runner.
///
/// # Examples
///
/// ```no_run
/// // Fetch https://example.com/data/0 through /data/9.
/// let batch = batchget::Batch::new()?;
/// let cache_size = batch.run(10);
///
/// assert!(cache_size <= 10);
/// # Ok::<(), batchget::Error>(())
/// ```
pub struct Batch {
    template: UrlTemplate,
    source: Arc<dyn Source>,
    reporter: Arc<dyn Reporter>,
    cache: ResultCache,
}

impl Batch {
    /// Create a batch runner using the default configuration.
    pub fn new() -> Result<Self, Error> {
        BatchBuilder::new().build()
    }

    /// Create a builder for a customized batch runner.
    pub fn builder() -> BatchBuilder {
        BatchBuilder::new()
    }

    /// Get the cache that fetched bodies are collected into.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Get the template used to derive target URLs.
    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// Fetch `count` targets, blocking the current thread until all of them
    /// have finished.
    ///
    /// Returns the number of bodies in the cache afterwards. Running a batch
    /// of zero targets does nothing besides reporting.
    ///
    /// The cache outlives a single run, so when a runner (or a cache passed to
    /// [`BatchBuilder::cache`]) is reused the returned size includes bodies
    /// from earlier runs and may exceed `count`. The per-run success count is
    /// [`Summary::succeeded`], handed to the reporter when the run finishes.
    pub fn run(&self, count: usize) -> usize {
        self.run_async(count).wait()
    }

    /// Fetch `count` targets asynchronously.
    ///
    /// See [`Batch::run`] for further details.
    pub async fn run_async(&self, count: usize) -> usize {
        let targets = self.template.targets(count);

        self.reporter.started(count);
        tracing::debug!(count, template = %self.template, "dispatching fetches");

        let fetches = targets.iter().map(|target| {
            fetch_and_store(&*self.source, &self.cache, &*self.reporter, &target.url).instrument(
                tracing::debug_span!("fetch", index = target.index, url = %target.url),
            )
        });

        let outcomes = join_all(fetches).await;

        let failed = outcomes.iter().filter(|outcome| outcome.is_err()).count();
        let summary = Summary {
            requested: count,
            succeeded: count - failed,
            failed,
            cache_size: self.cache.len(),
        };

        tracing::debug!(%summary, "all fetches finished");
        self.reporter.finished(&summary);

        summary.cache_size
    }
}

impl fmt::Debug for Batch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("template", &self.template)
            .field("cache", &self.cache)
            .finish()
    }
}
