//! Fetching a single target.

use crate::{cache::ResultCache, report::Reporter, source::Source, FetchError};

/// Fetch one URL and store its body in the cache.
///
/// On success the body is appended to `cache`. On failure the cache is left
/// alone, the error is handed to `reporter`, and then returned so that the
/// caller can count it. Either way the fetch is over when the future
/// completes; there are no retries.
///
/// A failure here never affects any other fetch sharing the same source,
/// cache or reporter.
pub async fn fetch_and_store<S, R>(
    source: &S,
    cache: &ResultCache,
    reporter: &R,
    url: &str,
) -> Result<(), FetchError>
where
    S: Source + ?Sized,
    R: Reporter + ?Sized,
{
    match source.fetch(url).await {
        Ok(body) => {
            tracing::debug!(len = body.len(), "fetch succeeded");
            cache.insert(body);
            Ok(())
        }
        Err(e) => {
            tracing::debug!("fetch failed: {}", e);
            reporter.failed(&e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Cause,
        report::Summary,
        source::SourceFuture,
        util::future::FutureExt,
    };
    use http::StatusCode;
    use std::sync::Mutex;

    /// Succeeds with a fixed body unless the URL ends in `/fail`.
    struct Fixed;

    impl Source for Fixed {
        fn fetch<'a>(&'a self, url: &'a str) -> SourceFuture<'a> {
            Box::pin(async move {
                if url.ends_with("/fail") {
                    Err(FetchError::new(url, StatusCode::INTERNAL_SERVER_ERROR))
                } else {
                    Ok(format!("body of {}", url))
                }
            })
        }
    }

    #[derive(Default)]
    struct Failures(Mutex<Vec<String>>);

    impl Reporter for Failures {
        fn started(&self, _: usize) {}

        fn failed(&self, error: &FetchError) {
            self.0.lock().unwrap().push(error.url().to_owned());
        }

        fn finished(&self, _: &Summary) {}
    }

    #[test]
    fn success_is_stored_and_not_reported() {
        let cache = ResultCache::new();
        let reporter = Failures::default();

        let result = fetch_and_store(&Fixed, &cache, &reporter, "http://localhost/ok").wait();

        assert!(result.is_ok());
        assert_eq!(cache.snapshot(), vec!["body of http://localhost/ok"]);
        assert!(reporter.0.lock().unwrap().is_empty());
    }

    #[test]
    fn failure_is_reported_and_not_stored() {
        let cache = ResultCache::new();
        let reporter = Failures::default();

        let error = fetch_and_store(&Fixed, &cache, &reporter, "http://localhost/fail")
            .wait()
            .unwrap_err();

        assert!(matches!(error.cause(), Cause::Status(StatusCode::INTERNAL_SERVER_ERROR)));
        assert!(cache.is_empty());
        assert_eq!(*reporter.0.lock().unwrap(), vec!["http://localhost/fail"]);
    }
}
