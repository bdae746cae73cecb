//! Where response bodies come from.
//!
//! A [`Source`] turns a URL into a response body or a [`FetchError`]. The
//! batch runner only ever talks to a source, which keeps the network out of
//! the fetch-and-collect logic and lets tests swap in sources that fail on
//! demand. [`HttpSource`] is the real one.

use crate::{
    error::{Cause, FetchError},
    Error,
};
use isahc::{config::Configurable, AsyncBody, HttpClient};
use http::Response;
use std::{fmt, future::Future, pin::Pin, sync::Arc, time::Duration};

/// Future returned by [`Source::fetch`].
pub type SourceFuture<'a> = Pin<Box<dyn Future<Output = Result<String, FetchError>> + Send + 'a>>;

/// Fetches the body behind a URL.
///
/// Implementations make exactly one attempt per call and must report every
/// failure as a [`FetchError`] rather than panicking. A single source is
/// shared by all fetches in a batch, and those fetches run at the same time.
pub trait Source: Send + Sync {
    /// Fetch the body behind the given URL.
    fn fetch<'a>(&'a self, url: &'a str) -> SourceFuture<'a>;
}

impl<S: Source + ?Sized> Source for Arc<S> {
    fn fetch<'a>(&'a self, url: &'a str) -> SourceFuture<'a> {
        (**self).fetch(url)
    }
}

impl<S: Source + ?Sized> Source for &S {
    fn fetch<'a>(&'a self, url: &'a str) -> SourceFuture<'a> {
        (**self).fetch(url)
    }
}

/// A source that sends an HTTP GET request for each URL.
///
/// Only `2xx` responses count as a success. Any other status, a timeout, a
/// connection failure or a body that can't be read fails the fetch.
///
/// The client is created once and reused for every fetch, so connections are
/// pooled between targets on the same host. Cloning the source shares the
/// client.
#[derive(Clone)]
pub struct HttpSource {
    client: HttpClient,
}

impl HttpSource {
    /// Create a new source whose requests time out after the given duration.
    ///
    /// If the HTTP client fails to initialize, an error will be returned.
    #[tracing::instrument(level = "debug")]
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self::with_client(client))
    }

    /// Create a source using an existing HTTP client and its configuration.
    pub fn with_client(client: HttpClient) -> Self {
        Self { client }
    }
}

impl Source for HttpSource {
    fn fetch<'a>(&'a self, url: &'a str) -> SourceFuture<'a> {
        Box::pin(async move {
            let mut response = self
                .client
                .get_async(url)
                .await
                .map_err(|e| FetchError::new(url, e))?;

            let status = response.status();

            tracing::trace!(%status, "received response");

            if !status.is_success() {
                return Err(FetchError::new(url, status));
            }

            read_text(&mut response)
                .await
                .map_err(|cause| FetchError::new(url, cause))
        })
    }
}

impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource").finish()
    }
}

/// Read the response body as text, decoded using the charset the server
/// declared. Undecodable bytes are replaced rather than rejected.
#[cfg(feature = "text-decoding")]
async fn read_text(response: &mut Response<AsyncBody>) -> Result<String, Cause> {
    use isahc::AsyncReadResponseExt;

    Ok(response.text().await?)
}

/// Read the response body, which must be UTF-8.
#[cfg(not(feature = "text-decoding"))]
async fn read_text(response: &mut Response<AsyncBody>) -> Result<String, Cause> {
    use futures_lite::io::AsyncReadExt;

    let mut buf = Vec::new();
    response.body_mut().read_to_end(&mut buf).await?;

    Ok(String::from_utf8(buf)?)
}
