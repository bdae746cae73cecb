#![allow(dead_code)]

use batchget::{FetchError, HttpSource, Reporter, Summary};
use http::StatusCode;
use isahc::{config::Configurable, HttpClient};
use std::{
    sync::{Mutex, Once},
    time::Duration,
};
use tracing_subscriber::EnvFilter;

pub fn logging() {
    static ONCE: Once = Once::new();

    ONCE.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// An HTTP source that hangs up after every fetch instead of keeping idle
/// connections around for reuse.
///
/// The mock server serves each connection on one of a limited number of
/// threads until the client closes it, so pooled keep-alive connections would
/// leave later requests waiting for a free thread.
pub fn http_source(timeout: Duration) -> HttpSource {
    let client = HttpClient::builder()
        .timeout(timeout)
        .connection_cache_size(0)
        .build()
        .unwrap();

    HttpSource::with_client(client)
}

/// What a reporter was told about one failed fetch.
#[derive(Clone, Debug)]
pub struct Failure {
    pub url: String,
    pub status: Option<StatusCode>,
    pub timeout: bool,
    pub message: String,
}

/// Reporter that remembers everything it is told.
#[derive(Default)]
pub struct Recorder {
    pub started: Mutex<Vec<usize>>,
    pub failures: Mutex<Vec<Failure>>,
    pub summaries: Mutex<Vec<Summary>>,
}

impl Recorder {
    pub fn failures(&self) -> Vec<Failure> {
        self.failures.lock().unwrap().clone()
    }

    pub fn failed_urls(&self) -> Vec<String> {
        let mut urls = self
            .failures()
            .into_iter()
            .map(|failure| failure.url)
            .collect::<Vec<_>>();
        urls.sort();
        urls
    }

    pub fn summary(&self) -> Summary {
        *self.summaries.lock().unwrap().last().expect("batch did not finish")
    }
}

impl Reporter for Recorder {
    fn started(&self, count: usize) {
        self.started.lock().unwrap().push(count);
    }

    fn failed(&self, error: &FetchError) {
        self.failures.lock().unwrap().push(Failure {
            url: error.url().to_owned(),
            status: error.status(),
            timeout: error.is_timeout(),
            message: error.to_string(),
        });
    }

    fn finished(&self, summary: &Summary) {
        self.summaries.lock().unwrap().push(*summary);
    }
}
