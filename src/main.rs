//! Command line entry point.
//!
//! With no arguments, fetches `https://example.com/data/0` through
//! `https://example.com/data/9` with a 30 second timeout each.

use batchget::{config::Config, Batch};
use std::time::Duration;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "batchget",
    about = "Fetch a batch of URLs concurrently and count the successful responses.",
    long_version = batchget::version()
)]
struct Options {
    /// Number of targets to fetch [default: 10]
    #[structopt(short = "n", long)]
    count: Option<usize>,

    /// URL template, with `{index}` replaced by each target's index
    /// [default: https://example.com/data/{index}]
    #[structopt(long)]
    template: Option<String>,

    /// Timeout for each request, such as `30s` or `1m 30s` [default: 30s]
    #[structopt(long, parse(try_from_str = humantime::parse_duration))]
    timeout: Option<Duration>,
}

impl Options {
    fn into_config(self) -> Result<Config, batchget::Error> {
        let mut config = match self.template {
            Some(template) => Config::with_template(&template)?,
            None => Config::default(),
        };

        if let Some(count) = self.count {
            config.count = count;
        }

        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }

        Ok(config)
    }
}

fn main() -> Result<(), batchget::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Options::from_args().into_config()?;

    tracing::debug!(?config, "starting batch");

    // Individual fetch failures are reported as they happen and do not affect
    // the exit status.
    Batch::builder().config(&config).build()?.run(config.count);

    Ok(())
}
