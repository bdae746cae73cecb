//! Batch configuration and its defaults.

use crate::{target::UrlTemplate, Error};
use std::time::Duration;

/// Number of targets fetched when no count is given.
pub const DEFAULT_COUNT: usize = 10;

/// Template used to turn a target index into a URL when none is given.
pub const DEFAULT_TEMPLATE: &str = "https://example.com/data/{index}";

/// How long a single fetch may take before it is abandoned.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything needed to run one batch.
///
/// The defaults reproduce the reference behavior: ten targets under
/// `https://example.com/data/`, each with a 30 second timeout.
#[derive(Clone, Debug)]
pub struct Config {
    /// How many targets to fetch.
    pub count: usize,

    /// Template mapping a target index to its URL.
    pub template: UrlTemplate,

    /// Timeout applied to every fetch by the shared client.
    pub timeout: Duration,
}

impl Config {
    /// Create a configuration with a custom URL template and the default count
    /// and timeout.
    pub fn with_template(template: &str) -> Result<Self, Error> {
        Ok(Self {
            template: UrlTemplate::parse(template)?,
            ..Self::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            template: UrlTemplate::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
