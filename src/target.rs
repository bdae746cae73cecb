//! Generating the list of targets to fetch.

use crate::{config::DEFAULT_TEMPLATE, Error};
use std::fmt;
use url::Url;

const PLACEHOLDER: &str = "{index}";

/// A URL with an `{index}` placeholder, used to derive one URL per target.
///
/// A template is validated once when parsed: it must contain the placeholder
/// at least once, and filling it in must produce an absolute URL. Past that
/// point URLs are handed to the HTTP client as-is.
///
/// # Examples
///
/// ```
/// use batchget::UrlTemplate;
///
/// let template = UrlTemplate::parse("https://example.com/data/{index}")?;
///
/// assert_eq!(template.render(7), "https://example.com/data/7");
/// # Ok::<(), batchget::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct UrlTemplate(String);

impl UrlTemplate {
    /// Parse and validate a URL template.
    pub fn parse(template: impl Into<String>) -> Result<Self, Error> {
        let template = template.into();

        if !template.contains(PLACEHOLDER) {
            return Err(Error::invalid_template(template, "missing `{index}` placeholder"));
        }

        let template = Self(template);

        if let Err(e) = Url::parse(&template.render(0)) {
            return Err(Error::invalid_template(template.0, e));
        }

        Ok(template)
    }

    /// Get the template as it was given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fill in the placeholder with the given index.
    pub fn render(&self, index: usize) -> String {
        self.0.replace(PLACEHOLDER, &index.to_string())
    }

    /// Build the ordered list of targets `0..count`.
    pub fn targets(&self, count: usize) -> Vec<Target> {
        (0..count)
            .map(|index| Target {
                index,
                url: self.render(index),
            })
            .collect()
    }
}

impl Default for UrlTemplate {
    fn default() -> Self {
        Self(DEFAULT_TEMPLATE.to_owned())
    }
}

impl fmt::Debug for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single thing to fetch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// Position of this target in the batch.
    pub index: usize,

    /// URL to send the GET request to.
    pub url: String,
}
