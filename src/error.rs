//! Types for error handling.
//!
//! There are two kinds of failure in a batch. Setting a batch up can fail
//! ([`Error`]), for example because the URL template is malformed or the HTTP
//! client could not start. Once the batch is running, the only failure is a
//! single target not being fetched ([`FetchError`]). Those are contained at
//! the target that produced them and never stop the rest of the batch.

use http::StatusCode;
use std::{error::Error as StdError, fmt, io, string::FromUtf8Error};

/// An error that prevented a batch from being created.
#[derive(Debug)]
pub enum Error {
    /// The URL template could not be used to generate target URLs.
    InvalidTemplate {
        /// The template as it was given.
        template: String,
        /// What is wrong with it.
        reason: String,
    },
    /// The HTTP client failed to initialize.
    ClientInitialization(isahc::Error),
}

impl Error {
    pub(crate) fn invalid_template(template: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::InvalidTemplate {
            template: template.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidTemplate { template, reason } => {
                write!(f, "invalid URL template `{}`: {}", template, reason)
            }
            Error::ClientInitialization(e) => write!(f, "failed to initialize HTTP client: {}", e),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::ClientInitialization(e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<isahc::Error> for Error {
    fn from(error: isahc::Error) -> Error {
        Error::ClientInitialization(error)
    }
}

/// The reason a single fetch failed.
///
/// Every variant is reported the same way: the target contributes nothing to
/// the cache and one error line is emitted. The variant only exists so that
/// the error line can say something useful.
#[derive(Debug)]
#[non_exhaustive]
pub enum Cause {
    /// The request took longer than the configured timeout.
    Timeout,
    /// Failed to connect to the server.
    ConnectFailed,
    /// Couldn't resolve host name.
    CouldntResolveHost,
    /// The server responded with a status code outside of `2xx`.
    Status(StatusCode),
    /// An error occurred while reading the response body.
    ResponseBodyError(Option<String>),
    /// The response body is not valid UTF-8.
    InvalidUtf8,
    /// Any other error reported by the HTTP engine.
    Transport(isahc::Error),
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::Timeout => f.write_str("request took longer than the configured timeout"),
            Cause::ConnectFailed => f.write_str("failed to connect to the server"),
            Cause::CouldntResolveHost => f.write_str("couldn't resolve host name"),
            Cause::Status(status) => write!(f, "server responded with status {}", status),
            Cause::ResponseBodyError(Some(e)) => write!(f, "failed to read response body: {}", e),
            Cause::ResponseBodyError(None) => f.write_str("failed to read response body"),
            Cause::InvalidUtf8 => f.write_str("response body is not valid UTF-8"),
            Cause::Transport(e) => fmt::Display::fmt(e, f),
        }
    }
}

#[doc(hidden)]
impl From<isahc::Error> for Cause {
    fn from(error: isahc::Error) -> Cause {
        use isahc::error::ErrorKind;

        let cause = match error.kind() {
            ErrorKind::Timeout => Some(Cause::Timeout),
            ErrorKind::ConnectionFailed => Some(Cause::ConnectFailed),
            ErrorKind::NameResolution => Some(Cause::CouldntResolveHost),
            _ => None,
        };

        cause.unwrap_or_else(|| Cause::Transport(error))
    }
}

#[doc(hidden)]
impl From<io::Error> for Cause {
    fn from(error: io::Error) -> Cause {
        match error.kind() {
            io::ErrorKind::TimedOut => Cause::Timeout,
            io::ErrorKind::ConnectionRefused => Cause::ConnectFailed,
            _ => Cause::ResponseBodyError(Some(error.to_string())),
        }
    }
}

#[doc(hidden)]
impl From<FromUtf8Error> for Cause {
    fn from(_: FromUtf8Error) -> Cause {
        Cause::InvalidUtf8
    }
}

#[doc(hidden)]
impl From<StatusCode> for Cause {
    fn from(status: StatusCode) -> Cause {
        Cause::Status(status)
    }
}

/// A failure to fetch one target.
///
/// Carries the URL that was being fetched so that the failure can be reported
/// on its own, without the caller having to keep track of which request it
/// belonged to.
#[derive(Debug)]
pub struct FetchError {
    url: String,
    cause: Cause,
}

impl FetchError {
    /// Create a new fetch error for the given URL.
    pub fn new(url: impl Into<String>, cause: impl Into<Cause>) -> Self {
        Self {
            url: url.into(),
            cause: cause.into(),
        }
    }

    /// The URL that could not be fetched.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Why the fetch failed.
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Returns true if the fetch was aborted because it took too long.
    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, Cause::Timeout)
    }

    /// Get the status code if the server answered with a non-success status.
    pub fn status(&self) -> Option<StatusCode> {
        match self.cause {
            Cause::Status(status) => Some(status),
            _ => None,
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error fetching {}: {}", self.url, self.cause)
    }
}

impl StdError for FetchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.cause {
            Cause::Transport(e) => Some(e),
            _ => None,
        }
    }
}
