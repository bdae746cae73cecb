use std::{io::Cursor, time::Duration};

/// A response for a mock to send.
#[derive(Clone, Debug)]
pub struct Response {
    pub status_code: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,

    /// How long to wait before sending the response.
    pub delay: Option<Duration>,
}

impl Response {
    /// A `200 OK` response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    /// An empty response with the given status code.
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn into_http_response(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let len = self.body.len();

        tiny_http::Response::new(
            self.status_code.into(),
            self.headers
                .into_iter()
                .filter_map(|(name, value)| tiny_http::Header::from_bytes(name, value).ok())
                .collect(),
            Cursor::new(self.body),
            Some(len),
            None,
        )
    }
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status_code: 200,
            headers: Vec::new(),
            body: Vec::new(),
            delay: None,
        }
    }
}
