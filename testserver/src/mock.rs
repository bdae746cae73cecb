//! A tiny mock HTTP server that records incoming requests and answers them
//! with canned responses.
//!
//! Mocks are meant to stand in for the servers a batch fetches from, so every
//! request is answered on its own thread and many requests can be in flight
//! at once. Only HTTP/1.x is implemented.
//!
//! Connections are read by a bounded set of threads, each held until the
//! client closes its connection. Clients that keep idle connections alive can
//! therefore stall later requests; test clients should not reuse connections.

use crate::{pool::pool, request::Request, responder::Responder, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{
    io::{Cursor, Read, Write},
    net::{SocketAddr, TcpStream},
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
        Mutex,
    },
    thread,
    time::Duration,
};
use tiny_http::Server;

static DATA_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^/data/(\d+)$").unwrap());

/// Get the target index of a `/data/{index}` path.
pub(crate) fn data_index(url: &str) -> Option<usize> {
    DATA_PATH
        .captures(url)
        .and_then(|captures| captures[1].parse().ok())
}

/// A mock HTTP server.
#[derive(Clone)]
pub struct Mock(Arc<Inner>);

struct Inner {
    server: Server,

    requests: Mutex<Vec<Request>>,

    /// Number of requests received since the mock was created.
    request_counter: AtomicU32,

    /// A list of responders. When receiving a request each responder is tried
    /// in order until one returns a response.
    responders: Vec<Box<dyn Responder>>,
}

impl Mock {
    /// Create a new mock server with a single responder.
    pub fn new<R: Responder>(responder: R) -> Self {
        Self::builder().responder(responder).build()
    }

    /// Create a mock server answering `GET /data/{index}` requests using the
    /// given function.
    pub fn data<F>(f: F) -> Self
    where
        F: Fn(usize) -> Response + Send + Sync + 'static,
    {
        Self::builder().data(f).build()
    }

    /// Create a builder for creating a customized mock server.
    pub fn builder() -> Builder {
        Builder {
            responders: vec![],
        }
    }

    /// Get the socket address of this mock server.
    pub fn addr(&self) -> SocketAddr {
        self.0.server.server_addr().to_ip().expect("mock is not listening on TCP")
    }

    /// Get the HTTP URL of this mock server.
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr())
    }

    /// Get a URL template pointing at this server's `/data/{index}` paths.
    pub fn template(&self) -> String {
        format!("http://{}/data/{{index}}", self.addr())
    }

    /// Get the number of requests received so far by this mock.
    pub fn requests_received(&self) -> u32 {
        self.0.request_counter.load(Ordering::SeqCst)
    }

    /// Get all requests received by this mock, in the order they arrived.
    pub fn requests(&self) -> Vec<Request> {
        self.0.requests.lock().unwrap().clone()
    }

    #[rustfmt::skip]
    fn is_ready(&self) -> bool {
        TcpStream::connect(self.addr())
            .and_then(|mut stream| {
                stream.write_all(b"\
                    GET /health HTTP/1.1\r\n\
                    host: api.mock.local\r\n\
                    connection: close\r\n\
                    \r\n\
                ")?;

                let mut response = Vec::new();
                stream.read_to_end(&mut response)?;

                Ok(response.ends_with(b"\r\nOK"))
            })
            .unwrap_or(false)
    }

    fn wait_until_ready(&self) {
        for _ in 0..9 {
            if self.is_ready() {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }

        panic!("mock server did not become ready after 9 tries");
    }

    fn handle_request(&self, request: tiny_http::Request) {
        if request
            .headers()
            .iter()
            .any(|h| h.field.as_str() == "host" && h.value == "api.mock.local")
        {
            self.handle_api_request(request);
            return;
        }

        let mock_request = {
            // Number and record under one lock so that `requests()` comes back
            // in arrival order.
            let mut requests = self.0.requests.lock().unwrap();

            let mock_request = Request {
                number: self.0.request_counter.fetch_add(1, Ordering::SeqCst),
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|header| (header.field.to_string(), header.value.to_string()))
                    .collect(),
            };

            requests.push(mock_request.clone());
            mock_request
        };

        let response = self
            .0
            .responders
            .iter()
            .find_map(|responder| responder.respond(&mock_request))
            .unwrap_or_else(|| Response::status(404));

        if let Some(delay) = response.delay {
            thread::sleep(delay);
        }

        // The client may have given up already.
        let _ = request.respond(response.into_http_response());
    }

    fn handle_api_request(&self, request: tiny_http::Request) {
        if request.url() == "/health" {
            let _ = request.respond(tiny_http::Response::new(
                200.into(),
                vec![],
                Cursor::new(b"OK".to_vec()),
                Some(2),
                None,
            ));
        }
    }
}

/// A builder for creating mock servers.
pub struct Builder {
    responders: Vec<Box<dyn Responder>>,
}

impl Builder {
    /// Add a responder to the mock. Responders are tried in the order that they
    /// are added to the builder.
    pub fn responder<R: Responder>(mut self, responder: R) -> Self {
        self.responders.push(Box::new(responder));
        self
    }

    /// Answer `GET /data/{index}` requests using the given function.
    pub fn data<F>(self, f: F) -> Self
    where
        F: Fn(usize) -> Response + Send + Sync + 'static,
    {
        self.responder(move |request: &Request| {
            if request.method == "GET" {
                request.data_index().map(&f)
            } else {
                None
            }
        })
    }

    /// Start a new mock server.
    pub fn build(self) -> Mock {
        let mock = Mock(Arc::new(Inner {
            server: Server::http("127.0.0.1:0").unwrap(),
            requests: Default::default(),
            request_counter: AtomicU32::new(0),
            responders: self.responders,
        }));

        thread::spawn({
            let mock = mock.clone();

            move || {
                for request in mock.0.server.incoming_requests() {
                    let mock = mock.clone();

                    pool().execute(move || mock.handle_request(request));
                }
            }
        });

        mock.wait_until_ready();

        mock
    }
}
