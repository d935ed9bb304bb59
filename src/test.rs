use std::net::SocketAddr;

use crate::{Header, HttpVersion, Method, Request};

/// A builder for fake [`Request`]s, useful for testing a
/// [`RequestHandler`](crate::RequestHandler) without a socket.
///
/// By default, `TestRequest` pretends to be a GET request for the server
/// root (`/`) with no headers and no body:
///
/// ```
/// # use hostpage::{Method, TestRequest};
/// let request = TestRequest::new()
///     .with_method(Method::Post)
///     .with_path("/api/widgets")
///     .with_body("42")
///     .into_request();
/// ```
#[derive(Debug)]
pub struct TestRequest {
    body: &'static str,
    headers: Vec<Header>,
    http_version: HttpVersion,
    method: Method,
    path: String,
    remote_addr: SocketAddr,
}

impl Default for TestRequest {
    fn default() -> Self {
        TestRequest {
            body: "",
            headers: Vec::new(),
            http_version: HttpVersion::Version1_1,
            method: Method::Get,
            path: "/".to_owned(),
            remote_addr: "127.0.0.1:23456".parse().unwrap(),
        }
    }
}

impl From<TestRequest> for Request {
    fn from(mock: TestRequest) -> Request {
        Request::new(
            mock.method,
            mock.path,
            mock.http_version,
            mock.headers,
            mock.body.as_bytes().to_vec(),
            Some(mock.remote_addr),
        )
    }
}

#[allow(missing_docs)]
impl TestRequest {
    #[must_use]
    pub fn new() -> Self {
        TestRequest::default()
    }

    #[must_use]
    pub fn with_body(mut self, body: &'static str) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    #[must_use]
    pub fn with_http_version(mut self, version: HttpVersion) -> Self {
        self.http_version = version;
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_owned();
        self
    }

    #[must_use]
    pub fn with_remote_addr(mut self, remote_addr: SocketAddr) -> Self {
        self.remote_addr = remote_addr;
        self
    }

    /// Builds the [`Request`]
    #[must_use]
    pub fn into_request(self) -> Request {
        self.into()
    }
}
