use std::net::SocketAddr;

use crate::common::{Header, HttpVersion, Method};

/// Represents an HTTP request made by a client.
///
/// A `Request` is produced by the connection after the request line,
/// headers and body have been read off the socket, and is handed to the
/// [`RequestHandler`](crate::RequestHandler) to be answered.
///
/// Requests with a body larger than the configured buffer limit are
/// refused by the connection before a `Request` is built, so `body` is
/// always fully in memory.
///
/// To build fake requests for testing a handler, use
/// [`TestRequest`](crate::TestRequest).
#[derive(Debug)]
pub struct Request {
    body: Vec<u8>,
    headers: Vec<Header>,
    http_version: HttpVersion,
    method: Method,
    path: String,
    remote_addr: Option<SocketAddr>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        http_version: HttpVersion,
        headers: Vec<Header>,
        body: Vec<u8>,
        remote_addr: Option<SocketAddr>,
    ) -> Self {
        Self {
            body,
            headers,
            http_version,
            method,
            path,
            remote_addr,
        }
    }

    /// The request body, empty for bodyless requests
    #[must_use]
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the first header with `field`, ignoring case
    #[must_use]
    pub fn header_first(&self, field: &'static str) -> Option<&Header> {
        self.headers.iter().find(|h| h.field.equiv(field))
    }

    /// Returns all headers sent by the client
    #[must_use]
    #[inline]
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Returns the HTTP version of the request
    #[must_use]
    #[inline]
    pub fn http_version(&self) -> HttpVersion {
        self.http_version
    }

    /// Returns the method requested by the client (eg. `GET`, `POST`)
    #[must_use]
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the address of the client that sent this request.
    ///
    /// Gathered from the socket; behind a proxy this is the proxy's
    /// address, not the end user's.
    #[must_use]
    #[inline]
    pub fn remote_addr(&self) -> Option<&SocketAddr> {
        self.remote_addr.as_ref()
    }

    /// Returns the path requested by the client, e.g. `/hostname`
    #[must_use]
    #[inline]
    pub fn url(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{} {} {}", self.method, self.path, self.http_version)
    }
}
