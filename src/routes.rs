//! The page handler answering the three routes of the server

use std::fs::File;
use std::io::{ErrorKind as IoErrorKind, Result as IoResult};
use std::path::PathBuf;

use crate::common::{ContentType, Method};
use crate::handler::RequestHandler;
use crate::request::Request;
use crate::response::{Response, ResponseBox, Standard};

/// Body sent for `/` when the index file is missing
const INDEX_MISSING_BODY: &[u8] = b"Error: index.html not found";

/// Body sent for every path that is not `/` or `/hostname`
const NOT_FOUND_BODY: &[u8] = b"Error: File not found";

/// The application handler: serves the index file at `/`, the machine
/// hostname at `/hostname` and a 404 for everything else.
///
/// Nothing is cached. The index file is read from disk and the hostname
/// queried from the operating system again on every request.
#[derive(Debug)]
pub struct PageHandler {
    index_path: PathBuf,
}

impl PageHandler {
    /// Creates a `PageHandler` serving `index.html` from the process
    /// working directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_index("index.html")
    }

    /// Creates a `PageHandler` serving the index file at `path`.
    #[must_use]
    pub fn with_index<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            index_path: path.into(),
        }
    }

    /// Response for `/`.
    ///
    /// A missing index file degrades to a 200 response carrying an error
    /// text in the body. This matches the behavior this endpoint always
    /// had; clients depend on the 200.
    fn index_response(&self) -> ResponseBox {
        let response = match File::open(&self.index_path) {
            Ok(file) => Response::from_file(file).boxed(),
            Err(err) if err.kind() == IoErrorKind::NotFound => {
                Response::from_data(INDEX_MISSING_BODY).boxed()
            }
            Err(err) => {
                log::warn!("index file {:?}: {err}", self.index_path);
                return Standard::InternalServerError500.into();
            }
        };

        // Content-Type is no reserved header, with_header cannot fail here
        response.with_header(ContentType::TextHtml).unwrap()
    }
}

impl Default for PageHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHandler for PageHandler {
    fn handle(&self, request: &Request) -> ResponseBox {
        if *request.method() != Method::Get {
            return Standard::NotImplemented501.into();
        }

        match request.url() {
            "/" => self.index_response(),
            "/hostname" => hostname_response(),
            _ => Response::from_data(NOT_FOUND_BODY)
                .with_status_code(404_u16)
                .boxed(),
        }
    }
}

/// Response for `/hostname`
fn hostname_response() -> ResponseBox {
    match system_hostname() {
        Ok(name) => Response::from_data(name.into_bytes())
            .with_header(ContentType::TextPlain)
            .unwrap()
            .boxed(),
        Err(err) => {
            log::warn!("hostname lookup: {err}");
            Standard::InternalServerError500.into()
        }
    }
}

/// The hostname the operating system reports, queried fresh on every call.
///
/// # Errors
///
/// `std::io::Error` when the hostname cannot be queried
pub fn system_hostname() -> IoResult<String> {
    hostname::get().map(|name| name.to_string_lossy().into_owned())
}
