//! `response` module
//!
//! See [`Response`]

use std::convert::TryFrom;
use std::fs::File;
use std::io::{self, Cursor, Read, Result as IoResult, Write};

use crate::common::{ContentType, Header, HeaderError, HttpVersion, StatusCode};

pub use self::standard::{Standard, StandardResponse};
use self::util::TransferEncoding;

mod standard;
pub(crate) mod util;

/// A `Response` without a template parameter.
pub type ResponseBox = Response<Box<dyn Read + Send>>;

/// An HTTP response, produced by a
/// [`RequestHandler`](crate::RequestHandler) and written to the client by
/// the connection that read the request.
///
/// The `Connection`, `Trailer`, `Transfer-Encoding` and `Upgrade` headers
/// are managed by the server and cannot be set. `Content-Length` is
/// equivalent to setting the data length. `Content-Type` can only be set
/// to one value at a time.
///
/// `Date` and `Server` headers are added at write time.
#[derive(Clone, Debug)]
pub struct Response<R> {
    chunked_threshold: Option<usize>,
    data: Option<R>,
    data_length: Option<usize>,
    headers: Vec<Header>,
    status_code: StatusCode,
}

impl<R> Default for Response<R> {
    fn default() -> Self {
        Self {
            chunked_threshold: None,
            data: None,
            data_length: None,
            headers: Vec::new(),
            status_code: StatusCode(200),
        }
    }
}

impl<R> Response<R>
where
    R: Read,
{
    /// The `Content-Length` threshold above which chunked transfer is
    /// chosen. Chunked transfer also happens whenever the body length is
    /// unknown, regardless of this threshold.
    #[must_use]
    pub fn chunked_threshold(&self) -> usize {
        self.chunked_threshold.unwrap_or(32_768)
    }

    /// Adds a header to the list after checking it.
    ///
    /// # Errors
    ///
    /// [`HeaderError`] when the header is reserved or malformed
    pub fn add_header<H>(&mut self, header: H) -> Result<(), HeaderError>
    where
        H: Into<Header>,
    {
        let header = header.into();

        if Header::is_reserved(&header.field) {
            return Err(HeaderError::Reserved);
        }

        // Content-Length is data state, not a header
        if header.field.equiv("Content-Length") {
            self.data_length = Some(
                header
                    .value
                    .as_str()
                    .parse::<usize>()
                    .map_err(|_err| HeaderError::Format)?,
            );

            return Ok(());
        }

        let overwrite = header.field.equiv("Content-Type");
        util::set_header(&mut self.headers, header, overwrite);

        Ok(())
    }

    /// Returns the same response with an additional header.
    ///
    /// # Errors
    ///
    /// [`HeaderError`] when the header is reserved or malformed
    #[inline]
    pub fn with_header<H>(mut self, header: H) -> Result<Self, HeaderError>
    where
        H: Into<Header>,
    {
        self.add_header(header.into())?;
        Ok(self)
    }

    /// Returns the same response with a different status code.
    #[must_use]
    #[inline]
    pub fn with_status_code<S>(mut self, code: S) -> Self
    where
        S: Into<StatusCode>,
    {
        self.status_code = code.into();
        self
    }

    /// Returns the same response with different data.
    pub fn with_data<D>(self, data: D, data_length: Option<usize>) -> Response<D>
    where
        D: Read,
    {
        Response {
            chunked_threshold: self.chunked_threshold,
            data: Some(data),
            data_length,
            headers: self.headers,
            status_code: self.status_code,
        }
    }

    /// Current status code of the response
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    /// Current data length, `None` when unknown
    #[must_use]
    pub fn data_length(&self) -> Option<usize> {
        self.data_length
    }

    /// Current list of headers
    #[must_use]
    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Convert the response into the underlying `Read` type.
    ///
    /// Mainly useful in tests, consumes the `Response`.
    pub fn into_reader(self) -> Option<R> {
        self.data
    }

    /// Writes the response to `writer` in HTTP wire format.
    ///
    /// `http_version` is the version of the request being answered and
    /// decides the transfer encoding. A `Connection: close` header is
    /// written when `connection_close` is set. The body is suppressed when
    /// `do_not_send_body` is set (HEAD requests) or the status code
    /// forbids one.
    ///
    /// Note: does not flush the writer.
    ///
    /// # Errors
    ///
    /// `std::io::Error` of the underlying writer
    pub fn raw_print<W: Write>(
        mut self,
        mut writer: W,
        http_version: HttpVersion,
        connection_close: bool,
        do_not_send_body: bool,
    ) -> IoResult<()> {
        let transfer_encoding = util::choose_transfer_encoding(
            self.status_code,
            http_version,
            self.data_length,
            self.chunked_threshold(),
        );

        // with identity encoding the length must be known up front, so an
        // unknown-length body is buffered first (HTTP/1.0 clients only)
        let buffered = match (transfer_encoding, self.data_length, self.data.as_mut()) {
            (TransferEncoding::Identity, None, Some(data)) => {
                let mut buf = Vec::new();
                let _ = data.read_to_end(&mut buf)?;
                self.data_length = Some(buf.len());
                Some(Cursor::new(buf))
            }
            _ => None,
        };

        let do_not_send_body =
            do_not_send_body || util::is_body_ignored_for_status(self.status_code);

        // status line
        write!(
            writer,
            "{} {} {}\r\n",
            http_version.header(),
            self.status_code.0,
            self.status_code.default_reason_phrase()
        )?;

        // ambient headers first, then framing, then the response's own
        let mut head = vec![util::date_header(), util::server_header()];
        if connection_close {
            head.push(util::CONNECTION_CLOSE_HEADER.clone());
        }
        if !do_not_send_body {
            match transfer_encoding {
                TransferEncoding::Chunked => {
                    head.push(Header::from_bytes(b"Transfer-Encoding", b"chunked").unwrap());
                }
                TransferEncoding::Identity => {
                    debug_assert!(self.data_length.is_some());
                    let len = self.data_length.unwrap_or(0);
                    head.push(
                        Header::from_bytes(b"Content-Length", len.to_string().as_bytes()).unwrap(),
                    );
                }
            }
        }

        for header in head.iter().chain(self.headers.iter()) {
            if do_not_send_body && header.field.equiv("Content-Type") {
                continue;
            }
            write!(writer, "{}: {}\r\n", header.field, header.value)?;
        }

        // separator between headers and data
        writer.write_all(b"\r\n")?;

        if !do_not_send_body {
            match transfer_encoding {
                TransferEncoding::Chunked => {
                    if let Some(mut reader) = self.data {
                        let mut encoder = chunked_transfer::Encoder::new(writer);
                        let _ = io::copy(&mut reader, &mut encoder)?;
                    }
                }
                TransferEncoding::Identity => {
                    if self.data_length.unwrap_or(0) >= 1 {
                        if let Some(mut reader) = buffered {
                            let _ = io::copy(&mut reader, &mut writer)?;
                        } else if let Some(mut reader) = self.data {
                            let _ = io::copy(&mut reader, &mut writer)?;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl<R> Response<R>
where
    R: Read + Send + 'static,
{
    /// Turns this response into a [`ResponseBox`].
    pub fn boxed(self) -> ResponseBox {
        Response {
            chunked_threshold: self.chunked_threshold,
            data: self.data.map(|data| Box::new(data) as Box<dyn Read + Send>),
            data_length: self.data_length,
            headers: self.headers,
            status_code: self.status_code,
        }
    }
}

impl Response<File> {
    /// Builds a `Response` from a `File`.
    ///
    /// The whole file is read and sent at response-write time; the
    /// `Content-Type` is not detected and must be set by the caller.
    #[must_use]
    pub fn from_file(file: File) -> Self {
        let data_length = file
            .metadata()
            .ok()
            .map(|m| usize::try_from(m.len()).unwrap_or(usize::MAX));

        Response {
            data: Some(file),
            data_length,
            ..Response::default()
        }
    }
}

impl Response<Cursor<Vec<u8>>> {
    /// Create a `Response` from bytes on the heap, without a `Content-Type`
    pub fn from_data<D>(data: D) -> Self
    where
        D: Into<Vec<u8>>,
    {
        let data = data.into();

        Response {
            data_length: Some(data.len()),
            data: Some(Cursor::new(data)),
            ..Response::default()
        }
    }

    /// Create a `Response` from a string with `Content-Type: text/plain`
    pub fn from_string<S>(data: S) -> Self
    where
        S: Into<String>,
    {
        let data: String = data.into();

        Response {
            data_length: Some(data.len()),
            data: Some(Cursor::new(data.into_bytes())),
            headers: vec![ContentType::TextPlain.into()],
            ..Response::default()
        }
    }
}

impl Response<io::Empty> {
    /// Builds an empty `Response` with the given status code.
    #[inline]
    pub fn empty<S>(status_code: S) -> Self
    where
        S: Into<StatusCode>,
    {
        Response {
            data_length: Some(0),
            status_code: status_code.into(),
            ..Response::default()
        }
    }
}

impl<T> From<T> for Response<Cursor<&'static [u8]>>
where
    T: Into<StatusCode>,
{
    /// A plain response for `status_code` with its reason phrase as body
    fn from(status_code: T) -> Self {
        let status_code: StatusCode = status_code.into();
        let data: &'static [u8] = status_code.default_reason_phrase().as_bytes();

        Response {
            data: Some(Cursor::new(data)),
            data_length: Some(data.len()),
            status_code,
            ..Response::default()
        }
    }
}
