use std::convert::TryFrom;
use std::io::{
    BufReader, BufWriter, Error as IoError, ErrorKind as IoErrorKind, Read, Result as IoResult,
    Write,
};
use std::net::{SocketAddr, TcpStream};

use ascii::{AsciiChar, AsciiStr, AsciiString};

use crate::common::{Header, HttpVersion, Method, StatusCode};
use crate::config::{Limits, ServerConfig};
use crate::handler::RequestHandler;
use crate::request::Request;
use crate::response::Response;
use crate::util::OwnedRegistration;

/// A `ClientConnection` owns the socket of one client and runs the
/// request/response loop for it on a worker thread.
pub(crate) struct ClientConnection {
    /// set to true once it is known the current request is the last one
    is_connection_close: bool,

    /// parser limits copied from the server config
    limits: Limits,

    /// buffered read half of the socket
    reader: BufReader<TcpStream>,

    /// address of the client
    remote_addr: Option<SocketAddr>,

    /// buffered write half of the socket
    writer: BufWriter<TcpStream>,

    /// keeps the server's connection count accurate
    _client_counter: OwnedRegistration,
}

impl ClientConnection {
    /// Creates a new `ClientConnection` taking ownership of the `TcpStream`.
    ///
    /// Applies the socket options of `config` before any I/O happens.
    pub(crate) fn new(
        stream: TcpStream,
        config: &ServerConfig,
        client_counter: OwnedRegistration,
    ) -> IoResult<Self> {
        stream.set_nodelay(config.no_delay)?;
        if !config.read_timeout.is_zero() {
            stream.set_read_timeout(Some(config.read_timeout))?;
        }
        if !config.write_timeout.is_zero() {
            stream.set_write_timeout(Some(config.write_timeout))?;
        }

        let remote_addr = stream.peer_addr().ok();
        let write_stream = stream.try_clone()?;

        log::debug!(
            "connection [{}]",
            remote_addr.map_or_else(String::default, |a| a.to_string())
        );

        Ok(ClientConnection {
            is_connection_close: false,
            limits: config.limits,
            reader: BufReader::with_capacity(1024, stream),
            remote_addr,
            writer: BufWriter::with_capacity(1024, write_stream),
            _client_counter: client_counter,
        })
    }

    /// Reads requests off the connection and answers each with the
    /// response of `handler` until the connection closes.
    pub(crate) fn serve<H>(mut self, handler: &H)
    where
        H: RequestHandler + ?Sized,
    {
        while !self.is_connection_close {
            let rq = match self.read_request() {
                Ok(rq) => rq,
                Err(ReadError::Protocol(version, status)) => {
                    log::debug!(
                        "protocol error [{}] ({status})",
                        self.remote_addr_string()
                    );
                    self.send_error(status, version);
                    return;
                }
                Err(ReadError::Io(err)) => {
                    // covers client close, timeouts and aborted sockets
                    log::debug!("close cause [{}]: {err}", self.remote_addr_string());
                    return;
                }
            };

            // refusing anything newer than HTTP/1.1
            if rq.http_version() > HttpVersion::Version1_1 {
                self.send_error(StatusCode(505), HttpVersion::Version1_0);
                return;
            }

            self.is_connection_close = Self::wants_close(&rq);

            let do_not_send_body = *rq.method() == Method::Head;
            let response = handler.handle(&rq);

            log::info!(
                "response [{}] ({}) \"{rq}\"",
                self.remote_addr_string(),
                response.status_code()
            );

            if let Err(err) = self.write_response(response, rq.http_version(), do_not_send_body) {
                log::error!("response write [{}]: {err}", self.remote_addr_string());
                return;
            }
        }
    }

    /// `true` if the connection must close after answering `rq`
    fn wants_close(rq: &Request) -> bool {
        if let Some(header) = rq.header_first("Connection") {
            let value = header.value.as_str().to_ascii_lowercase();
            if value.contains("close") {
                return true;
            }
            if value.contains("keep-alive") {
                return false;
            }
        }

        // HTTP/1.0 closes by default
        rq.http_version() <= HttpVersion::Version1_0
    }

    /// Reads one request from the stream.
    /// Blocks until the complete request has been read.
    fn read_request(&mut self) -> Result<Request, ReadError> {
        let mut header_limit_rest = self.limits.header_max_size;

        // request line; an oversized one is a too-long URI, not a header
        let line = self.read_line().map_err(|err| match err {
            ReadError::Protocol(v, status) if status == 431 => {
                ReadError::Protocol(v, StatusCode(414))
            }
            _ => err,
        })?;
        header_limit_rest = header_limit_rest.saturating_sub(line.len());

        let (method, path, version) = parse_request_line(line.trim())?;

        let mut headers = Vec::new();
        loop {
            let line = self.read_line()?;

            header_limit_rest = header_limit_rest
                .checked_sub(line.len())
                .ok_or(ReadError::Protocol(version, StatusCode(431)))?;

            let line = line.trim();
            if line.is_empty() {
                break;
            }

            headers.push(
                Header::try_from(line)
                    .map_err(|_err| ReadError::Protocol(version, StatusCode(400)))?,
            );
        }

        log::debug!("{method} {path} {}", version.header());

        if headers.iter().any(|h| h.field.equiv("Expect")) {
            // 100-continue negotiation is not supported
            return Err(ReadError::Protocol(version, StatusCode(417)));
        }

        let body = self.read_body(&headers, version)?;

        Ok(Request::new(
            method,
            path.to_string(),
            version,
            headers,
            body,
            self.remote_addr,
        ))
    }

    /// Reads the next CRLF terminated line from the stream.
    ///
    /// The limit per line is [`Limits::header_line_len`].
    fn read_line(&mut self) -> Result<AsciiString, ReadError> {
        let mut buf = Vec::new();
        let mut prev_byte = 0_u8;

        loop {
            let byte = if let Some(byte) = self.reader.by_ref().bytes().next() {
                byte?
            } else {
                log::debug!("unexpected connection abort");
                return Err(IoError::new(
                    IoErrorKind::ConnectionAborted,
                    "unexpected connection abort",
                )
                .into());
            };

            if byte == b'\n' && prev_byte == b'\r' {
                let _ = buf.pop(); // removing the '\r'
                return AsciiString::from_ascii(buf).map_err(|_err| {
                    IoError::new(IoErrorKind::InvalidInput, "header no ascii").into()
                });
            }
            prev_byte = byte;

            if buf.len() >= self.limits.header_line_len {
                return Err(ReadError::Protocol(
                    HttpVersion::Version1_0,
                    StatusCode(431),
                ));
            }

            buf.push(byte);
        }
    }

    /// Reads the request body into memory, or refuses it.
    ///
    /// Bodies above [`Limits::body_buffer_size`] get a `413`; requests
    /// without `Content-Length` or `Transfer-Encoding` have no body.
    fn read_body(
        &mut self,
        headers: &[Header],
        version: HttpVersion,
    ) -> Result<Vec<u8>, ReadError> {
        let limit = self.limits.body_buffer_size;

        // a Transfer-Encoding always means chunked (RFC 9112 section 6.1)
        let is_chunked = headers.iter().any(|h| h.field.equiv("Transfer-Encoding"));
        if is_chunked {
            let mut body = Vec::new();
            let mut decoder = chunked_transfer::Decoder::new(&mut self.reader);
            let read = decoder
                .by_ref()
                .take(limit as u64 + 1)
                .read_to_end(&mut body)?;
            if read > limit {
                return Err(ReadError::Protocol(version, StatusCode(413)));
            }
            return Ok(body);
        }

        let content_length = match headers.iter().find(|h| h.field.equiv("Content-Length")) {
            Some(header) => header
                .value
                .as_str()
                .parse::<usize>()
                .map_err(|_err| ReadError::Protocol(version, StatusCode(400)))?,
            None => return Ok(Vec::new()),
        };

        if content_length == 0 {
            return Ok(Vec::new());
        }
        if content_length > limit {
            return Err(ReadError::Protocol(version, StatusCode(413)));
        }

        let mut body = vec![0_u8; content_length];
        self.reader.read_exact(&mut body)?;
        Ok(body)
    }

    /// Writes `response` back to the client, ignoring errors caused by the
    /// client having gone away.
    fn write_response(
        &mut self,
        response: crate::ResponseBox,
        http_version: HttpVersion,
        do_not_send_body: bool,
    ) -> IoResult<()> {
        ignore_client_closing_errors(response.raw_print(
            &mut self.writer,
            http_version,
            self.is_connection_close,
            do_not_send_body,
        ))?;

        ignore_client_closing_errors(self.writer.flush())
    }

    /// Sends a plain error response for `status` and marks the connection
    /// closed. Any write error only gets logged.
    fn send_error(&mut self, status: StatusCode, version: HttpVersion) {
        self.is_connection_close = true;

        log::info!(
            "error response [{}] ({status})",
            self.remote_addr_string()
        );

        let response = Response::from(status);
        if let Err(err) = response
            .raw_print(&mut self.writer, version, true, false)
            .and_then(|()| self.writer.flush())
        {
            log::debug!("error response write: {err}");
        }
    }

    fn remote_addr_string(&self) -> String {
        self.remote_addr
            .as_ref()
            .map_or_else(String::default, ToString::to_string)
    }
}

/// Client-side terminations while writing are expected, everything else
/// stays an error
fn ignore_client_closing_errors(result: IoResult<()>) -> IoResult<()> {
    result.or_else(|err| match err.kind() {
        IoErrorKind::BrokenPipe
        | IoErrorKind::ConnectionAborted
        | IoErrorKind::ConnectionRefused
        | IoErrorKind::ConnectionReset
        | IoErrorKind::TimedOut
        | IoErrorKind::WouldBlock => {
            log::debug!("client closed: {err}");
            Ok(())
        }
        _ => Err(err),
    })
}

/// Error that can happen when reading a request.
#[derive(Debug)]
pub(crate) enum ReadError {
    /// The request broke the protocol or a parser limit; answered with
    /// the contained status before the connection closes
    Protocol(HttpVersion, StatusCode),
    /// The socket failed or the client went away
    Io(IoError),
}

impl std::error::Error for ReadError {}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Protocol(v, status) => write!(
                f,
                "{} {} {}",
                v.header(),
                status.0,
                status.default_reason_phrase()
            ),
            Self::Io(err) => err.fmt(f),
        }
    }
}

impl From<IoError> for ReadError {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

/// Parses the request line of the request.
/// eg. `GET / HTTP/1.1`
fn parse_request_line(line: &AsciiStr) -> Result<(Method, AsciiString, HttpVersion), ReadError> {
    let mut words = line.split(AsciiChar::Space);

    let method = words.next().map(Method::from);
    let path = words.next().map(ToOwned::to_owned);
    let version = words.next().and_then(|w| HttpVersion::try_from(w).ok());

    method
        .and_then(|method| Some((method, path?, version?)))
        .ok_or(ReadError::Protocol(
            HttpVersion::Version1_0,
            StatusCode(400),
        ))
}

#[cfg(test)]
mod tests {
    use ascii::AsAsciiStr;

    use crate::common::{HttpVersion, Method};

    use super::parse_request_line;

    #[test]
    fn parse_request_line_test() {
        let (method, path, version) =
            parse_request_line("GET /hostname HTTP/1.1".as_ascii_str().unwrap()).unwrap();

        assert_eq!(method, Method::Get);
        assert_eq!(path, "/hostname");
        assert_eq!(version, HttpVersion::Version1_1);

        assert!(parse_request_line("GET /hostname".as_ascii_str().unwrap()).is_err());
        assert!(parse_request_line("qsd qsd qsd".as_ascii_str().unwrap()).is_err());

        let (method, _, _) =
            parse_request_line("BREW /pot HTTP/1.1".as_ascii_str().unwrap()).unwrap();
        assert_eq!(method, Method::NonStandard("BREW".parse().unwrap()));
    }
}
