use std::io::{BufRead, BufReader, Read};
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use hostpage::{PageHandler, Server};

/// Starts a server with the page handler on an OS assigned port.
pub(crate) fn serve_pages<P: AsRef<Path>>(index_path: P) -> Server {
    Server::http("127.0.0.1:0", PageHandler::with_index(index_path.as_ref())).unwrap()
}

/// Creates a [`TcpStream`] client connected to `addr`
pub(crate) fn create_client(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream.set_nodelay(true).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream
        .set_write_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream
}

/// One response as read off the wire
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub(crate) status: u16,
    pub(crate) version: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Vec<u8>,
}

impl RawResponse {
    /// First header with `field`, ignoring case
    pub(crate) fn header(&self, field: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(f, _)| f.eq_ignore_ascii_case(field))
            .map(|(_, v)| v.as_str())
    }

    pub(crate) fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap()
    }
}

/// Reads one HTTP response off `reader`.
///
/// The body is framed by `Content-Length` when present, otherwise it is
/// read until the server closes the connection.
pub(crate) fn read_response<R: Read>(reader: &mut BufReader<R>) -> RawResponse {
    let mut status_line = String::new();
    let _ = reader.read_line(&mut status_line).unwrap();

    let mut words = status_line.split_whitespace();
    let version = words.next().unwrap().to_owned();
    let status: u16 = words.next().unwrap().parse().unwrap();

    let mut headers = Vec::new();
    loop {
        let mut line = String::new();
        let _ = reader.read_line(&mut line).unwrap();
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }

        let (field, value) = line.split_once(':').unwrap();
        headers.push((field.to_owned(), value.trim_start().to_owned()));
    }

    let content_length = headers
        .iter()
        .find(|(f, _)| f.eq_ignore_ascii_case("content-length"))
        .map(|(_, v)| v.parse::<usize>().unwrap());

    let mut body = Vec::new();
    if let Some(len) = content_length {
        body = vec![0_u8; len];
        reader.read_exact(&mut body).unwrap();
    } else {
        let _ = reader.read_to_end(&mut body).unwrap();
    }

    RawResponse {
        status,
        version,
        headers,
        body,
    }
}

/// Index file in the temp directory, removed again on drop
pub(crate) struct TempIndex {
    pub(crate) path: PathBuf,
}

impl TempIndex {
    pub(crate) fn create(name: &str, content: &[u8]) -> Self {
        let path = env::temp_dir().join(format!("hostpage-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        Self { path }
    }
}

impl Drop for TempIndex {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
