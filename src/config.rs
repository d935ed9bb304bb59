use std::io::Result as IoResult;
use std::net::{SocketAddr, ToSocketAddrs};
use std::str::FromStr;
use std::time::Duration;

/// Default limit for concurrent client connections
pub(crate) const CONNECTION_LIMIT_DEFAULT: usize = 200;

/// Duration of sleep between checks while the connection limit is reached
pub(crate) const CONNECTION_LIMIT_SLEEP_DURATION: Duration = Duration::from_millis(25);

/// Config parameters required to create a [`Server`](crate::Server).
///
/// The config is immutable for the lifetime of the server; it is passed by
/// reference into the constructor and copied into the accept thread.
///
/// # Example
///
/// ```
/// # use hostpage::ServerConfig;
/// let cfg = ServerConfig { connection_limit: 50, ..ServerConfig::default() };
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The addresses to try to listen to
    pub addr: Vec<SocketAddr>,

    /// Concurrent connections are limited to `connection_limit`
    pub connection_limit: usize,

    /// Parser limits
    /// See [`Limits`]
    pub limits: Limits,

    /// Disable Nagle's algorithm on accepted sockets
    pub no_delay: bool,

    /// Read timeout of accepted sockets, zero for none
    pub read_timeout: Duration,

    /// Write timeout of accepted sockets, zero for none
    pub write_timeout: Duration,
}

impl ServerConfig {
    /// Creates a `ServerConfig` listening on `addr` with default limits.
    ///
    /// # Errors
    ///
    /// `std::io::Error` when `addr` resolves to no socket address
    pub fn from_socket_addrs<A: ToSocketAddrs>(addr: A) -> IoResult<Self> {
        Ok(Self {
            addr: addr.to_socket_addrs()?.collect(),
            ..Self::default()
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: vec![SocketAddr::from_str("127.0.0.1:0").unwrap()],
            connection_limit: CONNECTION_LIMIT_DEFAULT,
            limits: Limits::default(),
            no_delay: true,
            read_timeout: Duration::from_secs(10),
            write_timeout: Duration::from_secs(10),
        }
    }
}

/// Limits applied while reading a request off a connection
///
/// Requests exceeding a limit receive the matching 4xx response and the
/// connection is closed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Limits {
    /// Maximum size of a request body kept in memory
    pub body_buffer_size: usize,
    /// Maximum length of a single header line (and the request line)
    pub header_line_len: usize,
    /// Maximum total size of the request line plus all header lines
    pub header_max_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            body_buffer_size: 1024,
            header_line_len: 2048,
            header_max_size: 8192,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;

    #[test]
    fn from_socket_addrs_test() {
        let cfg = ServerConfig::from_socket_addrs("127.0.0.1:8080").unwrap();
        assert_eq!(cfg.addr.len(), 1);
        assert_eq!(cfg.addr[0].port(), 8080);
    }

    #[test]
    fn default_test() {
        let cfg = ServerConfig::default();
        assert!(cfg.connection_limit > 0);
        assert!(cfg.limits.header_line_len <= cfg.limits.header_max_size);
    }
}
