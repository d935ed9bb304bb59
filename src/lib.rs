//! Minimal multi-threaded HTTP server serving an index page and the
//! machine hostname.
//!
//! # Creating the server
//!
//! A [`Server`] is built from a [`ServerConfig`] and a [`RequestHandler`]
//! and starts listening immediately. The bundled [`PageHandler`] answers
//! `/` with the contents of `index.html`, `/hostname` with the hostname
//! the operating system reports, and everything else with a 404.
//!
//! ```no_run
//! use hostpage::{PageHandler, Server, ServerConfig};
//!
//! let config = ServerConfig::from_socket_addrs("0.0.0.0:8080").unwrap();
//! let server = Server::new(&config, PageHandler::new()).unwrap();
//!
//! println!("listening on {}", server.server_addr());
//! loop {
//!     std::thread::park();
//! }
//! ```
//!
//! # Handling requests
//!
//! Each accepted connection is dispatched onto a worker thread which
//! reads the connection's requests and calls the handler for every one of
//! them. Handlers on different connections run concurrently and share no
//! mutable state.
//!
//! Custom handlers implement [`RequestHandler`], or wrap a closure in
//! [`FnRequestHandler`]:
//!
//! ```no_run
//! use hostpage::{FnRequestHandler, Request, Response, Server};
//!
//! let handler = FnRequestHandler(|rq: &Request| {
//!     Response::from_string(format!("you asked for {}", rq.url())).boxed()
//! });
//!
//! let server = Server::http("127.0.0.1:0", handler).unwrap();
//! ```
//!
//! # Shutdown
//!
//! Dropping the [`Server`] closes the listening socket, stops accepting
//! and lets in-flight connections finish best-effort.

// used by the binary target only
use env_logger as _;
use signal_hook as _;

use std::error::Error;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};
use std::thread;

use client::ClientConnection;
pub use common::{
    ContentType, Header, HeaderError, HeaderField, HeaderFieldValue, HttpVersion,
    HttpVersionError, Method, StatusCode,
};
pub use config::{Limits, ServerConfig};
use config::CONNECTION_LIMIT_SLEEP_DURATION;
pub use handler::{FnRequestHandler, RequestHandler};
pub use request::Request;
pub use response::{Response, ResponseBox};
pub use routes::{system_hostname, PageHandler};
pub use test::TestRequest;
use util::{OwnedRegistration, TaskPool};

mod client;
mod common;
mod config;
mod handler;
mod request;
pub mod response;
mod routes;
mod test;
mod util;

/// The listening component of the server.
///
/// A newly created `Server` immediately starts accepting connections on
/// its own accept thread and answers every request with the handler it
/// was built with. Dropping the `Server` closes the listening socket;
/// connections already being served finish best-effort.
#[allow(missing_debug_implementations)]
pub struct Server {
    // set to true on drop, the accept thread exits shortly after
    close: Arc<AtomicBool>,

    // result of TcpListener::local_addr()
    listening_addr: SocketAddr,

    // number of currently open connections
    num_connections: Arc<AtomicUsize>,

    // accept thread join handle
    accept_jh: Option<thread::JoinHandle<()>>,
}

// this trait is to make sure that Server implements Send and Sync
#[doc(hidden)]
#[allow(dead_code)]
trait SendSyncT: Send + Sync {}
#[doc(hidden)]
impl SendSyncT for Server {}

impl Server {
    /// Builds a new server that listens on the addresses of `config` and
    /// answers requests with `handler`.
    ///
    /// # Errors
    ///
    /// `std::io::Error` when socket binding failed
    pub fn new<H>(
        config: &ServerConfig,
        handler: H,
    ) -> Result<Server, Box<dyn Error + Send + Sync + 'static>>
    where
        H: RequestHandler + 'static,
    {
        let listener = TcpListener::bind(config.addr.as_slice())?;
        let listening_addr = listener.local_addr()?;
        log::info!("listening on {listening_addr}");

        let close = Arc::new(AtomicBool::new(false));
        let num_connections = Arc::new(AtomicUsize::new(0));

        let accept_jh = Self::start_accept_thread(
            listener,
            config.clone(),
            Arc::new(handler),
            Arc::clone(&close),
            Arc::clone(&num_connections),
        );

        Ok(Server {
            close,
            listening_addr,
            num_connections,
            accept_jh: Some(accept_jh),
        })
    }

    /// Shortcut for a server on a specific address with default config.
    ///
    /// # Errors
    ///
    /// - `std::io::Error` when `addr` is no socket address
    /// - `std::io::Error` when socket binding failed
    #[inline]
    pub fn http<A, H>(
        addr: A,
        handler: H,
    ) -> Result<Server, Box<dyn Error + Send + Sync + 'static>>
    where
        A: std::net::ToSocketAddrs,
        H: RequestHandler + 'static,
    {
        Server::new(&ServerConfig::from_socket_addrs(addr)?, handler)
    }

    /// Returns the number of clients currently connected to the server.
    #[must_use]
    pub fn num_connections(&self) -> usize {
        self.num_connections.load(Ordering::Acquire)
    }

    /// Returns the address the server is listening to.
    #[must_use]
    #[inline]
    pub fn server_addr(&self) -> SocketAddr {
        self.listening_addr
    }

    fn start_accept_thread<H>(
        listener: TcpListener,
        config: ServerConfig,
        handler: Arc<H>,
        close: Arc<AtomicBool>,
        num_connections: Arc<AtomicUsize>,
    ) -> thread::JoinHandle<()>
    where
        H: RequestHandler + 'static,
    {
        thread::spawn(move || {
            log::debug!("running accept thread");

            // dispatches each accepted connection onto a worker thread
            let task_pool = TaskPool::new();

            while !close.load(Ordering::Relaxed) {
                while num_connections.load(Ordering::Acquire) >= config.connection_limit {
                    log::warn!("connection limit reached");
                    thread::sleep(CONNECTION_LIMIT_SLEEP_DURATION);
                }

                match listener.accept() {
                    Ok((stream, _addr)) => {
                        let client_counter = OwnedRegistration::new(Arc::clone(&num_connections));

                        let connection = match ClientConnection::new(stream, &config, client_counter)
                        {
                            Ok(connection) => connection,
                            Err(err) => {
                                log::error!("connection setup: {err}");
                                continue;
                            }
                        };

                        let handler = Arc::clone(&handler);
                        let mut connection = Some(connection);

                        task_pool.spawn_task(Box::new(move || {
                            // take: the task runs exactly once
                            if let Some(connection) = connection.take() {
                                connection.serve(&*handler);
                            }
                        }));
                    }
                    Err(err) => {
                        log::error!("error on connection accept: {err}");
                    }
                };
            }

            log::debug!("terminating accept thread");
        })
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.close.store(true, Ordering::Relaxed);

        // connect briefly to ourselves to unblock the accept thread
        if let Ok(stream) = TcpStream::connect(self.listening_addr) {
            let _ = stream.shutdown(Shutdown::Both);
        }

        if let Some(jh) = self.accept_jh.take() {
            let _ = jh.join();
        }
    }
}
