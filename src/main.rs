//! Binary entry point: serves `index.html` and the machine hostname on a
//! fixed host and port.

use std::error::Error;

use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

use hostpage::{PageHandler, Server, ServerConfig};

/// Host the server binds to
const HOST: &str = "0.0.0.0";
/// Port the server binds to
const PORT: u16 = 8080;

fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::init();

    let config = ServerConfig::from_socket_addrs((HOST, PORT))?;
    let server = Server::new(&config, PageHandler::new())?;

    println!("Server started http://{HOST}:{PORT}");

    // block until interrupted, then shut down
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let _ = signals.forever().next();

    drop(server);
    println!("Server stopped.");

    Ok(())
}
