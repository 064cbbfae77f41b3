// Listener module
// Creates the TCP listening socket

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Backlog handed to `listen(2)`
const BACKLOG: i32 = 128;

/// Create a non-blocking `TcpListener` bound to `addr`.
///
/// `SO_REUSEADDR` lets a restarted server rebind while old connections sit
/// in `TIME_WAIT`. `SO_REUSEPORT` is deliberately left off so that a port
/// already served by another process is reported as in use.
///
/// Must be called from within a tokio runtime.
pub fn create_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
