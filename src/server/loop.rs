// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop: `listening` until `shutdown` completes, then `stopped`.
///
/// Accept errors (e.g. running out of file descriptors) are logged and the
/// loop keeps going. The listener is dropped, and the port released, before
/// this returns.
pub async fn run_accept_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    if let Ok(addr) = listener.local_addr() {
        logger::log_server_stop(&addr);
    }
    drop(listener);
}
