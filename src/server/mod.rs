// Server module entry point
// Binding, the accept loop and process-level shutdown

pub mod connection;
pub mod head;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::run_accept_loop;
pub use signal::ShutdownSignal;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::{AppState, Config};
use crate::error::ServeError;
use crate::logger;

/// Bind the listening socket, mapping failures to a startup error
pub fn bind(addr: SocketAddr) -> crate::Result<TcpListener> {
    create_listener(addr).map_err(|source| ServeError::Bind { addr, source })
}

/// Run the server described by `config` until SIGINT/SIGTERM
pub async fn run(config: &Config) -> crate::Result<()> {
    let state = Arc::new(AppState::new(config).map_err(ServeError::Root)?);
    let shutdown = ShutdownSignal::register().map_err(ServeError::Runtime)?;
    let listener = bind(config.socket_addr())?;

    let local_addr = listener.local_addr().map_err(ServeError::Runtime)?;
    logger::log_server_start(&local_addr);
    logger::log_serving_root(state.root());

    serve(listener, state, shutdown.recv()).await;
    Ok(())
}

/// Serve connections from `listener` until `shutdown` resolves.
///
/// Connections are spawned as local tasks, so this runs its own `LocalSet`.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let local = tokio::task::LocalSet::new();
    local
        .run_until(run_accept_loop(listener, state, shutdown))
        .await;
}
