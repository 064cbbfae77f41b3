// Connection handling module
// Serves a single accepted TCP connection

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::io::Cursor;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use super::head::{self, HeadCheck};
use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Serve an accepted connection on its own local task.
///
/// Must be called from within a `LocalSet`. The task is not tracked:
/// when the accept loop stops, in-flight connections are dropped with it.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) {
    logger::log_connection_accepted(&peer_addr);

    let state = Arc::clone(state);
    tokio::task::spawn_local(async move {
        handle_connection(stream, peer_addr, state).await;
    });
}

/// One request per connection: the head is checked here, then the
/// connection is handed to hyper with the consumed bytes replayed in front
async fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    let (mut reader, mut writer) = stream.into_split();

    let consumed = match head::read_head(&mut reader).await {
        Ok(HeadCheck::Valid(consumed)) => consumed,
        Ok(HeadCheck::Malformed(reason)) => {
            logger::log_warning(&format!(
                "[Connection] Rejected request from {peer_addr}: {reason}"
            ));
            if let Err(e) = head::write_rejection(&mut writer, &reason).await {
                tracing::debug!("[Connection] Failed to send 400 to {peer_addr}: {e}");
            }
            return;
        }
        Ok(HeadCheck::Closed) => return,
        Err(e) => {
            tracing::debug!("[Connection] Read from {peer_addr} failed: {e}");
            return;
        }
    };

    let io = TokioIo::new(tokio::io::join(Cursor::new(consumed).chain(reader), writer));

    // Title-Case keeps header names on the wire as written, e.g.
    // `Access-Control-Allow-Origin`
    let mut builder = http1::Builder::new();
    builder.keep_alive(false).title_case_headers(true);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
    );

    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}
