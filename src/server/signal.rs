// Signal handling module
//
// Supported signals:
// - SIGINT:  stop (Ctrl+C)
// - SIGTERM: stop
//
// Handlers are registered before the server starts listening so that a
// registration failure is a startup error rather than a silent no-op.

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Registered process-termination signals
pub struct ShutdownSignal {
    #[cfg(unix)]
    sigint: Signal,
    #[cfg(unix)]
    sigterm: Signal,
}

impl ShutdownSignal {
    #[cfg(unix)]
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Windows fallback - only Ctrl+C, registered lazily by `recv`
    #[cfg(not(unix))]
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for the first termination signal
    #[cfg(unix)]
    pub async fn recv(mut self) {
        tokio::select! {
            _ = self.sigint.recv() => tracing::info!("SIGINT received (Ctrl+C)"),
            _ = self.sigterm.recv() => tracing::info!("SIGTERM received"),
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Ctrl+C received"),
            Err(e) => {
                crate::logger::log_error(&format!("Cannot listen for Ctrl+C: {e}"));
                std::future::pending::<()>().await;
            }
        }
    }
}
