use devserve::{logger, server, Config, ServeError};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> devserve::Result<()> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    // One thread is plenty for a local development server; connections
    // are still served concurrently as local tasks
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ServeError::Runtime)?;

    runtime.block_on(server::run(&cfg))
}
