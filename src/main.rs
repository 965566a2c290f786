mod api;
mod config;
mod db;
mod error;

use std::process::ExitCode;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;

#[tokio::main]
async fn main() -> ExitCode {
    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("polymarket-nba-api: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&cfg.log_level))
        .with_target(false)
        .init();

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server stopped: {e}");
            ExitCode::FAILURE
        }
    }
}

/// `LOG_LEVEL` as an `EnvFilter`; an unparsable directive falls back to `info`
/// instead of silently filtering everything out.
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|e| {
        eprintln!("Ignoring LOG_LEVEL={level:?} ({e}), using info");
        EnvFilter::new("info")
    })
}

async fn run(cfg: Config) -> Result<()> {
    // --- Database pool (lazy; /health reports reachability) ---
    let pool = db::create_pool(&cfg)?;
    info!(
        "Database pool ready (max_connections={}, acquire_timeout={:?})",
        cfg.db_max_connections, cfg.db_acquire_timeout,
    );

    // --- HTTP API server ---
    let app = router(ApiState { pool: pool.clone() });
    let bind_addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, draining connections");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_accepts_directives() {
        assert_eq!(log_filter("debug").to_string(), "debug");
        let filter = log_filter("polymarket_nba_api=debug,tower_http=info").to_string();
        assert!(filter.contains("polymarket_nba_api=debug"), "{filter}");
        assert!(filter.contains("tower_http=info"), "{filter}");
    }

    #[test]
    fn log_filter_falls_back_to_info() {
        assert_eq!(log_filter("polymarket_nba_api=chatty").to_string(), "info");
    }
}
