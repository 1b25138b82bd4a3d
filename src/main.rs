//! pollftp - Entry Point
//!
//! Serves a local directory over FTP, polling the engine from a
//! single-threaded tokio runtime.

use log::{error, info, warn};
use std::process::ExitCode;

use pollftp::config::ServerConfig;
use pollftp::error::FtpServerError;
use pollftp::net::{TcpConnector, TcpListenerHandle};
use pollftp::storage::LocalFileSystem;
use pollftp::utils::setup_logging;
use pollftp::FtpServer;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    setup_logging();

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> Result<(), FtpServerError> {
    if let Err(e) = std::fs::create_dir_all(&config.server_root) {
        warn!("Failed to create server root directory: {}", e);
    }

    let mut server = FtpServer::new(
        TcpListenerHandle::new(config.control_addr()?),
        TcpListenerHandle::new(config.passive_addr()?),
        TcpConnector::new(config.connect_timeout()),
        LocalFileSystem::new(&config.server_root),
        config.session_settings()?,
    );
    server.start(&config.username, &config.password)?;
    info!("Launching FTP server on {}", config.control_addr()?);

    let mut ticker = tokio::time::interval(config.poll_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => server.poll(),
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("Failed to listen for shutdown signal: {}", e);
                }
                info!("Shutting down");
                break;
            }
        }
    }

    server.stop();
    Ok(())
}
