mod cli;

use crate::cli::{StorageBackendArg, CLI};
use clap::Parser;
use std::sync::Arc;
use tinylink_gateway::{telemetry, App, AppState};
use tinylink_generator::RandomGenerator;
use tinylink_shortener::ShortenerService;
use tinylink_storage::{InMemoryRepository, Repository, SqliteRepository};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::parse();
    telemetry::init(config.log_format);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        storage_backend = %config.storage,
        "starting tinylink server"
    );

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(listener, InMemoryRepository::new()).await?;
        }
        StorageBackendArg::Sqlite => {
            info!(path = %config.sqlite_path.display(), "using sqlite storage");
            let repository = SqliteRepository::connect(&config.sqlite_path).await?;
            run_server(listener, repository.clone()).await?;
            repository.close().await;
        }
    }

    info!("server stopped");
    Ok(())
}

async fn run_server<R: Repository>(listener: TcpListener, repository: R) -> std::io::Result<()> {
    let service = ShortenerService::new(repository, RandomGenerator::new());
    let state = AppState::new(Arc::new(service));

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    info!("shutdown signal received");
}
