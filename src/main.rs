use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use addrkind::config::{Command, ConfigError, Settings};
use addrkind::server::{router, AppState, ClassifyResponse};
use addrkind::types::parse_address;
use addrkind::Classifier;
use clap::Parser;
use thiserror::Error;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("invalid address")]
    InvalidAddress,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    if let Err(err) = run(Settings::parse()).await {
        error!(error = %err, "addrkind terminated with error");
        std::process::exit(1);
    }
}

async fn run(settings: Settings) -> Result<(), AppError> {
    let classifier = settings.engine.classifier()?;
    info!(
        upstream = ?settings.engine.upstream_kind,
        heuristic = ?classifier.heuristic(),
        "engine ready"
    );

    match settings.command {
        Command::Serve { listen_addr } => serve(classifier, listen_addr).await,
        Command::Classify { address } => classify_once(&classifier, &address).await,
    }
}

async fn serve(classifier: Classifier, addr: SocketAddr) -> Result<(), AppError> {
    let app = router(AppState {
        classifier: Arc::new(classifier),
    });

    info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn classify_once(classifier: &Classifier, input: &str) -> Result<(), AppError> {
    let verdict = classifier.classify(input).await;
    let addr = parse_address(input).ok();
    let (_, body) = ClassifyResponse::from_verdict(addr.as_ref(), &verdict);
    println!("{}", serde_json::to_string_pretty(&body)?);
    if addr.is_none() {
        return Err(AppError::InvalidAddress);
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
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
                error!(error = %e, "failed to install SIGTERM handler");
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
    info!("shutting down");
}
