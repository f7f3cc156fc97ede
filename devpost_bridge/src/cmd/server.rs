use crate::cmd::create_client;
use crate::modules::handlers::{active_hackathons, hackathons, liveness, upcoming_hackathons};
use anyhow::{Context, Result};
use axum::{extract::Extension, routing, Router, Server};
use clap::Args;
use devpost_bridge_libs::devpost::client::DevpostClient;
use std::{future, net::SocketAddr, sync::Arc};

#[derive(Debug, Args)]
pub struct ServerArgs {
    #[arg(long)]
    port: Option<u16>,
}

pub async fn run(args: ServerArgs) -> Result<()> {
    let client = create_client()?;
    tracing::info!("Hackathons will be fetched from {}", client.api_url());

    let app = create_router(client);
    let port = match args.port {
        Some(port) => port,
        None => {
            tracing::warn!("API server will be launched at default port number 8000");
            8000u16
        }
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server start at port {}", port);
    Server::try_bind(&addr)
        .with_context(|| {
            let message = format!("failed to bind server to {}", addr);
            tracing::error!(message);
            message
        })?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    Ok(())
}

fn create_router(client: DevpostClient) -> Router {
    Router::new()
        .route("/api/devpost/hackathons", routing::get(hackathons))
        .route("/api/devpost/hackathons/active", routing::get(active_hackathons))
        .route(
            "/api/devpost/hackathons/upcoming",
            routing::get(upcoming_hackathons),
        )
        .route("/api/liveness", routing::get(liveness))
        .layer(Extension(Arc::new(client)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {:?}", e);
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install signal handler: {:?}", e);
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown.");
}
