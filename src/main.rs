mod config;
mod error;
mod extractor;
mod models;
mod routes;
mod storage;
#[cfg(test)]
mod test_harness;
mod video_processor;

use std::sync::Arc;

use clap::Parser;
use config::Config;
use routes::{create_routes, AppState};
use tower::ServiceBuilder;
use tower_http::ServiceBuilderExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use video_processor::ClipProcessor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clip_processor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();
    tracing::info!(
        ytdlp = %config.ytdlp_path.display(),
        storage = %config.storage_base_url,
        bucket = %config.storage_bucket,
        "Starting clip processor"
    );

    let state = AppState {
        processor: Arc::new(ClipProcessor::from_config(&config)),
    };
    let app = create_routes(state).layer(
        ServiceBuilder::new()
            .trace_for_http()
    );

    tracing::info!("Listening on {}", config.bind);
    axum::Server::try_bind(&config.bind)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {e}");
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
                tracing::warn!("Failed to listen for SIGTERM: {e}");
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
    tracing::info!("Shutdown signal received, draining requests");
}
