use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use course_feedback::config::Config;
use course_feedback::server::{self, AppState};
use course_feedback::store::Backend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("course_feedback=info")),
        )
        .init();

    let config = Config::parse();

    let backend = Backend::connect(&config)
        .await
        .context("failed to open feedback store")?;
    tracing::info!(backend = %backend.describe(), "store ready");

    let state = Arc::new(AppState::new(backend, config.public_dir.clone()));
    let app = server::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("course-feedback v{} on http://localhost:{}", env!("CARGO_PKG_VERSION"), config.port);
    tracing::info!(public = %config.public_dir.display(), "serving static assets");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
