//! NetPilot API: HTTP front end for the question pipeline.
//!
//! Serves `POST /api/v1/ask` and `GET /health`.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use np_api::config::ApiConfig;
use np_api::routes;
use np_api::state::AppState;
use np_assistant::config::AssistantConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "np-api starting");

    let config = ApiConfig::from_env();
    let assistant = AssistantConfig::from_file(&config.assistant_config)?;
    tracing::info!(
        assistant_config = %config.assistant_config,
        device = %assistant.device.address(),
        "config loaded"
    );

    let state = AppState::from_config(&assistant)?;
    let app = routes::build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    tracing::info!("np-api stopped");
    Ok(())
}
