use common::logger::init_logger;
use server::config::AppConfig;
use server::routes::build_router;
use server::state::AppState;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppConfig::from_env()?;
    init_logger("member-gate", cfg.json_logs);

    tracing::info!(
        addr = %cfg.bind_addr,
        cookie = %cfg.cookie.name,
        persistent = cfg.database_url.is_some(),
        "Starting member gate..."
    );

    let state = AppState::from_config(&cfg).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
