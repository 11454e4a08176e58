use std::sync::Arc;

use simplesiteaudit::api;
use simplesiteaudit::config::Config;
use simplesiteaudit::orchestrator::Orchestrator;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr;
    let orchestrator = Arc::new(Orchestrator::new(config));

    let app = api::router(orchestrator).layer(TraceLayer::new_for_http());

    info!(%bind_addr, "starting simplesiteaudit");
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
