//! Binary entrypoint: explicit composition of config, storage, services, and
//! router, in dependency order.

use property_api::{app, config, setup_storage, AppState};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("property_api=info".parse()?))
        .init();

    let config = config::load()?;

    // A backend that fails to connect aborts startup; the process never
    // serves traffic over a partially initialized storage layer.
    let storage = setup_storage(&config.storage).await?;
    let state = AppState::new(&storage);

    let router = app(state).layer(TimeoutLayer::new(Duration::from_secs(
        config.server.timeout_secs,
    )));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
