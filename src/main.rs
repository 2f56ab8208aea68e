//! Server binary for the margin engine.

use std::env;

use arari_engine::api::{AppState, create_router};
use arari_engine::config::ConfigLoader;
use arari_engine::logging;
use tracing::info;

const DEFAULT_CONFIG_PATH: &str = "./config/settings.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config_path = env::var("ARARI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let loader = ConfigLoader::load(&config_path)?;
    let bind_address = loader.server().bind_address.clone();

    let app = create_router(AppState::new(loader.into_settings()));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Listening on http://{}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
