use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod auth;
mod error;
mod models;
mod platform;
mod routes;
mod server;
mod state;

use common::config::AppConfig;

use crate::{platform::youtube::YouTubeClient, server::Server, state::AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    common::logging::init_tracing();

    info!("Starting upload relay service");

    let config = AppConfig::from_env()?;
    info!(
        environment = %config.environment,
        upload_url = %config.youtube_upload_url,
        "Configuration loaded"
    );

    let platform = Arc::new(YouTubeClient::new(config.youtube_upload_url.clone()));
    let app_state = AppState::new(config, platform);

    // Start the web server
    let server = Server::bind(app_state).await?;
    info!("Upload relay listening on {}", server.local_addr()?);

    server.run(server::shutdown_signal()).await?;

    info!("Upload relay stopped");

    Ok(())
}
