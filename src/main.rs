use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalogd::server::Server;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("CATALOG_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let data_dir = std::env::var("CATALOG_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"));

    let mut server = match Server::start(&bind, &data_dir).await {
        Ok(server) => server,
        Err(error) => {
            tracing::error!("failed to start catalog server: {error}");
            std::process::exit(1);
        }
    };

    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {error}");
    }
    if let Err(error) = server.shutdown() {
        tracing::warn!("{error}");
    }
}
