//! tube-dl service binary.

use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tube_dl::{Config, YtDlpExtractor, run_with_shutdown};

#[tokio::main]
async fn main() -> tube_dl::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    tracing::info!(
        bind = %config.server.bind_address,
        downloads = %config.download.download_dir.display(),
        "starting tube-dl"
    );

    let extractor = Arc::new(YtDlpExtractor::new(&config)?);

    run_with_shutdown(extractor, config).await
}
