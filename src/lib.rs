//! # tube-dl
//!
//! HTTP orchestration service around the yt-dlp media extraction engine.
//!
//! The crate wraps a yt-dlp subprocess behind a small REST API: clients POST a
//! video or playlist URL, the service drives the engine, stores the resulting
//! media under a local downloads root, and serves the files back over HTTP.
//! Expected engine failures (private videos, age restrictions, bot checks) are
//! classified and reported as friendly messages rather than opaque stderr.
//!
//! ## Design Philosophy
//!
//! tube-dl is designed to be:
//! - **Self-contained** - One binary, one downloads directory, no database
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Engine-agnostic at the seam** - The HTTP layer talks to a
//!   [`MediaExtractor`] trait, not to yt-dlp directly
//! - **Honest about failure** - Engine failures carry a classified
//!   [`FailureKind`] so clients get actionable messages
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tube_dl::{Config, YtDlpExtractor, start_api_server};
//!
//! #[tokio::main]
//! async fn main() -> tube_dl::Result<()> {
//!     let config = Arc::new(Config::from_env()?);
//!     let extractor = Arc::new(YtDlpExtractor::new(&config)?);
//!
//!     start_api_server(extractor, config).await
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Error types and failure classification
pub mod error;
/// Extraction engine adapter
pub mod extractor;
/// Downloads directory registry
pub mod registry;
/// Core request and result types
pub mod types;

// Re-export commonly used types
pub use api::{create_router, start_api_server};
pub use config::{AuthConfig, Config, DownloadConfig, ServerConfig};
pub use error::{ApiError, Error, FailureKind, Result, ToHttpStatus};
pub use extractor::{MediaExtractor, YtDlpExtractor};
pub use types::{DownloadRequest, PlaylistDownload, StoredArtifact, VideoDownload};

/// Run the API server until a termination signal arrives.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with a Ctrl+C fallback if
///   signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
pub async fn run_with_shutdown(
    extractor: std::sync::Arc<dyn MediaExtractor>,
    config: std::sync::Arc<Config>,
) -> Result<()> {
    tokio::select! {
        result = start_api_server(extractor, config) => result,
        () = wait_for_signal() => {
            tracing::info!("shutdown signal received");
            Ok(())
        }
    }
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let sigterm = signal(SignalKind::terminate());
    let sigint = signal(SignalKind::interrupt());

    match (sigterm, sigint) {
        (Ok(mut term), Ok(mut int)) => {
            tokio::select! {
                _ = term.recv() => {}
                _ = int.recv() => {}
            }
        }
        _ => {
            // Signal registration failed, fall back to Ctrl+C
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
