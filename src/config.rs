//! Configuration types for tube-dl
//!
//! Configuration is constructed once at process start ([`Config::from_env`])
//! and passed by `Arc` into the extraction adapter and the API state. No
//! handler reads the environment directly.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use utoipa::ToSchema;

/// API server configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ServerConfig {
    /// Bind address for the HTTP listener (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Whether to add a permissive CORS layer (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Whether to mount Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            swagger_ui: true,
        }
    }
}

/// Download behavior configuration (directory, quality ceiling, resiliency)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Downloads root directory (default: "./downloads")
    #[serde(default = "default_download_dir")]
    #[schema(value_type = String)]
    pub download_dir: PathBuf,

    /// Maximum video height in pixels passed to the format selector (default: 1080)
    #[serde(default = "default_max_height")]
    pub max_height: u32,

    /// Retry count passed to the engine (default: 3)
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Socket timeout in seconds passed to the engine (default: 30)
    #[serde(default = "default_socket_timeout_secs")]
    pub socket_timeout_secs: u64,

    /// Overall bound on one engine invocation in seconds (default: 900)
    ///
    /// The engine process is killed when this expires. This is the only
    /// cancellation mechanism the service has.
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,

    /// Maximum concurrent engine invocations (default: 3)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,

    /// Explicit path to the yt-dlp binary (auto-detected from PATH if None)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub ytdlp_path: Option<PathBuf>,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            max_height: default_max_height(),
            retries: default_retries(),
            socket_timeout_secs: default_socket_timeout_secs(),
            operation_timeout_secs: default_operation_timeout_secs(),
            max_concurrent_downloads: default_max_concurrent(),
            ytdlp_path: None,
        }
    }
}

/// Platform authentication passed through to the extraction engine
///
/// Sourced from the environment only, never from request input. A cookie
/// file is the remediation for bot-detection challenges.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AuthConfig {
    /// Path to a Netscape-format cookie file handed to the engine
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub cookie_file: Option<PathBuf>,

    /// Platform username
    #[serde(default)]
    pub username: Option<String>,

    /// Platform password
    #[serde(default)]
    pub password: Option<String>,
}

/// Main configuration for the service
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// API server settings
    #[serde(flatten)]
    pub server: ServerConfig,

    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// Platform authentication passthrough
    #[serde(flatten)]
    pub auth: AuthConfig,
}

impl Config {
    /// Build a configuration from environment variables
    ///
    /// Recognized variables, all optional:
    /// - `PORT` — listening port (default 8080, bound on 0.0.0.0)
    /// - `DOWNLOAD_DIR` — downloads root
    /// - `MAX_HEIGHT` — quality ceiling in pixels
    /// - `YTDLP_PATH` — explicit engine binary path
    /// - `YTDLP_RETRIES`, `YTDLP_SOCKET_TIMEOUT_SECS`,
    ///   `YTDLP_OPERATION_TIMEOUT_SECS` — resiliency knobs
    /// - `MAX_CONCURRENT_DOWNLOADS` — engine invocation bound
    /// - `COOKIE_FILE`, `YT_USERNAME`, `YT_PASSWORD` — platform auth
    /// - `CORS_ENABLED`, `SWAGGER_UI` — server surface toggles
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Some(port) = parse_env::<u16>("PORT")? {
            config.server.bind_address = SocketAddr::from(([0, 0, 0, 0], port));
        }
        if let Some(enabled) = parse_env::<bool>("CORS_ENABLED")? {
            config.server.cors_enabled = enabled;
        }
        if let Some(enabled) = parse_env::<bool>("SWAGGER_UI")? {
            config.server.swagger_ui = enabled;
        }
        if let Ok(dir) = std::env::var("DOWNLOAD_DIR") {
            config.download.download_dir = PathBuf::from(dir);
        }
        if let Some(height) = parse_env::<u32>("MAX_HEIGHT")? {
            config.download.max_height = height;
        }
        if let Some(retries) = parse_env::<u32>("YTDLP_RETRIES")? {
            config.download.retries = retries;
        }
        if let Some(secs) = parse_env::<u64>("YTDLP_SOCKET_TIMEOUT_SECS")? {
            config.download.socket_timeout_secs = secs;
        }
        if let Some(secs) = parse_env::<u64>("YTDLP_OPERATION_TIMEOUT_SECS")? {
            config.download.operation_timeout_secs = secs;
        }
        if let Some(limit) = parse_env::<usize>("MAX_CONCURRENT_DOWNLOADS")? {
            if limit == 0 {
                return Err(Error::Config {
                    message: "MAX_CONCURRENT_DOWNLOADS must be at least 1".into(),
                    key: Some("MAX_CONCURRENT_DOWNLOADS".into()),
                });
            }
            config.download.max_concurrent_downloads = limit;
        }
        if let Ok(path) = std::env::var("YTDLP_PATH") {
            config.download.ytdlp_path = Some(PathBuf::from(path));
        }
        if let Ok(path) = std::env::var("COOKIE_FILE") {
            config.auth.cookie_file = Some(PathBuf::from(path));
        }
        if let Ok(user) = std::env::var("YT_USERNAME") {
            config.auth.username = Some(user);
        }
        if let Ok(pass) = std::env::var("YT_PASSWORD") {
            config.auth.password = Some(pass);
        }

        Ok(config)
    }
}

fn parse_env<T: FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().map(Some).map_err(|_| Error::Config {
            message: format!("invalid value for {key}: {raw:?}"),
            key: Some(key.to_string()),
        }),
        Err(_) => Ok(None),
    }
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_max_height() -> u32 {
    1080
}

fn default_retries() -> u32 {
    3
}

fn default_socket_timeout_secs() -> u64 {
    30
}

fn default_operation_timeout_secs() -> u64 {
    900
}

fn default_max_concurrent() -> usize {
    3
}

fn default_true() -> bool {
    true
}
