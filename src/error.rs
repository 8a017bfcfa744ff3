//! Error types for tube-dl
//!
//! This module provides error handling for the service, including:
//! - The service-level [`Error`] enum
//! - The [`FailureKind`] taxonomy for classified extraction-engine failures
//! - HTTP status code mapping for API integration via [`ToHttpStatus`]

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for tube-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum number of characters of raw engine output surfaced to clients
/// for unclassified failures.
const UNKNOWN_MESSAGE_LIMIT: usize = 200;

/// Main error type for tube-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Request body carried no URL
    #[error("No URL provided")]
    MissingUrl,

    /// The extraction engine failed in a way the classifier recognized
    ///
    /// These are routine, expected outcomes of the domain (platform
    /// restrictions) and are reported to clients as HTTP 200 with
    /// `status: "error"` rather than as transport errors. The API layer
    /// intercepts this variant before it reaches [`ToHttpStatus`].
    #[error("extraction failed: {message}")]
    Extraction {
        /// Classified failure category
        kind: FailureKind,
        /// Raw failure text from the engine (server-side logs only)
        message: String,
    },

    /// The yt-dlp binary could not be located
    #[error("extraction engine not found: {0}")]
    EngineMissing(String),

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "PORT")
        key: Option<String>,
    },

    /// Requested artifact does not exist under the downloads root
    #[error("not found: {0}")]
    NotFound(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Classified extraction-engine failure categories
///
/// yt-dlp does not expose structured error codes, so these are derived by
/// substring-matching its stderr (see [`crate::extractor::classify`]).
/// That strategy is inherently fragile and is isolated behind a single
/// translation function for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Source marks the content private
    ItemPrivate,
    /// Deleted, restricted, or region-blocked content
    ItemUnavailable,
    /// Content requires age verification
    AgeRestricted,
    /// The platform's anti-automation challenge triggered
    BotDetected,
    /// Socket or overall operation exceeded the configured bound
    Timeout,
    /// Metadata retrieved but no downloadable stream exists
    NoPlayableFormat,
    /// A collection was enumerated but contained no items
    EmptyCollection,
    /// Any other failure
    Unknown,
}

impl FailureKind {
    /// Machine-readable name, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ItemPrivate => "item_private",
            FailureKind::ItemUnavailable => "item_unavailable",
            FailureKind::AgeRestricted => "age_restricted",
            FailureKind::BotDetected => "bot_detected",
            FailureKind::Timeout => "timeout",
            FailureKind::NoPlayableFormat => "no_playable_format",
            FailureKind::EmptyCollection => "empty_collection",
            FailureKind::Unknown => "unknown",
        }
    }

    /// Client-facing message for this failure category
    ///
    /// `raw` is the engine's failure text; it is only surfaced (truncated)
    /// for [`FailureKind::Unknown`], so internal detail from classified
    /// failures never leaks to clients.
    pub fn friendly_message(&self, raw: &str) -> String {
        match self {
            FailureKind::ItemPrivate => "This video is private and cannot be downloaded".into(),
            FailureKind::ItemUnavailable => {
                "This video is unavailable or has been removed".into()
            }
            FailureKind::AgeRestricted => {
                "This video is age-restricted and requires authentication".into()
            }
            FailureKind::BotDetected => {
                "YouTube flagged this request as automated; a valid cookie file is required"
                    .into()
            }
            FailureKind::Timeout => "The download timed out, please try again".into(),
            FailureKind::NoPlayableFormat => {
                "This video cannot be downloaded due to YouTube restrictions".into()
            }
            FailureKind::EmptyCollection => {
                "The playlist is empty or could not be enumerated".into()
            }
            FailureKind::Unknown => format!("Download failed: {}", truncate(raw)),
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn truncate(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.chars().count() <= UNKNOWN_MESSAGE_LIMIT {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(UNKNOWN_MESSAGE_LIMIT).collect();
    format!("{cut}...")
}

/// JSON error body returned by the API
///
/// Matches the wire shape of every non-success response:
///
/// ```json
/// {"status": "error", "msg": "No URL provided"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Always `"error"`
    pub status: String,
    /// Human-readable message, suitable for display to end users
    pub msg: String,
}

impl ApiError {
    /// Create a new API error body
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            msg: msg.into(),
        }
    }
}

/// Convert errors to HTTP status codes for API responses
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::MissingUrl => 400,
            Error::Config { .. } => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,

            // 502 Bad Gateway - the external engine failed and the API layer
            // did not absorb it into a 200 failure body
            Error::Extraction { .. } => 502,

            // 503 Service Unavailable - engine binary missing
            Error::EngineMissing(_) => 503,

            // 500 Internal Server Error - Server-side issues
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
            Error::Other(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::MissingUrl => "missing_url",
            Error::Config { .. } => "config_error",
            Error::NotFound(_) => "not_found",
            Error::Extraction { kind, .. } => kind.as_str(),
            Error::EngineMissing(_) => "engine_missing",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
            Error::Other(_) => "internal_error",
        }
    }
}
