//! Core types shared between the API layer, the extraction adapter, and the
//! file registry.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;

/// Incoming download request body
///
/// Used by both `POST /download-video` and `POST /download-playlist`.
/// The URL is optional at the serde level so that an absent field maps to a
/// 400 response instead of a body-rejection, matching the handler contract.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct DownloadRequest {
    /// Source video or playlist URL
    #[serde(default)]
    pub url: Option<String>,
}

/// A completed single-video download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDownload {
    /// Video title, derived from the final filename
    pub title: String,
    /// Final file name (no directory components)
    pub filename: String,
    /// Absolute or root-relative path of the artifact on disk
    pub file_path: PathBuf,
}

/// A completed (possibly partial) playlist download
///
/// Partial failure inside a collection is expected and non-fatal, so
/// `completed` may be less than `total`. The invariant `completed <= total`
/// always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDownload {
    /// Playlist title as reported by the engine, with path separators
    /// flattened to `_` so it names a single directory component
    pub playlist_name: String,
    /// Number of items the engine enumerated
    pub total: usize,
    /// Number of items that produced a playable artifact
    pub completed: usize,
    /// Directory under the downloads root holding the items
    pub dir: PathBuf,
}

/// A downloaded file discovered by scanning the downloads root
///
/// Derived on demand; no in-memory index is kept. The filesystem is the
/// source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredArtifact {
    /// Base file name
    pub filename: String,
    /// Path relative to the downloads root, using `/` separators
    pub relative_path: String,
    /// File size in bytes
    pub size_bytes: u64,
    /// Name of the collection subdirectory the file lives in, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_collection: Option<String>,
}
