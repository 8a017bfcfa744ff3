//! File registry: filesystem scan utilities over the downloads root.
//!
//! There is no in-memory index. Every call rescans the directory tree, since
//! concurrent downloads can change its contents between calls. All lookups
//! sanitize caller-supplied names down to a base file name first, so no
//! input can resolve to a path outside the downloads root.

use crate::types::StoredArtifact;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reduce a caller-supplied name to a bare file name component
///
/// Strips any directory structure (both `/` and `\` separators) and rejects
/// empty names and the `.` / `..` components. Returns `None` when nothing
/// safe remains.
pub fn sanitize_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or("").trim();
    match base {
        "" | "." | ".." => None,
        _ => Some(base.to_string()),
    }
}

/// Recursively enumerate every artifact under the downloads root
///
/// Unreadable entries are skipped with a warning rather than failing the
/// whole listing. A missing root yields an empty list.
pub fn list_all(root: &Path) -> Vec<StoredArtifact> {
    let mut artifacts = Vec::new();

    for entry in WalkDir::new(root).into_iter() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry during scan");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(artifact) = artifact_for(root, entry.path()) {
            artifacts.push(artifact);
        }
    }

    artifacts
}

/// Resolve a file name to a path under the downloads root
///
/// Checks the direct child of the root first, then falls back to a recursive
/// search so playlist items inside collection subdirectories are found too.
/// Returns `None` when the file does not exist or the name is unsafe.
pub fn resolve(root: &Path, filename: &str) -> Option<PathBuf> {
    let base = sanitize_name(filename)?;

    let direct = root.join(&base);
    if direct.is_file() {
        return Some(direct);
    }

    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| {
            entry.file_type().is_file() && entry.file_name().to_string_lossy() == base
        })
        .map(|entry| entry.into_path())
}

/// List the immediate files of one collection subdirectory
///
/// Returns `None` when no such collection exists under the root.
pub fn list_for_collection(root: &Path, name: &str) -> Option<Vec<StoredArtifact>> {
    let base = sanitize_name(name)?;
    let dir = root.join(&base);
    if !dir.is_dir() {
        return None;
    }

    let mut artifacts = Vec::new();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(collection = %base, error = %e, "failed to read collection directory");
            return None;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_file()
            && let Some(artifact) = artifact_for(root, &path)
        {
            artifacts.push(artifact);
        }
    }

    Some(artifacts)
}

/// Content type for a file, derived from its extension
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());
    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

fn artifact_for(root: &Path, path: &Path) -> Option<StoredArtifact> {
    let relative = path.strip_prefix(root).ok()?;
    let filename = path.file_name()?.to_string_lossy().into_owned();
    let size_bytes = match path.metadata() {
        Ok(meta) => meta.len(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to stat artifact");
            return None;
        }
    };
    let parent_collection = relative
        .parent()
        .and_then(|parent| parent.components().next())
        .map(|c| c.as_os_str().to_string_lossy().into_owned());

    let relative_path = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    Some(StoredArtifact {
        filename,
        relative_path,
        size_bytes,
        parent_collection,
    })
}
