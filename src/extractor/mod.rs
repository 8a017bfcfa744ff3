//! Extraction adapter: a thin wrapper around the external yt-dlp engine.
//!
//! The adapter translates a URL plus configured options into completed files
//! under the downloads root, or into a typed failure. All the hard work
//! (format negotiation, protocol handling, muxing) happens inside yt-dlp;
//! this module spawns it, bounds it, and classifies its failures.

use crate::config::{AuthConfig, Config, DownloadConfig};
use crate::error::{Error, FailureKind, Result};
use crate::types::{PlaylistDownload, VideoDownload};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;

pub mod classify;

pub use classify::classify_failure;

/// Interface between the request handlers and the extraction engine
///
/// Downloads are long-running operations; exposing them as explicit futures
/// behind a trait lets the API layer await them off the dispatch path and
/// lets tests substitute a stub for the real engine.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Fetch a single video to the downloads root
    async fn fetch_video(&self, url: &str) -> Result<VideoDownload>;

    /// Fetch an enumerated playlist to a subdirectory of the downloads root
    ///
    /// Partial failure is non-fatal; the result reports how many items
    /// produced a playable artifact out of how many were enumerated.
    async fn fetch_playlist(&self, url: &str) -> Result<PlaylistDownload>;
}

/// [`MediaExtractor`] implementation that shells out to the yt-dlp binary
pub struct YtDlpExtractor {
    binary: PathBuf,
    download: DownloadConfig,
    auth: AuthConfig,
    /// Bounds concurrent engine invocations so a burst of requests cannot
    /// spawn an unbounded number of yt-dlp processes.
    slots: Semaphore,
}

impl YtDlpExtractor {
    /// Create an extractor from the service configuration
    ///
    /// The engine binary is taken from `config.download.ytdlp_path` when
    /// set, otherwise discovered on PATH.
    pub fn new(config: &Config) -> Result<Self> {
        let binary = match &config.download.ytdlp_path {
            Some(path) => path.clone(),
            None => which::which("yt-dlp").map_err(|e| Error::EngineMissing(e.to_string()))?,
        };
        tracing::info!(binary = %binary.display(), "using extraction engine");

        Ok(Self {
            binary,
            download: config.download.clone(),
            auth: config.auth.clone(),
            slots: Semaphore::new(config.download.max_concurrent_downloads),
        })
    }

    fn format_selector(&self) -> String {
        let h = self.download.max_height;
        format!("bestvideo[height<={h}]+bestaudio/best[height<={h}]")
    }

    /// Flags shared by every invocation: quiet output, resiliency knobs, and
    /// platform auth passthrough.
    fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-progress".to_string(),
            "--no-warnings".to_string(),
            "--retries".to_string(),
            self.download.retries.to_string(),
            "--socket-timeout".to_string(),
            self.download.socket_timeout_secs.to_string(),
        ];
        if let Some(cookie_file) = &self.auth.cookie_file {
            args.push("--cookies".to_string());
            args.push(cookie_file.to_string_lossy().into_owned());
        }
        if let (Some(username), Some(password)) = (&self.auth.username, &self.auth.password) {
            args.push("--username".to_string());
            args.push(username.clone());
            args.push("--password".to_string());
            args.push(password.clone());
        }
        args
    }

    fn single_args(&self, url: &str) -> Vec<String> {
        let template = self
            .download
            .download_dir
            .join("%(title)s [%(id)s].%(ext)s");
        let mut args = self.base_args();
        args.extend([
            "--no-playlist".to_string(),
            "-f".to_string(),
            self.format_selector(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "--no-simulate".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            url.to_string(),
        ]);
        args
    }

    fn playlist_probe_args(&self, url: &str) -> Vec<String> {
        let mut args = self.base_args();
        args.extend([
            "--flat-playlist".to_string(),
            "-J".to_string(),
            url.to_string(),
        ]);
        args
    }

    fn playlist_args(&self, url: &str) -> Vec<String> {
        let template = self
            .download
            .download_dir
            .join("%(playlist_title)s")
            .join("%(playlist_index)s - %(title)s.%(ext)s");
        let mut args = self.base_args();
        args.extend([
            "--yes-playlist".to_string(),
            "--ignore-errors".to_string(),
            "-f".to_string(),
            self.format_selector(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "-o".to_string(),
            template.to_string_lossy().into_owned(),
            "--no-simulate".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            url.to_string(),
        ]);
        args
    }

    /// Run one engine invocation, bounded by the configured operation
    /// timeout. The child is spawned with `kill_on_drop` so a timed-out
    /// invocation does not leave an orphaned process behind.
    async fn run_engine(&self, args: &[String]) -> Result<std::process::Output> {
        tracing::debug!(binary = %self.binary.display(), ?args, "invoking extraction engine");

        let child = Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::EngineMissing(e.to_string()),
                _ => Error::Io(e),
            })?;

        let bound = Duration::from_secs(self.download.operation_timeout_secs);
        match tokio::time::timeout(bound, child.wait_with_output()).await {
            Ok(output) => Ok(output?),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.download.operation_timeout_secs,
                    "engine invocation exceeded operation timeout, killing"
                );
                Err(Error::Extraction {
                    kind: FailureKind::Timeout,
                    message: format!(
                        "operation exceeded {} second bound",
                        self.download.operation_timeout_secs
                    ),
                })
            }
        }
    }

    async fn acquire_slot(&self) -> Result<tokio::sync::SemaphorePermit<'_>> {
        self.slots
            .acquire()
            .await
            .map_err(|_| Error::Other("download capacity closed".to_string()))
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    async fn fetch_video(&self, url: &str) -> Result<VideoDownload> {
        let _permit = self.acquire_slot().await?;

        let output = self.run_engine(&self.single_args(url)).await?;
        if !output.status.success() {
            return Err(failure_from_stderr(&output.stderr));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let file_path = stdout
            .lines()
            .rev()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| Error::Extraction {
                kind: FailureKind::Unknown,
                message: "engine reported success but produced no file".to_string(),
            })?;

        let filename = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = title_from_path(&file_path);

        tracing::info!(%title, file = %file_path.display(), "single download complete");
        Ok(VideoDownload {
            title,
            filename,
            file_path,
        })
    }

    async fn fetch_playlist(&self, url: &str) -> Result<PlaylistDownload> {
        let _permit = self.acquire_slot().await?;

        // Probe first: enumerate entries without downloading, to learn the
        // playlist title and the total item count.
        let probe = self.run_engine(&self.playlist_probe_args(url)).await?;
        if !probe.status.success() {
            return Err(failure_from_stderr(&probe.stderr));
        }

        let meta: serde_json::Value = serde_json::from_slice(&probe.stdout)?;
        // Path separators in a playlist title would split the collection
        // directory into nested segments, so they are flattened up front.
        let playlist_name = meta
            .get("title")
            .and_then(|title| title.as_str())
            .unwrap_or("playlist")
            .replace(['/', '\\'], "_");
        let total = meta
            .get("entries")
            .and_then(|entries| entries.as_array())
            .map(|entries| entries.len())
            .unwrap_or(0);
        if total == 0 {
            return Err(Error::Extraction {
                kind: FailureKind::EmptyCollection,
                message: format!("playlist {playlist_name:?} enumerated no entries"),
            });
        }

        tracing::info!(playlist = %playlist_name, total, "playlist download starting");
        let output = self.run_engine(&self.playlist_args(url)).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let completed = stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count()
            .min(total);

        // --ignore-errors makes per-item failures non-fatal, but a run that
        // produced nothing at all is a real failure.
        if completed == 0 {
            if !output.status.success() {
                return Err(failure_from_stderr(&output.stderr));
            }
            return Err(Error::Extraction {
                kind: FailureKind::Unknown,
                message: "engine reported success but produced no files".to_string(),
            });
        }

        let dir = self.download.download_dir.join(&playlist_name);

        tracing::info!(playlist = %playlist_name, completed, total, "playlist download complete");
        Ok(PlaylistDownload {
            playlist_name,
            total,
            completed,
            dir,
        })
    }
}

fn failure_from_stderr(stderr: &[u8]) -> Error {
    let text = String::from_utf8_lossy(stderr);
    // yt-dlp puts the decisive message on its last ERROR line; fall back to
    // the whole stream when no such line exists.
    let message = text
        .lines()
        .rev()
        .find(|line| line.starts_with("ERROR:"))
        .unwrap_or(text.trim())
        .to_string();
    let kind = classify_failure(&message);
    tracing::warn!(kind = %kind, error = %message, "engine invocation failed");
    Error::Extraction { kind, message }
}

/// Derive a display title from a final artifact path by stripping the
/// ` [id]` suffix the output template appends.
fn title_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    match (stem.rfind(" ["), stem.ends_with(']')) {
        (Some(open), true) => stem[..open].to_string(),
        _ => stem,
    }
}
