//! Translation of raw yt-dlp failure text into the [`FailureKind`] taxonomy.
//!
//! The engine does not expose structured error codes, so classification
//! works by substring-matching its stderr. That is fragile against upstream
//! wording changes, which is why the mapping lives in this one function and
//! nowhere else. If yt-dlp ever grows machine-readable error output, this
//! module is the only thing that needs replacing.

use crate::error::FailureKind;

/// Classify a raw engine failure message
///
/// Matching is case-insensitive. Anything unrecognized maps to
/// [`FailureKind::Unknown`]; the caller truncates the raw text before it is
/// surfaced to clients.
pub fn classify_failure(raw: &str) -> FailureKind {
    let text = raw.to_lowercase();

    // Bot challenges mention sign-in too, so they must be checked before the
    // generic sign-in/age patterns.
    if text.contains("confirm you're not a bot")
        || text.contains("confirm you\u{2019}re not a bot")
        || text.contains("captcha")
    {
        return FailureKind::BotDetected;
    }
    if text.contains("sign in to confirm your age")
        || text.contains("age-restricted")
        || text.contains("age restricted")
        || text.contains("inappropriate for some users")
    {
        return FailureKind::AgeRestricted;
    }
    if text.contains("private") {
        return FailureKind::ItemPrivate;
    }
    if text.contains("video unavailable")
        || text.contains("has been removed")
        || text.contains("no longer available")
        || text.contains("not available in your country")
        || text.contains("blocked in your country")
        || text.contains("unavailable")
    {
        return FailureKind::ItemUnavailable;
    }
    if text.contains("requested format is not available")
        || text.contains("no video formats found")
        || text.contains("no suitable formats")
    {
        return FailureKind::NoPlayableFormat;
    }
    if text.contains("timed out") || text.contains("timeout") {
        return FailureKind::Timeout;
    }

    FailureKind::Unknown
}
