//! Application state for the API server

use crate::config::Config;
use crate::extractor::MediaExtractor;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request (cheap Arc clones). Holds the extraction adapter
/// behind its trait so tests can substitute a stub engine, plus the
/// immutable service configuration.
#[derive(Clone)]
pub struct AppState {
    /// Extraction adapter
    pub extractor: Arc<dyn MediaExtractor>,

    /// Service configuration (read-only after startup)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(extractor: Arc<dyn MediaExtractor>, config: Arc<Config>) -> Self {
        Self { extractor, config }
    }
}
