//! Route handlers for the HTTP API
//!
//! Handlers are organized by domain:
//! - [`downloads`] — single-video and playlist download orchestration
//! - [`files`] — artifact listing and retrieval
//! - [`system`] — health, banner, OpenAPI

mod downloads;
mod files;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use downloads::*;
pub use files::*;
pub use system::*;
