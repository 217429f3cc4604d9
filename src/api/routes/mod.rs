//! Route handlers
//!
//! Handlers are thin: they extract the session and request parameters and
//! hand them to the matching controller.
//! - [`front`]: Front page and locale switching
//! - [`media`]: Media redirects and video metadata
//! - [`system`]: Health

mod front;
mod media;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use front::*;
pub use media::*;
pub use system::*;
