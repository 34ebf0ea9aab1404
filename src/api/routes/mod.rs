//! Route handlers for the read API
//!
//! Handlers are organized by domain:
//! - [`characters`] - Character listing and detail
//! - [`system`] - Health, OpenAPI

mod characters;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use characters::*;
pub use system::*;
