//! Application state for the API server

use crate::store::CharacterStore;
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// Read access to the character catalogue
    pub store: Arc<dyn CharacterStore>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(store: Arc<dyn CharacterStore>) -> Self {
        Self { store }
    }
}
