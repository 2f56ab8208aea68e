//! Application state for the margin engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Settings;

/// Shared application state.
///
/// Holds the process-wide calculation settings. Handlers take a snapshot once
/// per request, so an update never changes a calculation already running.
#[derive(Clone)]
pub struct AppState {
    settings: Arc<RwLock<Settings>>,
}

impl AppState {
    /// Creates a new application state with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
        }
    }

    /// Returns a copy of the current settings.
    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Replaces the current settings. Callers validate first.
    pub async fn replace_settings(&self, settings: Settings) {
        *self.settings.write().await = settings;
    }
}
