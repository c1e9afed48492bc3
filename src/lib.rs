pub mod config;
pub mod error;
pub mod game;
pub mod protocol;
pub mod room;
pub mod ws;

use std::sync::Arc;

use room::registry::RoomRegistry;

/// Application state shared across all connections
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(RoomRegistry::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
