// Application state module
// Immutable per-process state shared by every connection

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::assets::Mapping;

/// Application state
pub struct AppState {
    pub config: Config,
    pub mapping: Mapping,
    pub active_connections: AtomicUsize,
}

impl AppState {
    pub const fn new(config: Config, mapping: Mapping) -> Self {
        Self {
            config,
            mapping,
            active_connections: AtomicUsize::new(0),
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
