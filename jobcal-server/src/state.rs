use std::sync::Arc;

use jobcal_core::SyncCoordinator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    coordinator: Arc<SyncCoordinator>,
}

impl AppState {
    pub fn new(coordinator: SyncCoordinator) -> Self {
        AppState {
            coordinator: Arc::new(coordinator),
        }
    }

    pub fn coordinator(&self) -> &SyncCoordinator {
        &self.coordinator
    }
}
