use crate::store::StateStore;

/// All shared state involved in http communication
#[derive(Debug, Default, Clone)]
pub struct AppState {
    /// The authoritative speed / cabin-noise record, shared with every
    /// handler through the router state
    pub store: StateStore,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
