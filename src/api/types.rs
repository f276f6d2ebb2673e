use std::sync::Arc;

use tokio::sync::RwLock;

use crate::store::RecordStore;

/// Shared handle passed to every handler. The single lock covers all three
/// collections and the id generators.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<RecordStore>>,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}
