use crate::limit::{MemoryRateStore, RateStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub limiter: Arc<dyn RateStore>,
}

impl AppState {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            limiter: Arc::new(MemoryRateStore::new()),
        }
    }

    pub fn with_limiter(root: PathBuf, limiter: Arc<dyn RateStore>) -> Self {
        Self { root, limiter }
    }
}
