use codehelper_page::ScrapePayload;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Holds the most recent scrape result. Each `set` replaces the previous
/// value; there is no history.
#[derive(Clone, Default)]
pub struct SnapshotSlot {
    inner: Arc<RwLock<Option<ScrapePayload>>>,
}

impl SnapshotSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, payload: ScrapePayload) {
        *self.inner.write().await = Some(payload);
    }

    pub async fn get_or_none(&self) -> Option<ScrapePayload> {
        self.inner.read().await.clone()
    }
}
