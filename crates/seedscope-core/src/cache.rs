use crate::config::ViewSettings;
use crate::errors::LoadError;
use crate::repository::{ConfigSource, ResultRepository};
use crate::snapshot::Snapshot;
use crate::view::{TreeItem, TreeNode};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Holds the last built [`Snapshot`] and serves queries from it until
/// [`SnapshotCache::refresh`] is called.
///
/// The slot lock is held while a snapshot is being built, so callers that
/// arrive during a rebuild wait for and share its result. The slot only ever
/// holds a complete snapshot.
pub struct SnapshotCache {
    results: Arc<dyn ResultRepository>,
    config: Arc<dyn ConfigSource>,
    slot: Mutex<Option<Arc<Snapshot>>>,
    loads: AtomicU64,
}

impl SnapshotCache {
    pub fn new(results: Arc<dyn ResultRepository>, config: Arc<dyn ConfigSource>) -> Self {
        Self {
            results,
            config,
            slot: Mutex::new(None),
            loads: AtomicU64::new(0),
        }
    }

    /// Current snapshot, building it first if the cache is empty.
    pub async fn get(&self) -> Result<Arc<Snapshot>, LoadError> {
        let mut slot = self.slot.lock().await;
        if let Some(snapshot) = slot.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(Snapshot::load(self.results.as_ref(), self.config.as_ref()).await?);
        let n = self.loads.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(load = n, fingerprint = %snapshot.fingerprint, "snapshot cache filled");
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drops the cached snapshot; the next query rebuilds from the repositories.
    pub async fn refresh(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            tracing::debug!("snapshot cache refreshed");
        }
    }

    /// Cached snapshot without triggering a load.
    pub async fn peek(&self) -> Option<Arc<Snapshot>> {
        self.slot.lock().await.clone()
    }

    /// Number of snapshots built so far.
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    /// Children of `parent` (roots when `None`) in the cached snapshot.
    pub async fn children(
        &self,
        parent: Option<&TreeNode>,
        view: Option<&ViewSettings>,
    ) -> Result<Vec<TreeItem>, LoadError> {
        let snapshot = self.get().await?;
        let view = view.copied().unwrap_or(snapshot.config.view);
        Ok(snapshot.children(parent, &view))
    }
}
