use depo_core::dependency::DependencySet;
use std::sync::Arc;
use tokio::sync::watch;

/// The client-side dependency snapshot of the active project.
///
/// Every write replaces the whole snapshot in one step; readers always see
/// either the previous or the next snapshot, never a mix.
pub struct DependencyStore {
    snapshot: watch::Sender<Arc<DependencySet>>,
}

impl DependencyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(Arc::new(DependencySet::new()));
        Self { snapshot }
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Arc<DependencySet> {
        self.snapshot.borrow().clone()
    }

    /// Replaces the snapshot wholesale.
    pub fn replace(&self, set: DependencySet) {
        tracing::debug!(
            "[DependencyStore] Replacing snapshot ({} dependencies)",
            set.len()
        );
        self.snapshot.send_replace(Arc::new(set));
    }

    /// Discards the snapshot.
    pub fn clear(&self) {
        self.replace(DependencySet::new());
    }

    /// Subscribes to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Arc<DependencySet>> {
        self.snapshot.subscribe()
    }
}

impl Default for DependencyStore {
    fn default() -> Self {
        Self::new()
    }
}
