use crate::storage::kv::KvStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Starts periodic compaction of a disc-backed store
///
/// Returns `None` for memory-backed stores, which have nothing to compact.
/// The task runs until aborted or the runtime shuts down. Must be called from
/// within a tokio runtime.
pub fn spawn_compaction(store: Arc<KvStore>, every: Duration) -> Option<JoinHandle<()>> {
    if store.is_memory() {
        tracing::debug!("Memory-backed cache, compaction disabled");
        return None;
    }

    Some(tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;

        loop {
            interval.tick().await;

            let store = Arc::clone(&store);
            match tokio::task::spawn_blocking(move || store.compact()).await {
                Ok(Ok(())) => tracing::debug!("Cache compaction finished"),
                Ok(Err(e)) => tracing::warn!("Cache compaction failed: {}", e),
                Err(e) => tracing::error!("Cache compaction task panicked: {}", e),
            }
        }
    }))
}
