//! Expiration Sweep Task
//!
//! Background task that periodically removes expired entries from a store.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `interval` between sweeps and goes through the
/// store's normal locked API, holding the write lock for one sweep at a
/// time. It only keeps a weak reference, so it stops on its own once the
/// store is dropped.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it.
///
/// # Panics
/// If called outside a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::new(1024));
/// let sweeper = spawn_cleanup_task(Arc::clone(&store), Duration::from_secs(60));
/// // Later, during shutdown:
/// sweeper.abort();
/// ```
pub fn spawn_cleanup_task(store: Arc<CacheStore>, interval: Duration) -> JoinHandle<()> {
    let store = Arc::downgrade(&store);

    tokio::spawn(async move {
        info!(?interval, "Starting expiration sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                debug!("Store dropped, stopping expiration sweep");
                break;
            };

            let removed = store.remove_expired();
            if removed > 0 {
                info!("Expiration sweep: removed {} expired entries", removed);
            } else {
                debug!("Expiration sweep: no expired entries found");
            }
        }
    })
}
