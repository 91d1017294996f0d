// crafthead-core/src/tasks/cache_maintenance.rs

use std::time::Duration;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;
use crate::profile::ProfileResolver;

/// Spawns a background task that periodically drops expired profiles. Expiry
/// is also enforced lazily on read; this only bounds memory.
pub fn spawn_profile_cache_prune_task(
    profiles: Arc<ProfileResolver>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            sleep(interval).await;
            let removed = profiles.cache().prune();
            if removed > 0 {
                debug!("Pruned {} expired profile(s)", removed);
            }
        }
    })
}
