// crafthead-core/src/tasks/mod.rs

pub mod cache_maintenance;

use std::future::Future;
use tokio_util::task::TaskTracker;
use tracing::error;

use crate::Error;

pub use cache_maintenance::spawn_profile_cache_prune_task;

/// Pool for detached work that must never hold up a response (render-cache
/// stores). Failures are logged and otherwise dropped.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `fut` and return immediately.
    pub fn spawn<F>(&self, label: &'static str, fut: F)
    where
        F: Future<Output = Result<(), Error>> + Send + 'static,
    {
        self.tracker.spawn(async move {
            if let Err(e) = fut.await {
                error!("Background task '{}' failed: {:?}", label, e);
            }
        });
    }

    pub fn len(&self) -> usize {
        self.tracker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracker.is_empty()
    }

    /// Wait for everything scheduled so far. New work may still be spawned
    /// afterwards.
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
