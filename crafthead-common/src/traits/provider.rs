use async_trait::async_trait;
use crate::error::Error;
use crate::models::{Game, Profile};

/// Upstream profile lookup, keyed by username or canonical UUID.
///
/// `Ok(None)` means the provider answered "no such player"; transport
/// problems and unexpected statuses are errors.
#[async_trait]
pub trait ProfileProvider: Send + Sync {
    async fn fetch_profile(&self, game: Game, key: &str) -> Result<Option<Profile>, Error>;
}
