//! src/profile/mod.rs
//!
//! Maps canonical identities to profiles. Lookups go through an in-memory
//! cache first; upstream calls are bounded by a hard timeout that surfaces as
//! `UpstreamTimeout`, never as "not found".

pub mod cache;
pub mod playerdb;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crafthead_common::models::{Game, IdentityKind, Profile};
use crafthead_common::traits::ProfileProvider;
use crate::identity::is_offline_uuid;
use crate::Error;

pub use cache::ProfileCache;
pub use playerdb::PlayerDbProvider;

/// Where a profile answer came from. Observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Hit,
    Miss,
    /// Answered without asking upstream (offline ids, texture ids).
    LocalAuthority,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Hit => write!(f, "hit"),
            Provenance::Miss => write!(f, "miss"),
            Provenance::LocalAuthority => write!(f, "local-authority"),
        }
    }
}

/// Outcome of a username lookup: the canonical id, and the full profile when
/// the lookup already returned one.
#[derive(Debug, Clone)]
pub struct UsernameLookup {
    pub id: String,
    pub profile: Option<Profile>,
}

pub struct ProfileResolver {
    provider: Arc<dyn ProfileProvider>,
    cache: ProfileCache,
    timeout: Duration,
}

impl ProfileResolver {
    pub fn new(provider: Arc<dyn ProfileProvider>, cache_ttl: Duration, timeout: Duration) -> Self {
        Self {
            provider,
            cache: ProfileCache::new(cache_ttl),
            timeout,
        }
    }

    pub fn cache(&self) -> &ProfileCache {
        &self.cache
    }

    /// Resolve a username to its canonical id. `Ok(None)` means the provider
    /// does not know the name.
    pub async fn lookup_username(&self, game: Game, name: &str) -> Result<Option<UsernameLookup>, Error> {
        if let Some(id) = self.cache.id_for_name(game, name) {
            // The profile itself is still cached; `resolve` will report the hit.
            debug!("Name index hit for '{}' -> {}", name, id);
            return Ok(Some(UsernameLookup { id, profile: None }));
        }

        match self.fetch(game, name).await? {
            Some(profile) => {
                self.cache.insert(game, profile.clone());
                Ok(Some(UsernameLookup {
                    id: profile.id.clone(),
                    profile: Some(profile),
                }))
            }
            None => Ok(None),
        }
    }

    /// Resolve a canonical identity. `prefetched` is a profile the username
    /// lookup already returned during normalization.
    pub async fn resolve(
        &self,
        game: Game,
        identity: &str,
        kind: IdentityKind,
        prefetched: Option<&Profile>,
    ) -> Result<(Option<Profile>, Provenance), Error> {
        if kind == IdentityKind::TextureId {
            return Ok((None, Provenance::LocalAuthority));
        }
        if kind == IdentityKind::Uuid && is_offline_uuid(identity) {
            return Ok((None, Provenance::LocalAuthority));
        }
        if let Some(profile) = prefetched {
            return Ok((Some(profile.clone()), Provenance::Miss));
        }
        if let Some(profile) = self.cache.get(game, identity) {
            return Ok((Some(profile), Provenance::Hit));
        }

        self.cache.prune();
        let fetched = self.fetch(game, identity).await?;
        if let Some(profile) = &fetched {
            self.cache.insert(game, profile.clone());
        }
        Ok((fetched, Provenance::Miss))
    }

    async fn fetch(&self, game: Game, key: &str) -> Result<Option<Profile>, Error> {
        match tokio::time::timeout(self.timeout, self.provider.fetch_profile(game, key)).await {
            Ok(result) => result,
            Err(_) => Err(Error::UpstreamTimeout(format!(
                "{} profile lookup for '{}' exceeded {:?}",
                game, key, self.timeout
            ))),
        }
    }
}
