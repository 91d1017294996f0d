// File: crafthead-core/src/profile/cache.rs

use std::time::Duration;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crafthead_common::models::{Game, Profile};

#[derive(Debug, Clone)]
struct CachedProfile {
    profile: Profile,
    fetched_at: DateTime<Utc>,
}

/// In-memory profile cache keyed by canonical id, with a secondary
/// lowercase-display-name index that lets username requests skip the
/// upstream round trip.
pub struct ProfileCache {
    profiles: DashMap<(Game, String), CachedProfile>,
    names: DashMap<(Game, String), String>,
    ttl: chrono::Duration,
}

impl ProfileCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            profiles: DashMap::new(),
            names: DashMap::new(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::hours(1)),
        }
    }

    pub fn insert(&self, game: Game, profile: Profile) {
        self.names.insert((game, profile.name.to_lowercase()), profile.id.clone());
        self.profiles.insert(
            (game, profile.id.clone()),
            CachedProfile {
                profile,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Fresh profile for a canonical id; an expired entry is dropped.
    pub fn get(&self, game: Game, id: &str) -> Option<Profile> {
        let key = (game, id.to_string());
        let expired = {
            let entry = self.profiles.get(&key)?;
            if Utc::now().signed_duration_since(entry.fetched_at) < self.ttl {
                return Some(entry.profile.clone());
            }
            true
        };
        if expired {
            self.profiles.remove(&key);
        }
        None
    }

    /// Canonical id previously seen for this display name (case-insensitive).
    pub fn id_for_name(&self, game: Game, name: &str) -> Option<String> {
        let id = self.names.get(&(game, name.to_lowercase()))?.value().clone();
        if self.get(game, &id).is_some() {
            Some(id)
        } else {
            self.names.remove(&(game, name.to_lowercase()));
            None
        }
    }

    /// Drops every expired entry and returns how many profiles went.
    pub fn prune(&self) -> usize {
        let now = Utc::now();
        let before = self.profiles.len();
        self.profiles
            .retain(|_, cached| now.signed_duration_since(cached.fetched_at) < self.ttl);
        self.names
            .retain(|(game, _), id| self.profiles.contains_key(&(*game, id.clone())));
        before.saturating_sub(self.profiles.len())
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Test helper: age a cached entry.
    pub fn test_force_fetched_at(&self, game: Game, id: &str, hours_ago: i64) -> bool {
        if let Some(mut entry) = self.profiles.get_mut(&(game, id.to_string())) {
            entry.fetched_at = Utc::now() - chrono::Duration::hours(hours_ago);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> Profile {
        Profile {
            id: id.into(),
            name: name.into(),
            properties: vec![],
            skin: None,
        }
    }

    #[test]
    fn test_name_index_is_case_insensitive() {
        let cache = ProfileCache::new(Duration::from_secs(60));
        cache.insert(Game::Minecraft, profile("abc", "CherryJimbo"));
        assert_eq!(cache.id_for_name(Game::Minecraft, "cherryjimbo").as_deref(), Some("abc"));
        assert_eq!(cache.id_for_name(Game::Hytale, "cherryjimbo"), None);
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = ProfileCache::new(Duration::from_secs(3600));
        cache.insert(Game::Minecraft, profile("abc", "Someone"));
        assert!(cache.test_force_fetched_at(Game::Minecraft, "abc", 2));
        assert!(cache.get(Game::Minecraft, "abc").is_none());
        assert!(cache.id_for_name(Game::Minecraft, "someone").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_prune_sweeps_stale_names() {
        let cache = ProfileCache::new(Duration::from_secs(3600));
        cache.insert(Game::Minecraft, profile("a", "One"));
        cache.insert(Game::Minecraft, profile("b", "Two"));
        cache.test_force_fetched_at(Game::Minecraft, "a", 5);
        assert_eq!(cache.prune(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.id_for_name(Game::Minecraft, "two").is_some());
    }
}
