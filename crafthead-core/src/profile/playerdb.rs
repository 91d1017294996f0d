// File: crafthead-core/src/profile/playerdb.rs

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crafthead_common::models::{Game, Profile, ProfileProperty, StructuredSkin};
use crafthead_common::traits::ProfileProvider;
use crate::http::HttpClient;
use crate::Error;

/// JSON envelope returned by `GET /api/player/{game}/{key}`.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PlayerDbEnvelope {
    code: String,
    message: Option<String>,
    success: bool,
    data: Option<PlayerDbData>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PlayerDbData {
    player: Option<PlayerDbPlayer>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PlayerDbPlayer {
    id: String,
    raw_id: Option<String>,
    username: String,
    properties: Vec<ProfileProperty>,
    skin: Option<StructuredSkin>,
}

/// Provider codes meaning "this player does not exist".
fn is_not_found_code(code: &str) -> bool {
    code.ends_with("not_found") || code.ends_with("invalid_username")
}

/// Profile provider backed by a playerdb-style HTTP API.
pub struct PlayerDbProvider {
    base: String,
    http: Arc<dyn HttpClient>,
}

impl PlayerDbProvider {
    pub fn new(base: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        Self {
            base: base.into(),
            http,
        }
    }

    fn lookup_url(&self, game: Game, key: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base)
            .map_err(|e| Error::UpstreamUnavailable(format!("bad profile api base '{}': {e}", self.base)))?;
        url.path_segments_mut()
            .map_err(|_| Error::UpstreamUnavailable(format!("profile api base '{}' cannot take a path", self.base)))?
            .pop_if_empty()
            .extend(["api", "player", game.as_str(), key]);
        Ok(url)
    }
}

#[async_trait]
impl ProfileProvider for PlayerDbProvider {
    async fn fetch_profile(&self, game: Game, key: &str) -> Result<Option<Profile>, Error> {
        let url = self.lookup_url(game, key)?;
        let mut headers = HashMap::new();
        headers.insert("Accept".to_string(), "application/json".to_string());

        let resp = self
            .http
            .get(url.as_str(), headers)
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("profile lookup for '{key}' failed => {e}")))?;

        if resp.status == 204 || resp.status == 206 {
            debug!("Profile provider returned {} for '{}'", resp.status, key);
            return Ok(None);
        }

        let envelope: Option<PlayerDbEnvelope> = serde_json::from_slice(&resp.body).ok();

        if !resp.is_success() {
            if let Some(env) = &envelope {
                if is_not_found_code(&env.code) {
                    return Ok(None);
                }
            }
            let code = envelope.map(|e| e.code).unwrap_or_default();
            return Err(Error::UpstreamUnavailable(format!(
                "profile lookup for '{key}' failed: HTTP {} ({code})",
                resp.status
            )));
        }

        let Some(envelope) = envelope else {
            return Err(Error::UpstreamUnavailable(format!(
                "profile lookup for '{key}' returned an unreadable body"
            )));
        };

        if !envelope.success {
            if is_not_found_code(&envelope.code) {
                return Ok(None);
            }
            warn!(
                "Profile provider refused '{}': {} {}",
                key,
                envelope.code,
                envelope.message.unwrap_or_default()
            );
            return Err(Error::UpstreamUnavailable(format!("provider error code {}", envelope.code)));
        }

        let Some(player) = envelope.data.and_then(|d| d.player) else {
            return Ok(None);
        };

        let id = player
            .raw_id
            .filter(|s| !s.is_empty())
            .unwrap_or(player.id)
            .replace('-', "")
            .to_ascii_lowercase();

        Ok(Some(Profile {
            id,
            name: player.username,
            properties: player.properties,
            skin: player.skin.filter(|s| !s.is_empty()),
        }))
    }
}
