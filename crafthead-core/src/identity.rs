//! src/identity.rs
//!
//! Classifies raw identity tokens (username / UUID / texture id) and turns
//! them into canonical, cache-safe identities. Display names are never used
//! as cache keys because players can rename.

use std::sync::Arc;
use md5::{Digest, Md5};
use tracing::debug;
use uuid::Uuid;

use crafthead_common::models::{Game, IdentityKind, Profile, RequestDescriptor, SkinModel};
use crate::profile::ProfileResolver;
use crate::Error;

const MAX_USERNAME_LEN: usize = 16;
const MAX_TEXTURE_TOKEN_LEN: usize = 90;
const MAX_TEXTURE_ID_LEN: usize = 64;

/// Result of classifying a raw token, already in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedIdentity {
    Username(String),
    /// Hyphen-free lowercase hex.
    Uuid(String),
    /// Lowercase hex with leading zeros stripped.
    TextureId(String),
}

impl ClassifiedIdentity {
    pub fn kind(&self) -> IdentityKind {
        match self {
            ClassifiedIdentity::Username(_) => IdentityKind::Username,
            ClassifiedIdentity::Uuid(_) => IdentityKind::Uuid,
            ClassifiedIdentity::TextureId(_) => IdentityKind::TextureId,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ClassifiedIdentity::Username(s)
            | ClassifiedIdentity::Uuid(s)
            | ClassifiedIdentity::TextureId(s) => s,
        }
    }
}

/// Classify and canonicalize a raw identity token for `game`.
pub fn classify(raw: &str, game: Game) -> Result<ClassifiedIdentity, Error> {
    let len = raw.len();
    if len == 0 {
        return Err(Error::InvalidIdentity("empty identity".to_string()));
    }

    if len <= MAX_USERNAME_LEN {
        return Ok(ClassifiedIdentity::Username(raw.to_string()));
    }

    if len == 32 {
        return canonical_uuid(raw).map(ClassifiedIdentity::Uuid);
    }

    if len == 36 && has_uuid_hyphens(raw) {
        return canonical_uuid(&raw.replace('-', "")).map(ClassifiedIdentity::Uuid);
    }

    if len <= MAX_TEXTURE_TOKEN_LEN && game.supports_texture_ids() {
        return canonical_texture_id(raw).map(ClassifiedIdentity::TextureId);
    }

    Err(Error::InvalidIdentity(format!("unrecognised identity '{}' for {}", raw, game)))
}

fn has_uuid_hyphens(raw: &str) -> bool {
    raw.char_indices().all(|(i, c)| match i {
        8 | 13 | 18 | 23 => c == '-',
        _ => c != '-',
    })
}

fn canonical_uuid(hex32: &str) -> Result<String, Error> {
    if !hex32.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::InvalidIdentity(format!("'{}' is not a hex UUID", hex32)));
    }
    Ok(hex32.to_ascii_lowercase())
}

fn canonical_texture_id(raw: &str) -> Result<String, Error> {
    if !raw.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) {
        return Err(Error::InvalidIdentity(format!("'{}' is not a texture id", raw)));
    }
    let stripped = raw.trim_start_matches('0');
    let canonical = if stripped.is_empty() { "0" } else { stripped };
    if canonical.len() > MAX_TEXTURE_ID_LEN {
        return Err(Error::InvalidIdentity(format!(
            "texture id longer than {} characters",
            MAX_TEXTURE_ID_LEN
        )));
    }
    Ok(canonical.to_string())
}

/// Deterministic offline identity for a username the provider does not know:
/// MD5("OfflinePlayer:" + name) stamped as an RFC-4122 version-3 UUID.
pub fn offline_uuid(username: &str) -> Uuid {
    let digest = Md5::digest(format!("OfflinePlayer:{}", username).as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    uuid::Builder::from_md5_bytes(bytes).into_uuid()
}

/// True when the canonical id is a version-3 (offline) UUID.
pub fn is_offline_uuid(canonical: &str) -> bool {
    Uuid::parse_str(canonical)
        .map(|u| u.get_version_num() == 3)
        .unwrap_or(false)
}

/// Built-in skins used when a player has no usable texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefaultSkin {
    Steve,
    Alex,
}

impl DefaultSkin {
    /// Pick the default skin the same way the game client does: fold the two
    /// 64-bit halves to 32 bits and test the low bit.
    pub fn for_uuid(uuid: &Uuid) -> Self {
        let (msb, lsb) = uuid.as_u64_pair();
        let hilo = msb ^ lsb;
        let folded = ((hilo >> 32) as u32) ^ (hilo as u32);
        if folded & 1 == 1 {
            DefaultSkin::Alex
        } else {
            DefaultSkin::Steve
        }
    }

    pub fn for_canonical(canonical: &str) -> Self {
        Uuid::parse_str(canonical)
            .map(|u| Self::for_uuid(&u))
            .unwrap_or(DefaultSkin::Steve)
    }

    pub fn model(self) -> SkinModel {
        match self {
            DefaultSkin::Steve => SkinModel::Regular,
            DefaultSkin::Alex => SkinModel::Slim,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DefaultSkin::Steve => "steve",
            DefaultSkin::Alex => "alex",
        }
    }
}

/// A descriptor whose identity is canonical, plus anything learned on the way.
#[derive(Debug, Clone)]
pub struct NormalizedRequest {
    pub descriptor: RequestDescriptor,
    /// The identity as the caller typed it (used for text fallbacks).
    pub requested_as: String,
    /// Full profile returned by the username lookup, if any.
    pub prefetched: Option<Profile>,
    /// The identity was synthesized from an unknown username.
    pub offline: bool,
}

pub struct IdentityNormalizer {
    profiles: Arc<ProfileResolver>,
}

impl IdentityNormalizer {
    pub fn new(profiles: Arc<ProfileResolver>) -> Self {
        Self { profiles }
    }

    pub async fn normalize(&self, request: &RequestDescriptor) -> Result<NormalizedRequest, Error> {
        let classified = classify(&request.raw_identity, request.game)?;

        match classified {
            ClassifiedIdentity::Username(name) => {
                match self.profiles.lookup_username(request.game, &name).await? {
                    Some(lookup) => Ok(NormalizedRequest {
                        descriptor: request.with_identity(lookup.id.clone(), IdentityKind::Uuid),
                        requested_as: name,
                        prefetched: lookup.profile,
                        offline: false,
                    }),
                    None => {
                        let offline = offline_uuid(&name).simple().to_string();
                        debug!("Username '{}' unknown upstream; using offline id {}", name, offline);
                        Ok(NormalizedRequest {
                            descriptor: request.with_identity(offline, IdentityKind::Uuid),
                            requested_as: name,
                            prefetched: None,
                            offline: true,
                        })
                    }
                }
            }
            other => Ok(NormalizedRequest {
                descriptor: request.with_identity(other.as_str(), other.kind()),
                requested_as: request.raw_identity.clone(),
                prefetched: None,
                offline: false,
            }),
        }
    }
}
