// File: crafthead-common/src/models/request.rs

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::Error;

pub const MIN_SIZE: u32 = 8;
pub const MAX_SIZE: u32 = 300;
pub const DEFAULT_SIZE: u32 = 180;

/// Clamp a requested pixel size into the supported range.
pub fn clamp_size(size: u32) -> u32 {
    size.clamp(MIN_SIZE, MAX_SIZE)
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    /// The legacy game; requests without a game prefix land here.
    #[default]
    Minecraft,
    Hytale,
}

impl Game {
    /// Whether raw texture hashes are accepted as identities for this game.
    pub fn supports_texture_ids(self) -> bool {
        matches!(self, Game::Minecraft)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Game::Minecraft => "minecraft",
            Game::Hytale => "hytale",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Game {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "minecraft" => Ok(Game::Minecraft),
            "hytale" => Ok(Game::Hytale),
            _ => Err(Error::InvalidRequest(format!("Unknown game: {}", s))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Avatar,
    Helm,
    Cube,
    Body,
    Bust,
    Cape,
    Skin,
    Profile,
}

impl View {
    pub fn as_str(self) -> &'static str {
        match self {
            View::Avatar => "avatar",
            View::Helm => "helm",
            View::Cube => "cube",
            View::Body => "body",
            View::Bust => "bust",
            View::Cape => "cape",
            View::Skin => "skin",
            View::Profile => "profile",
        }
    }

    /// Camera framing handed to the 3D model renderer. `None` means the view
    /// has no 3D equivalent.
    pub fn model_framing(self) -> Option<&'static str> {
        match self {
            View::Avatar | View::Helm => Some("avatar"),
            View::Cube => Some("cube"),
            View::Body => Some("body"),
            View::Bust => Some("bust"),
            View::Cape | View::Skin | View::Profile => None,
        }
    }

    /// Output dimensions (width, height) for a square `size`.
    pub fn dimensions(self, size: u32) -> (u32, u32) {
        match self {
            View::Body => (size, size * 2),
            _ => (size, size),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for View {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "avatar" => Ok(View::Avatar),
            "helm" => Ok(View::Helm),
            "cube" => Ok(View::Cube),
            "body" => Ok(View::Body),
            "bust" => Ok(View::Bust),
            "cape" => Ok(View::Cape),
            "skin" => Ok(View::Skin),
            "profile" => Ok(View::Profile),
            _ => Err(Error::InvalidRequest(format!("Unknown view: {}", s))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    Username,
    Uuid,
    TextureId,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SkinModel {
    #[serde(rename = "default")]
    Regular,
    Slim,
}

impl SkinModel {
    pub fn as_str(self) -> &'static str {
        match self {
            SkinModel::Regular => "default",
            SkinModel::Slim => "slim",
        }
    }
}

impl FromStr for SkinModel {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "slim" => Ok(SkinModel::Slim),
            "default" => Ok(SkinModel::Regular),
            _ => Err(Error::InvalidRequest(format!("Unknown model: {}", s))),
        }
    }
}

/// Everything the pipeline needs to know about one inbound request.
///
/// Descriptors are never mutated in place; the `with_*` builders and the
/// identity normalizer hand back new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub game: Game,
    pub view: View,
    pub raw_identity: String,
    pub identity_kind: IdentityKind,
    pub size: u32,
    pub armored: bool,
    pub model_override: Option<SkinModel>,
}

impl RequestDescriptor {
    pub fn new(game: Game, view: View, raw_identity: impl Into<String>, identity_kind: IdentityKind) -> Self {
        Self {
            game,
            view,
            raw_identity: raw_identity.into(),
            identity_kind,
            size: DEFAULT_SIZE,
            armored: false,
            model_override: None,
        }
    }

    pub fn with_size(&self, size: u32) -> Self {
        Self { size: clamp_size(size), ..self.clone() }
    }

    pub fn with_armored(&self, armored: bool) -> Self {
        Self { armored, ..self.clone() }
    }

    pub fn with_model(&self, model: Option<SkinModel>) -> Self {
        Self { model_override: model, ..self.clone() }
    }

    pub fn with_identity(&self, identity: impl Into<String>, kind: IdentityKind) -> Self {
        Self {
            raw_identity: identity.into(),
            identity_kind: kind,
            ..self.clone()
        }
    }
}
