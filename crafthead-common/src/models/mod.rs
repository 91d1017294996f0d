// File: crafthead-common/src/models/mod.rs
pub mod request;
pub mod profile;
pub mod skin;
pub mod cosmetic;
pub mod render;

pub use request::{Game, View, IdentityKind, SkinModel, RequestDescriptor, clamp_size, DEFAULT_SIZE, MAX_SIZE, MIN_SIZE};
pub use profile::{Profile, ProfileProperty, TexturesPayload, TextureRef};
pub use skin::{CosmeticSlot, StructuredSkin};
pub use cosmetic::{
    CosmeticDefinition, CosmeticVariant, TextureEntry, GradientDefinition, GradientSet,
    ResolvedCosmetic, ResolvedSkin,
};
pub use render::{SkinRenderJob, ModelRenderJob};
