// File: crafthead-common/src/models/render.rs

use crate::models::request::{SkinModel, View};

/// Input for the flat (legacy skin texture) renderer.
#[derive(Debug, Clone)]
pub struct SkinRenderJob {
    /// Skin texture PNG, or the cape texture for `View::Cape`.
    pub texture_png: Vec<u8>,
    pub view: View,
    pub size: u32,
    pub armored: bool,
    pub model: SkinModel,
}

/// Input for the 3D model renderer. `asset_paths` and `asset_bytes` are
/// parallel arrays.
#[derive(Debug, Clone)]
pub struct ModelRenderJob {
    pub model_json: String,
    pub animation_json: String,
    pub base_texture: Vec<u8>,
    pub resolved_skin_json: String,
    pub asset_paths: Vec<String>,
    pub asset_bytes: Vec<Vec<u8>>,
    pub view_type: String,
    pub size: u32,
}
