//! src/render/mod.rs
//!
//! Rendering side of the pipeline: the orchestrator, the built-in flat skin
//! renderer and the text-initial fallback avatar.

pub mod flat;
pub mod orchestrator;
pub mod text_avatar;

use std::io::Cursor;
use image::{DynamicImage, ImageFormat, RgbaImage};
use crate::Error;

pub use flat::FlatSkinRenderer;
pub use orchestrator::{RenderBody, RenderOrchestrator, RenderResponse};
pub use text_avatar::render_text_avatar;

/// Encode an RGBA buffer as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, Error> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone()).write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
