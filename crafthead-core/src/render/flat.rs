// File: crafthead-core/src/render/flat.rs

use async_trait::async_trait;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};

use crafthead_common::models::{SkinModel, SkinRenderJob, View};
use crafthead_common::traits::SkinRenderer;
use crate::render::encode_png;
use crate::Error;

/// Texture regions as (x, y, w, h).
type Rect = (u32, u32, u32, u32);

const HEAD: Rect = (8, 8, 8, 8);
const HEAD_OVERLAY: Rect = (40, 8, 8, 8);
const TORSO: Rect = (20, 20, 8, 12);
const TORSO_OVERLAY: Rect = (20, 36, 8, 12);
const RIGHT_LEG: Rect = (4, 20, 4, 12);
const RIGHT_LEG_OVERLAY: Rect = (4, 36, 4, 12);
const LEFT_LEG: Rect = (20, 52, 4, 12);
const LEFT_LEG_OVERLAY: Rect = (4, 52, 4, 12);
const CAPE_FRONT: Rect = (1, 1, 10, 16);

const HEAD_TOP: Rect = (8, 0, 8, 8);
const HEAD_RIGHT: Rect = (0, 8, 8, 8);
const HEAD_TOP_OVERLAY: Rect = (40, 0, 8, 8);
const HEAD_RIGHT_OVERLAY: Rect = (32, 8, 8, 8);

const SKEW_A: f32 = 26.0 / 45.0;
const SKEW_B: f32 = SKEW_A * 2.0;

fn right_arm(slim: bool, overlay: bool) -> Rect {
    let w = if slim { 3 } else { 4 };
    if overlay { (44, 36, w, 12) } else { (44, 20, w, 12) }
}

fn left_arm(slim: bool, overlay: bool) -> Rect {
    let w = if slim { 3 } else { 4 };
    if overlay { (52, 52, w, 12) } else { (36, 52, w, 12) }
}

fn crop(src: &RgbaImage, (x, y, w, h): Rect) -> Result<RgbaImage, Error> {
    if x + w > src.width() || y + h > src.height() {
        return Err(Error::RenderEngineFailure(format!(
            "texture {}x{} too small for region {x},{y} {w}x{h}",
            src.width(),
            src.height()
        )));
    }
    Ok(imageops::crop_imm(src, x, y, w, h).to_image())
}

/// An overlay region with no pixel below half alpha is treated as entirely
/// transparent, matching how the game client reads old skins.
fn apply_overlay_transparency(layer: &mut RgbaImage) {
    if layer.pixels().any(|p| p[3] < 128) {
        return;
    }
    for p in layer.pixels_mut() {
        p[3] = 0;
    }
}

/// Copies every non-transparent `top` pixel onto `bottom` at full opacity.
fn fast_overlay(bottom: &mut RgbaImage, top: &RgbaImage) {
    let (w, h) = (bottom.width().min(top.width()), bottom.height().min(top.height()));
    for y in 0..h {
        for x in 0..w {
            let mut p = *top.get_pixel(x, y);
            if p[3] != 0 {
                p[3] = 0xFF;
                bottom.put_pixel(x, y, p);
            }
        }
    }
}

/// `base` with its overlay region layered on top.
fn layered(texture: &RgbaImage, base: Rect, over: Rect) -> Result<RgbaImage, Error> {
    let mut part = crop(texture, base)?;
    let mut top = crop(texture, over)?;
    apply_overlay_transparency(&mut top);
    fast_overlay(&mut part, &top);
    Ok(part)
}

/// Built-in renderer for legacy skin textures: the flat views plus the
/// isometric `cube` head. `skin` and `profile` are never rendered here.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatSkinRenderer;

impl FlatSkinRenderer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SkinRenderer for FlatSkinRenderer {
    async fn render_skin(&self, job: SkinRenderJob) -> Result<Vec<u8>, Error> {
        tokio::task::spawn_blocking(move || render_blocking(&job))
            .await
            .map_err(|e| Error::RenderEngineFailure(format!("render task panicked: {e}")))?
    }
}

fn render_blocking(job: &SkinRenderJob) -> Result<Vec<u8>, Error> {
    let texture = image::load_from_memory(&job.texture_png)?.to_rgba8();
    let (w, h) = job.view.dimensions(job.size);

    let flat = match job.view {
        View::Avatar => crop(&texture, HEAD)?,
        View::Helm => layered(&texture, HEAD, HEAD_OVERLAY)?,
        View::Body => compose_body(&texture, job.model, job.armored)?,
        View::Bust => {
            let body = compose_body(&texture, job.model, job.armored)?;
            imageops::crop_imm(&body, 0, 0, 16, 16).to_image()
        }
        View::Cape => crop(&texture, CAPE_FRONT)?,
        View::Cube => return encode_png(&render_cube(&texture, job.size, job.armored)?),
        View::Skin | View::Profile => {
            return Err(Error::RenderEngineFailure(format!(
                "view '{}' has no flat rendering",
                job.view
            )));
        }
    };

    encode_png(&imageops::resize(&flat, w, h, FilterType::Nearest))
}

/// Front view of the whole player on a 16x32 canvas.
fn compose_body(texture: &RgbaImage, model: SkinModel, with_overlay: bool) -> Result<RgbaImage, Error> {
    if texture.width() != 64 || (texture.height() != 64 && texture.height() != 32) {
        return Err(Error::RenderEngineFailure(format!(
            "unsupported skin size {}x{}",
            texture.width(),
            texture.height()
        )));
    }
    let legacy = texture.height() == 32;
    let slim = model == SkinModel::Slim;
    // 64x32 skins have no overlays below the head.
    let overlay = with_overlay && !legacy;
    let arm_w = if slim { 3 } else { 4 };

    let mut canvas = RgbaImage::new(16, 32);

    let head = if with_overlay {
        layered(texture, HEAD, HEAD_OVERLAY)?
    } else {
        crop(texture, HEAD)?
    };
    imageops::overlay(&mut canvas, &head, 4, 0);

    let parts: [(Rect, Option<Rect>, i64, i64, bool); 5] = [
        (TORSO, Some(TORSO_OVERLAY), 4, 8, false),
        (right_arm(slim, false), Some(right_arm(slim, true)), 4 - arm_w as i64, 8, false),
        (RIGHT_LEG, Some(RIGHT_LEG_OVERLAY), 4, 20, false),
        // Legacy skins reuse the right limbs, mirrored.
        if legacy {
            (right_arm(slim, false), None, 12, 8, true)
        } else {
            (left_arm(slim, false), Some(left_arm(slim, true)), 12, 8, false)
        },
        if legacy {
            (RIGHT_LEG, None, 8, 20, true)
        } else {
            (LEFT_LEG, Some(LEFT_LEG_OVERLAY), 8, 20, false)
        },
    ];

    for (base, over, x, y, mirror) in parts {
        let mut part = match over {
            Some(over) if overlay => layered(texture, base, over)?,
            _ => crop(texture, base)?,
        };
        if mirror {
            part = imageops::flip_horizontal(&part);
        }
        imageops::overlay(&mut canvas, &part, x, y);
    }
    Ok(canvas)
}

fn skew(matrix: [f32; 9]) -> Result<Projection, Error> {
    Projection::from_matrix(matrix)
        .ok_or_else(|| Error::RenderEngineFailure("singular head projection".into()))
}

/// Isometric head: top, front and right faces sheared onto a size x size
/// canvas, the right face darkened for depth.
fn render_cube(texture: &RgbaImage, size: u32, armored: bool) -> Result<RgbaImage, Error> {
    let scale = size as f32 / 20.0;
    let x_render = scale.ceil() as i64;
    let z_render = x_render / 2;
    let z_offset = scale * 3.0;
    let x_offset = scale * 2.0;

    let top = skew([1.0, 1.0, 0.0, -SKEW_A, SKEW_A, 0.0, 0.0, 0.0, 1.0])?
        * Projection::translate(-0.5 - z_offset, x_offset + z_offset - 0.5)
        * Projection::scale(scale, scale + 1.0 / 8.0);
    let front = skew([1.0, 0.0, 0.0, -SKEW_A, SKEW_B, SKEW_A, 0.0, 0.0, 1.0])?
        * Projection::translate(x_offset + 7.5 * scale - 0.5, x_offset + 8.0 * scale + z_offset - 0.5)
        * Projection::scale(scale, scale);
    let right = skew([1.0, 0.0, 0.0, SKEW_A, SKEW_B, 0.0, 0.0, 0.0, 1.0])?
        * Projection::translate(x_offset - scale / 2.0, z_offset + scale)
        * Projection::scale(scale + 0.5 / 8.0, scale + 1.0 / 8.0);

    let mut faces = vec![
        (crop(texture, HEAD_TOP)?, top),
        (crop(texture, HEAD)?, front),
        (imageops::colorops::brighten(&crop(texture, HEAD_RIGHT)?, -4), right),
    ];
    if armored {
        faces.push((crop(texture, HEAD_TOP_OVERLAY)?, top));
        faces.push((crop(texture, HEAD_OVERLAY)?, front));
        faces.push((imageops::colorops::brighten(&crop(texture, HEAD_RIGHT_OVERLAY)?, -4), right));
    }

    // warp_into clears everything outside the warped face, so each face is
    // drawn to scratch first and then overlaid.
    let mut render = RgbaImage::new(size, size);
    let mut scratch = RgbaImage::new(size, size);
    for (face, projection) in &faces {
        warp_into(face, projection, Interpolation::Nearest, Rgba([0, 0, 0, 0]), &mut scratch);
        imageops::overlay(&mut render, &scratch, x_render, z_render);
    }
    Ok(render)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skin(h: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(64, h, |x, y| Rgba([x as u8 * 4, y as u8 * 4, 128, 255]));
        encode_png(&img).unwrap()
    }

    fn job(view: View, size: u32, h: u32) -> SkinRenderJob {
        SkinRenderJob {
            texture_png: skin(h),
            view,
            size,
            armored: false,
            model: SkinModel::Regular,
        }
    }

    #[tokio::test]
    async fn test_view_dimensions() {
        let r = FlatSkinRenderer::new();
        for (view, size, expect) in [
            (View::Avatar, 180, (180, 180)),
            (View::Helm, 8, (8, 8)),
            (View::Body, 100, (100, 200)),
            (View::Bust, 64, (64, 64)),
            (View::Cape, 40, (40, 40)),
        ] {
            let png = r.render_skin(job(view, size, 64)).await.unwrap();
            let img = image::load_from_memory(&png).unwrap();
            assert_eq!((img.width(), img.height()), expect, "view {view}");
        }
    }

    #[tokio::test]
    async fn test_legacy_skin_body() {
        let png = FlatSkinRenderer.render_skin(job(View::Body, 32, 32)).await.unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (32, 64));
    }

    #[tokio::test]
    async fn test_cube_renders_isometric_head() {
        for armored in [false, true] {
            let mut j = job(View::Cube, 64, 64);
            j.armored = armored;
            let png = FlatSkinRenderer.render_skin(j).await.unwrap();
            let img = image::load_from_memory(&png).unwrap().to_rgba8();
            assert_eq!(img.dimensions(), (64, 64));
            assert!(img.pixels().any(|p| p[3] != 0));
            // Corners lie outside the sheared faces.
            assert_eq!(img.get_pixel(0, 63)[3], 0);
        }
    }

    #[tokio::test]
    async fn test_opaque_hat_layer_is_ignored() {
        let face = Rgba([200, 150, 100, 255]);
        let mut img = RgbaImage::new(64, 32);
        for y in 8..16 {
            for x in 8..16 {
                img.put_pixel(x, y, face);
            }
            for x in 40..48 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        let mut j = job(View::Helm, 8, 32);
        j.texture_png = encode_png(&img).unwrap();
        let png = FlatSkinRenderer.render_skin(j).await.unwrap();
        let out = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(*out.get_pixel(0, 0), face);
    }

    #[test]
    fn test_translucent_overlay_pixels_become_opaque() {
        let mut bottom = RgbaImage::from_pixel(2, 1, Rgba([1, 2, 3, 255]));
        let mut top = RgbaImage::new(2, 1);
        top.put_pixel(0, 0, Rgba([9, 9, 9, 40]));
        apply_overlay_transparency(&mut top);
        fast_overlay(&mut bottom, &top);
        assert_eq!(*bottom.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
        assert_eq!(*bottom.get_pixel(1, 0), Rgba([1, 2, 3, 255]));
    }

    #[tokio::test]
    async fn test_garbage_texture_is_recoverable() {
        let mut j = job(View::Avatar, 64, 64);
        j.texture_png = b"not a png".to_vec();
        let err = FlatSkinRenderer.render_skin(j).await.unwrap_err();
        assert!(err.is_recoverable());
    }
}
