// File: crafthead-core/tests/test_utils/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dashmap::DashMap;
use image::{Rgba, RgbaImage};

use crafthead_common::models::{CosmeticSlot, Game, ModelRenderJob, Profile, ProfileProperty, StructuredSkin};
use crafthead_common::traits::{ModelRenderer, ProfileProvider};
use crafthead_core::cosmetics::CosmeticCatalog;
use crafthead_core::http::{HttpClient, HttpResponse};
use crafthead_core::render::encode_png;
use crafthead_core::Error;

pub const TEXTURE_BASE: &str = "http://textures.test";
pub const JIMBO_ID: &str = "ef6134805b6244e4a4467fbe85d65513";
/// 63 characters; the 64-character form has one leading zero.
pub const JIMBO_TEXTURE: &str = "67f7105bcbc2c1ab0c5bbd6c6d5fce6ba26f4e7c3a8f1df6f2bbd0e5b8c3c05";

/// Profile provider backed by a map; counts upstream calls.
#[derive(Default)]
pub struct FakeProfileProvider {
    pub profiles: DashMap<String, Profile>,
    pub calls: AtomicUsize,
    pub delay: Option<Duration>,
}

impl FakeProfileProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Register a profile under both its id and its lowercase name.
    pub fn with_profile(self, profile: Profile) -> Self {
        self.profiles.insert(profile.name.to_lowercase(), profile.clone());
        self.profiles.insert(profile.id.clone(), profile);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileProvider for FakeProfileProvider {
    async fn fetch_profile(&self, _game: Game, key: &str) -> Result<Option<Profile>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        Ok(self.profiles.get(&key.to_lowercase()).map(|p| p.clone()))
    }
}

/// HTTP client that serves fixed bodies by URL and 404s everything else.
#[derive(Default)]
pub struct FakeHttp {
    pub routes: DashMap<String, HttpResponse>,
    pub hits: DashMap<String, usize>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.routes.insert(url.into(), HttpResponse { status: 200, body });
        self
    }

    pub fn hits(&self, url: &str) -> usize {
        self.hits.get(url).map(|h| *h).unwrap_or(0)
    }
}

#[async_trait]
impl HttpClient for FakeHttp {
    async fn get(&self, url: &str, _headers: HashMap<String, String>) -> Result<HttpResponse, Error> {
        *self.hits.entry(url.to_string()).or_insert(0) += 1;
        Ok(self
            .routes
            .get(url)
            .map(|r| r.clone())
            .unwrap_or(HttpResponse { status: 404, body: Vec::new() }))
    }
}

/// Model renderer that returns a solid PNG of the requested size, or fails.
#[derive(Default)]
pub struct FakeModelRenderer {
    pub calls: AtomicUsize,
    pub fail: bool,
    pub jobs: std::sync::Mutex<Vec<ModelRenderJob>>,
}

impl FakeModelRenderer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_job(&self) -> Option<ModelRenderJob> {
        self.jobs.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ModelRenderer for FakeModelRenderer {
    async fn render_model(&self, job: ModelRenderJob) -> Result<Vec<u8>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let size = job.size;
        self.jobs.lock().unwrap().push(job);
        if self.fail {
            return Err(Error::Parse("engine exploded".into()));
        }
        encode_png(&RgbaImage::from_pixel(size, size, Rgba([10, 200, 30, 255])))
    }
}

/// A 64x64 skin with a distinct colour per pixel.
pub fn skin_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, 77, 255]));
    encode_png(&img).unwrap()
}

pub fn textures_property(skin_url: &str, slim: bool) -> ProfileProperty {
    let metadata = if slim { r#","metadata":{"model":"slim"}"# } else { "" };
    let json = format!(r#"{{"textures":{{"SKIN":{{"url":"{skin_url}"{metadata}}}}}}}"#);
    ProfileProperty {
        name: "textures".into(),
        value: STANDARD.encode(json),
        signature: None,
    }
}

pub fn jimbo() -> Profile {
    Profile {
        id: JIMBO_ID.into(),
        name: "CherryJimbo".into(),
        properties: vec![textures_property(&format!("{TEXTURE_BASE}/texture/{JIMBO_TEXTURE}"), false)],
        skin: None,
    }
}

pub fn hytale_player(id: &str, name: &str, skin: StructuredSkin) -> Profile {
    Profile {
        id: id.into(),
        name: name.into(),
        properties: vec![],
        skin: Some(skin),
    }
}

pub fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    let img = image::load_from_memory(bytes).unwrap();
    (img.width(), img.height())
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}

const BODY: &str = r#"[
    {"Id":"Default","Model":"Characters/Body.blockymodel","GreyscaleTexture":"Characters/Body_Greyscale.png","GradientSet":"Skin"},
    {"Id":"Alien","Model":"Characters/Body.blockymodel","GreyscaleTexture":"Characters/Alien_Greyscale.png","GradientSet":"Alien"}
]"#;
const EARS: &str = r#"[
    {"Id":"Elf","Model":"Ears/Elf.blockymodel","GreyscaleTexture":"Characters/Body_Greyscale.png","GradientSet":"Skin"}
]"#;
const HAIRCUTS: &str = r##"[
    {"Id":"Bob","Model":"Hair/Bob.blockymodel","GreyscaleTexture":"Hair/Bob_Greyscale.png","GradientSet":"Hair",
     "Variants":{"Long":{"Model":"Hair/BobLong.blockymodel"},
                 "Braided":{"Textures":{"Blonde":{"Texture":"Hair/BobBraided_Blonde.png","BaseColor":["#f0e68c"]}}}}}
]"##;
const SKIN_FEATURES: &str = r#"[
    {"Id":"Scales","GreyscaleTexture":"Features/Scales.png","GradientSet":"Alien"}
]"#;
const CAPES: &str = r##"[
    {"Id":"Royal","Model":"Capes/Royal.blockymodel","GradientSet":"Fabric",
     "Textures":{"Black":{"Texture":"Capes/Royal_Black.png","BaseColor":["#000000"]},
                 "Gold":{"Texture":"Capes/Royal_Gold.png","BaseColor":["#ffd700"]}}}
]"##;
const OVERTOPS: &str = r#"[
    {"Id":"Tunic","Model":"Tops/Tunic.blockymodel","GreyscaleTexture":"Tops/Tunic.png","GradientSet":"Fabric"}
]"#;
const GRADIENTS: &str = r##"[
    {"Id":"Skin","Gradients":{"10":{"BaseColor":["#e0ac69"],"Texture":"TintGradients/Skin/10.png"},
                              "Pale":{"BaseColor":["#fbe7d5"]}}},
    {"Id":"Alien","Gradients":{"Green":{"BaseColor":["#00ff00"],"Texture":"TintGradients/Alien/Green.png"}}},
    {"Id":"Hair","Gradients":{"Red":{"BaseColor":["#aa2200"],"Texture":"TintGradients/Hair/Red.png"}}},
    {"Id":"Fabric","Gradients":{"Black":{"BaseColor":["#111111"],"Texture":"TintGradients/Fabric/Black.png"}}}
]"##;

/// Small catalog covering plain, variant, pre-coloured and skin-toned entries.
pub fn sample_catalog() -> Arc<CosmeticCatalog> {
    let catalog = CosmeticCatalog::from_documents(
        [
            (CosmeticSlot::BodyCharacteristic, BODY),
            (CosmeticSlot::Ears, EARS),
            (CosmeticSlot::Haircut, HAIRCUTS),
            (CosmeticSlot::SkinFeature, SKIN_FEATURES),
            (CosmeticSlot::Cape, CAPES),
            (CosmeticSlot::Overtop, OVERTOPS),
        ],
        Some(GRADIENTS),
    )
    .unwrap();
    Arc::new(catalog)
}

/// A skin that resolves to a body, ears, a haircut and a tunic.
pub fn sample_skin() -> StructuredSkin {
    StructuredSkin::new()
        .with(CosmeticSlot::BodyCharacteristic, "Default.10")
        .with(CosmeticSlot::Ears, "Elf")
        .with(CosmeticSlot::Haircut, "Bob.Red")
        .with(CosmeticSlot::Overtop, "Tunic.Black")
}
