use async_trait::async_trait;
use crate::error::Error;
use crate::models::{ModelRenderJob, SkinRenderJob};

/// Renders legacy flat skin textures. Returns PNG bytes.
#[async_trait]
pub trait SkinRenderer: Send + Sync {
    async fn render_skin(&self, job: SkinRenderJob) -> Result<Vec<u8>, Error>;
}

/// Renders a resolved structured skin through the 3D engine. Returns PNG bytes.
#[async_trait]
pub trait ModelRenderer: Send + Sync {
    async fn render_model(&self, job: ModelRenderJob) -> Result<Vec<u8>, Error>;
}
