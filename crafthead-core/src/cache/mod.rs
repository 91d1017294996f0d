// crafthead-core/src/cache/mod.rs

pub mod render_cache;

pub use render_cache::{RenderCache, RenderCacheKey, CREATED_AT_KEY};
