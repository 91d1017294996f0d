// File: crafthead-common/src/traits/mod.rs
pub mod storage;
pub mod provider;
pub mod render;

pub use storage::{Blob, BlobStore};
pub use provider::ProfileProvider;
pub use render::{SkinRenderer, ModelRenderer};
