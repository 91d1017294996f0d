// crafthead-core/src/storage/mod.rs

pub mod memory;
pub mod fs;

pub use memory::MemoryBlobStore;
pub use fs::FsBlobStore;
pub use crafthead_common::traits::{Blob, BlobStore};
