//! src/cosmetics/mod.rs
//!
//! Structured-skin expansion. The catalog is loaded once and handed to the
//! resolver explicitly; resolution itself does no I/O.

pub mod catalog;
pub mod resolver;

pub use catalog::{rooted, CosmeticCatalog, ASSET_ROOT, SKIN_GRADIENT_SET};
pub use resolver::{dependencies, parse_slot_value, CosmeticResolver, SlotValue};
