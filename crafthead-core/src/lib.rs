// src/lib.rs

pub mod config;
pub mod http;
pub mod identity;
pub mod profile;
pub mod textures;
pub mod cosmetics;
pub mod storage;
pub mod assets;
pub mod cache;
pub mod tasks;
pub mod render;
pub mod route;

pub use crafthead_common::error::Error;
pub use config::CraftheadConfig;
pub use http::{DefaultHttpClient, HttpClient};
pub use render::{RenderOrchestrator, RenderResponse};
