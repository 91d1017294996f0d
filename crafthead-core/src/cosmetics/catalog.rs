// File: crafthead-core/src/cosmetics/catalog.rs

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crafthead_common::models::{
    CosmeticDefinition, CosmeticSlot, GradientDefinition, GradientSet, TextureEntry,
};
use crate::Error;

/// Namespace every catalog asset path lives under.
pub const ASSET_ROOT: &str = "Common/";
/// Directory (relative to the catalog root) holding the per-slot documents.
pub const CATALOG_SUBDIR: &str = "Cosmetics/CharacterCreator";
pub const GRADIENT_SETS_FILE: &str = "GradientSets.json";
/// Gradient set id reserved for parts that follow the avatar's skin tone.
pub const SKIN_GRADIENT_SET: &str = "Skin";

/// Prefix `path` with [`ASSET_ROOT`] unless it already carries it.
pub fn rooted(path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if trimmed.starts_with(ASSET_ROOT) {
        trimmed.to_string()
    } else {
        format!("{ASSET_ROOT}{trimmed}")
    }
}

/// Read-only cosmetic catalog: per-slot definitions plus gradient sets.
///
/// Built once and shared behind an `Arc`; nothing mutates it after
/// construction, so concurrent readers need no locking.
#[derive(Debug, Default)]
pub struct CosmeticCatalog {
    slots: HashMap<CosmeticSlot, HashMap<String, CosmeticDefinition>>,
    gradient_sets: HashMap<String, GradientSet>,
}

impl CosmeticCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load every slot document from `<dir>/Cosmetics/CharacterCreator/`.
    /// A missing document leaves its slot empty; a malformed one is an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self, Error> {
        let base = dir.join(CATALOG_SUBDIR);
        let mut catalog = Self::empty();

        for slot in CosmeticSlot::ALL {
            let path = base.join(slot.catalog_file());
            match std::fs::read(&path) {
                Ok(raw) => {
                    let defs: Vec<CosmeticDefinition> = serde_json::from_slice(&raw).map_err(|e| {
                        Error::Parse(format!("malformed catalog {}: {e}", path.display()))
                    })?;
                    catalog.insert_definitions(slot, defs);
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!("No catalog document for slot '{}' at {}", slot, path.display());
                }
                Err(e) => return Err(e.into()),
            }
        }

        let gradients_path = base.join(GRADIENT_SETS_FILE);
        match std::fs::read(&gradients_path) {
            Ok(raw) => {
                let sets: Vec<GradientSet> = serde_json::from_slice(&raw).map_err(|e| {
                    Error::Parse(format!("malformed gradient sets {}: {e}", gradients_path.display()))
                })?;
                catalog.insert_gradient_sets(sets);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No gradient sets at {}", gradients_path.display());
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            "Loaded cosmetic catalog: {} definitions, {} gradient sets",
            catalog.len(),
            catalog.gradient_sets.len()
        );
        Ok(catalog)
    }

    /// Build a catalog from in-memory JSON documents (same shape as the files).
    pub fn from_documents<'a>(
        slot_documents: impl IntoIterator<Item = (CosmeticSlot, &'a str)>,
        gradient_sets: Option<&str>,
    ) -> Result<Self, Error> {
        let mut catalog = Self::empty();
        for (slot, doc) in slot_documents {
            let defs: Vec<CosmeticDefinition> = serde_json::from_str(doc)?;
            catalog.insert_definitions(slot, defs);
        }
        if let Some(doc) = gradient_sets {
            let sets: Vec<GradientSet> = serde_json::from_str(doc)?;
            catalog.insert_gradient_sets(sets);
        }
        Ok(catalog)
    }

    fn insert_definitions(&mut self, slot: CosmeticSlot, defs: Vec<CosmeticDefinition>) {
        let entries = self.slots.entry(slot).or_default();
        for mut def in defs {
            root_definition(&mut def);
            entries.insert(def.id.clone(), def);
        }
    }

    fn insert_gradient_sets(&mut self, sets: Vec<GradientSet>) {
        for mut set in sets {
            for gradient in set.gradients.values_mut() {
                root_gradient(gradient);
            }
            self.gradient_sets.insert(set.id.clone(), set);
        }
    }

    pub fn definition(&self, slot: CosmeticSlot, id: &str) -> Option<&CosmeticDefinition> {
        self.slots.get(&slot)?.get(id)
    }

    pub fn gradient_set(&self, id: &str) -> Option<&GradientSet> {
        self.gradient_sets.get(id)
    }

    pub fn gradient(&self, set_id: &str, color: &str) -> Option<&GradientDefinition> {
        self.gradient_sets.get(set_id)?.gradients.get(color)
    }

    /// Known ids for a slot, sorted.
    pub fn ids(&self, slot: CosmeticSlot) -> Vec<&str> {
        let mut ids: Vec<&str> = self
            .slots
            .get(&slot)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();
        ids.sort_unstable();
        ids
    }

    /// Total number of definitions across slots.
    pub fn len(&self) -> usize {
        self.slots.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn root_opt(path: &mut Option<String>) {
    if let Some(p) = path.as_mut() {
        *p = rooted(p);
    }
}

fn root_table<'a>(table: impl Iterator<Item = &'a mut TextureEntry>) {
    for entry in table {
        entry.texture = rooted(&entry.texture);
    }
}

fn root_definition(def: &mut CosmeticDefinition) {
    root_opt(&mut def.model);
    root_opt(&mut def.greyscale_texture);
    if let Some(textures) = def.textures.as_mut() {
        root_table(textures.values_mut());
    }
    if let Some(variants) = def.variants.as_mut() {
        for variant in variants.values_mut() {
            root_opt(&mut variant.model);
            root_opt(&mut variant.greyscale_texture);
            if let Some(textures) = variant.textures.as_mut() {
                root_table(textures.values_mut());
            }
        }
    }
}

fn root_gradient(gradient: &mut GradientDefinition) {
    root_opt(&mut gradient.texture);
}
