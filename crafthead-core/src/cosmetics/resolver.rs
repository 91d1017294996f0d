// File: crafthead-core/src/cosmetics/resolver.rs

use std::sync::Arc;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crafthead_common::models::{
    CosmeticDefinition, CosmeticSlot, ResolvedCosmetic, ResolvedSkin, StructuredSkin, TextureEntry,
};
use crate::cosmetics::catalog::{CosmeticCatalog, SKIN_GRADIENT_SET};

/// A raw slot value split into `id[.color][.variant]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotValue {
    pub id: String,
    pub color: Option<String>,
    /// Everything after the colour, dots preserved.
    pub variant: Option<String>,
}

/// Parse `id[.color][.variant...]`. Returns `None` for an empty or `null` id.
pub fn parse_slot_value(raw: &str) -> Option<SlotValue> {
    let mut parts = raw.splitn(3, '.');
    let id = parts.next().unwrap_or_default().trim();
    if id.is_empty() || id == "null" {
        return None;
    }
    let color = parts.next().filter(|c| !c.is_empty()).map(str::to_string);
    let variant = parts.next().filter(|v| !v.is_empty()).map(str::to_string);
    Some(SlotValue {
        id: id.to_string(),
        color,
        variant,
    })
}

/// Expands structured skins against a shared, read-only catalog. Resolution
/// is pure: same skin + same catalog always yields the same output.
#[derive(Clone)]
pub struct CosmeticResolver {
    catalog: Arc<CosmeticCatalog>,
}

impl CosmeticResolver {
    pub fn new(catalog: Arc<CosmeticCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &CosmeticCatalog {
        &self.catalog
    }

    pub fn resolve(&self, skin: &StructuredSkin) -> ResolvedSkin {
        let mut cosmetics = Vec::new();
        let mut skin_tone = None;

        for slot in CosmeticSlot::ALL {
            let Some(raw) = skin.get(slot) else { continue };
            let Some(resolved) = self.resolve_slot(slot, raw) else {
                debug!("Dropping unresolvable {} value '{}'", slot, raw);
                continue;
            };
            if slot == CosmeticSlot::SKIN_TONE {
                skin_tone = Some(resolved);
            } else {
                cosmetics.push(resolved);
            }
        }

        apply_skin_tone(&mut cosmetics, skin_tone.as_ref());
        ResolvedSkin { cosmetics, skin_tone }
    }

    /// Resolve one slot value, or `None` when the id is not in the catalog.
    pub fn resolve_slot(&self, slot: CosmeticSlot, raw: &str) -> Option<ResolvedCosmetic> {
        let value = parse_slot_value(raw)?;
        let def = self.catalog.definition(slot, &value.id)?;

        let mut out = ResolvedCosmetic {
            slot,
            id: value.id.clone(),
            model_path: None,
            texture_path: None,
            gradient_set_id: def.gradient_set.clone(),
            color_id: value.color.clone(),
            gradient_texture_path: None,
            base_color: None,
            variant: None,
        };

        let matched_variant = value
            .variant
            .as_deref()
            .and_then(|key| def.variant(key).map(|v| (key, v)));

        let pre_coloured = match matched_variant {
            Some((key, variant)) => {
                out.variant = Some(key.to_string());
                out.model_path = variant.model.clone().or_else(|| def.model.clone());
                match variant.texture_table() {
                    Some(table) => {
                        apply_texture_entry(&mut out, table, value.color.as_deref());
                        true
                    }
                    None => {
                        out.texture_path = variant
                            .greyscale_texture
                            .clone()
                            .or_else(|| def.greyscale_texture.clone());
                        out.base_color = variant.base_color.clone();
                        false
                    }
                }
            }
            None => match def.texture_table() {
                Some(table) => {
                    out.model_path = def.model.clone();
                    apply_texture_entry(&mut out, table, value.color.as_deref());
                    true
                }
                None => {
                    apply_base(&mut out, def);
                    false
                }
            },
        };

        // Pre-coloured textures are never tinted.
        if !pre_coloured {
            if let (Some(set), Some(color)) = (def.gradient_set.as_deref(), value.color.as_deref()) {
                if let Some(gradient) = self.catalog.gradient(set, color) {
                    if gradient.base_color.is_some() {
                        out.base_color = gradient.base_color.clone();
                    }
                    if let Some(texture) = &gradient.texture {
                        out.gradient_texture_path = Some(texture.clone());
                    }
                }
            }
        }

        Some(out)
    }
}

fn apply_base(out: &mut ResolvedCosmetic, def: &CosmeticDefinition) {
    out.model_path = def.model.clone();
    out.texture_path = def.greyscale_texture.clone();
}

/// Pick the entry for `color`, else the first declared entry.
fn apply_texture_entry(out: &mut ResolvedCosmetic, table: &IndexMap<String, TextureEntry>, color: Option<&str>) {
    let picked = color
        .and_then(|c| table.get_key_value(c))
        .or_else(|| table.first());
    if let Some((key, entry)) = picked {
        out.texture_path = Some(entry.texture.clone());
        out.base_color = entry.base_color.clone();
        out.color_id = Some(key.clone());
    }
}

/// Parts sharing the skin tone's palette inherit its tint. Runs once over a
/// snapshot taken after every slot resolved, so inherited values never chain.
fn apply_skin_tone(cosmetics: &mut [ResolvedCosmetic], skin_tone: Option<&ResolvedCosmetic>) {
    let Some(tone) = skin_tone else { return };
    if tone.gradient_texture_path.is_none() && tone.base_color.is_none() {
        return;
    }

    let targets: Vec<usize> = cosmetics
        .iter()
        .enumerate()
        .filter(|(_, c)| c.gradient_texture_path.is_none())
        .filter(|(_, c)| match c.gradient_set_id.as_deref() {
            Some(SKIN_GRADIENT_SET) => true,
            Some(set) => tone.gradient_set_id.as_deref() == Some(set),
            None => false,
        })
        .map(|(i, _)| i)
        .collect();

    for i in targets {
        let c = &mut cosmetics[i];
        c.gradient_texture_path = tone.gradient_texture_path.clone();
        c.base_color = tone.base_color.clone();
        c.color_id = tone.color_id.clone();
    }
}

/// The minimal, de-duplicated set of asset paths a render of `skin` needs, in
/// first-seen order (cosmetics first, then the skin tone).
pub fn dependencies(skin: &ResolvedSkin) -> Vec<String> {
    let mut paths: IndexSet<String> = IndexSet::new();
    for c in skin.cosmetics.iter().chain(skin.skin_tone.iter()) {
        for p in [&c.model_path, &c.texture_path, &c.gradient_texture_path]
            .into_iter()
            .flatten()
        {
            paths.insert(p.clone());
        }
    }
    paths.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_value_shapes() {
        assert_eq!(
            parse_slot_value("Bob"),
            Some(SlotValue { id: "Bob".into(), color: None, variant: None })
        );
        assert_eq!(
            parse_slot_value("Bob.Red"),
            Some(SlotValue { id: "Bob".into(), color: Some("Red".into()), variant: None })
        );
        assert_eq!(
            parse_slot_value("Bob.Red.Long.Curly"),
            Some(SlotValue {
                id: "Bob".into(),
                color: Some("Red".into()),
                variant: Some("Long.Curly".into()),
            })
        );
        assert_eq!(parse_slot_value(""), None);
        assert_eq!(parse_slot_value("null"), None);
        assert_eq!(parse_slot_value(".Red"), None);
    }
}
