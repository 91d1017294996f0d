// File: crafthead-common/src/models/skin.rs

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};

/// Appearance categories of a structured (texture-capable game) skin. The
/// declaration order is the canonical slot order used for resolution output
/// and for cache-key serialization.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "camelCase")]
pub enum CosmeticSlot {
    /// Skin tone / body characteristic.
    BodyCharacteristic,
    Underwear,
    Face,
    Eyes,
    Ears,
    Eyebrows,
    Mouth,
    Haircut,
    FacialHair,
    Pants,
    Overpants,
    Undertop,
    Overtop,
    Shoes,
    HeadAccessory,
    FaceAccessory,
    EarAccessory,
    SkinFeature,
    Gloves,
    Cape,
}

impl CosmeticSlot {
    pub const ALL: [CosmeticSlot; 20] = [
        CosmeticSlot::BodyCharacteristic,
        CosmeticSlot::Underwear,
        CosmeticSlot::Face,
        CosmeticSlot::Eyes,
        CosmeticSlot::Ears,
        CosmeticSlot::Eyebrows,
        CosmeticSlot::Mouth,
        CosmeticSlot::Haircut,
        CosmeticSlot::FacialHair,
        CosmeticSlot::Pants,
        CosmeticSlot::Overpants,
        CosmeticSlot::Undertop,
        CosmeticSlot::Overtop,
        CosmeticSlot::Shoes,
        CosmeticSlot::HeadAccessory,
        CosmeticSlot::FaceAccessory,
        CosmeticSlot::EarAccessory,
        CosmeticSlot::SkinFeature,
        CosmeticSlot::Gloves,
        CosmeticSlot::Cape,
    ];

    /// The slot that carries the avatar's skin tone.
    pub const SKIN_TONE: CosmeticSlot = CosmeticSlot::BodyCharacteristic;

    /// Key used in structured skin documents.
    pub fn key(self) -> &'static str {
        match self {
            CosmeticSlot::BodyCharacteristic => "bodyCharacteristic",
            CosmeticSlot::Underwear => "underwear",
            CosmeticSlot::Face => "face",
            CosmeticSlot::Eyes => "eyes",
            CosmeticSlot::Ears => "ears",
            CosmeticSlot::Eyebrows => "eyebrows",
            CosmeticSlot::Mouth => "mouth",
            CosmeticSlot::Haircut => "haircut",
            CosmeticSlot::FacialHair => "facialHair",
            CosmeticSlot::Pants => "pants",
            CosmeticSlot::Overpants => "overpants",
            CosmeticSlot::Undertop => "undertop",
            CosmeticSlot::Overtop => "overtop",
            CosmeticSlot::Shoes => "shoes",
            CosmeticSlot::HeadAccessory => "headAccessory",
            CosmeticSlot::FaceAccessory => "faceAccessory",
            CosmeticSlot::EarAccessory => "earAccessory",
            CosmeticSlot::SkinFeature => "skinFeature",
            CosmeticSlot::Gloves => "gloves",
            CosmeticSlot::Cape => "cape",
        }
    }

    pub fn from_key(key: &str) -> Option<CosmeticSlot> {
        CosmeticSlot::ALL.into_iter().find(|slot| slot.key() == key)
    }

    /// Catalog document holding this slot's definitions.
    pub fn catalog_file(self) -> &'static str {
        match self {
            CosmeticSlot::BodyCharacteristic => "BodyCharacteristics.json",
            CosmeticSlot::Underwear => "Underwear.json",
            CosmeticSlot::Face => "Faces.json",
            CosmeticSlot::Eyes => "Eyes.json",
            CosmeticSlot::Ears => "Ears.json",
            CosmeticSlot::Eyebrows => "Eyebrows.json",
            CosmeticSlot::Mouth => "Mouths.json",
            CosmeticSlot::Haircut => "Haircuts.json",
            CosmeticSlot::FacialHair => "FacialHair.json",
            CosmeticSlot::Pants => "Pants.json",
            CosmeticSlot::Overpants => "Overpants.json",
            CosmeticSlot::Undertop => "Undertops.json",
            CosmeticSlot::Overtop => "Overtops.json",
            CosmeticSlot::Shoes => "Shoes.json",
            CosmeticSlot::HeadAccessory => "HeadAccessory.json",
            CosmeticSlot::FaceAccessory => "FaceAccessory.json",
            CosmeticSlot::EarAccessory => "EarAccessory.json",
            CosmeticSlot::SkinFeature => "SkinFeatures.json",
            CosmeticSlot::Gloves => "Gloves.json",
            CosmeticSlot::Cape => "Capes.json",
        }
    }
}

impl fmt::Display for CosmeticSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Slot name -> raw slot value (`id[.color][.variant...]`). Absent slots are
/// simply not present; unknown keys and non-string values are dropped on parse.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct StructuredSkin {
    slots: BTreeMap<CosmeticSlot, String>,
}

impl StructuredSkin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: CosmeticSlot, value: impl Into<String>) -> Self {
        self.slots.insert(slot, value.into());
        self
    }

    pub fn get(&self, slot: CosmeticSlot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CosmeticSlot, &str)> {
        self.slots.iter().map(|(slot, v)| (*slot, v.as_str()))
    }
}

impl<'de> Deserialize<'de> for StructuredSkin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
        let slots = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((CosmeticSlot::from_key(&key)?, s)),
                _ => None,
            })
            .collect();
        Ok(Self { slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_nulls_and_unknown_keys() {
        let json = r#"{
            "bodyCharacteristic": "Default.10",
            "haircut": "WavyShort.BrownDark",
            "facialHair": null,
            "somethingNew": "Whatever"
        }"#;
        let skin: StructuredSkin = serde_json::from_str(json).unwrap();
        assert_eq!(skin.get(CosmeticSlot::BodyCharacteristic), Some("Default.10"));
        assert_eq!(skin.get(CosmeticSlot::Haircut), Some("WavyShort.BrownDark"));
        assert_eq!(skin.get(CosmeticSlot::FacialHair), None);
        assert_eq!(skin.iter().count(), 2);
    }

    #[test]
    fn test_parse_tolerates_non_string_fields() {
        let json = r#"{"haircut":"Bob.Red","bodyType":1,"version":2,"eyes":{"id":"x"}}"#;
        let skin: StructuredSkin = serde_json::from_str(json).unwrap();
        assert_eq!(skin.get(CosmeticSlot::Haircut), Some("Bob.Red"));
        assert_eq!(skin.get(CosmeticSlot::Eyes), None);
        assert_eq!(skin.iter().count(), 1);
    }

    #[test]
    fn test_serialization_is_canonical() {
        let a = StructuredSkin::new()
            .with(CosmeticSlot::Cape, "Cape_Royal.Black")
            .with(CosmeticSlot::Eyes, "Plain_Eyes.Turquoise");
        let b = StructuredSkin::new()
            .with(CosmeticSlot::Eyes, "Plain_Eyes.Turquoise")
            .with(CosmeticSlot::Cape, "Cape_Royal.Black");
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn test_slot_keys_round_trip() {
        for slot in CosmeticSlot::ALL {
            assert_eq!(CosmeticSlot::from_key(slot.key()), Some(slot));
        }
    }
}
