//! Sticker catalog and placements.
//!
//! The catalog is a read-only table: sticker kind, display name, artwork
//! path, and how many copies a single "add" drops onto the strip. Hero
//! stickers land one or two at a time; small decorative ones arrive as a
//! scatter. Placements carry a stable id assigned at creation so history
//! operations address stickers by identity, never by list position.

use std::collections::BTreeMap;

use crate::error::{BoothError, BoothResult};

/// Stable identity for one placed sticker, unique within a session.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct StickerId(pub u64);

pub const MIN_STICKER_SCALE: f32 = 0.8;
pub const MAX_STICKER_SCALE: f32 = 1.2;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StickerPlacement {
    pub id: StickerId,
    /// Catalog kind, e.g. `"heart"`.
    pub sticker: String,
    /// Center position in percent of the strip box.
    pub x_percent: f32,
    pub y_percent: f32,
    /// Nominal range [0.8, 1.2].
    pub scale: f32,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct StickerKind {
    pub id: String,
    pub name: String,
    /// Asset-store path of the artwork.
    pub asset_path: String,
    /// Inclusive range of copies one add drops.
    pub group_min: u32,
    pub group_max: u32,
}

pub const DEFAULT_GROUP_RANGE: (u32, u32) = (1, 3);

pub struct StickerCatalog {
    by_id: BTreeMap<String, StickerKind>,
    order: Vec<String>,
}

impl StickerCatalog {
    pub fn builtin() -> Self {
        Self::from_kinds(builtin_kinds()).expect("builtin sticker catalog is valid")
    }

    pub fn from_kinds(kinds: Vec<StickerKind>) -> BoothResult<Self> {
        let mut by_id = BTreeMap::new();
        let mut order = Vec::with_capacity(kinds.len());
        for k in kinds {
            if k.id.trim().is_empty() {
                return Err(BoothError::validation("sticker id must be non-empty"));
            }
            if k.group_min == 0 || k.group_min > k.group_max {
                return Err(BoothError::validation(format!(
                    "sticker '{}' group range [{},{}] is invalid",
                    k.id, k.group_min, k.group_max
                )));
            }
            if by_id.contains_key(&k.id) {
                return Err(BoothError::validation(format!(
                    "duplicate sticker id '{}'",
                    k.id
                )));
            }
            order.push(k.id.clone());
            by_id.insert(k.id.clone(), k);
        }
        Ok(Self { by_id, order })
    }

    pub fn get(&self, id: &str) -> BoothResult<&StickerKind> {
        self.by_id
            .get(id)
            .ok_or_else(|| BoothError::validation(format!("unknown sticker id '{id}'")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &StickerKind> {
        self.order.iter().filter_map(|id| self.by_id.get(id))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn kind(id: &str, name: &str, range: (u32, u32)) -> StickerKind {
    StickerKind {
        id: id.to_string(),
        name: name.to_string(),
        asset_path: format!("stickers/{id}.png"),
        group_min: range.0,
        group_max: range.1,
    }
}

fn builtin_kinds() -> Vec<StickerKind> {
    // Small decorative stickers scatter widely; hero pieces stay scarce.
    const SCATTER: (u32, u32) = (3, 6);
    const HERO: (u32, u32) = (1, 2);
    vec![
        kind("heart", "Heart", DEFAULT_GROUP_RANGE),
        kind("star", "Star", SCATTER),
        kind("sparkle", "Sparkle", SCATTER),
        kind("flower", "Flower", SCATTER),
        kind("cloud", "Cloud", SCATTER),
        kind("rainbow", "Rainbow", HERO),
        kind("butterfly", "Butterfly", DEFAULT_GROUP_RANGE),
        kind("cat", "Cat", HERO),
        kind("dog", "Dog", HERO),
        kind("heart_eyes", "Heart Eyes", HERO),
        kind("sunglasses", "Sunglasses", HERO),
        kind("crown", "Crown", HERO),
        kind("fire", "Fire", DEFAULT_GROUP_RANGE),
        kind("balloon", "Balloon", DEFAULT_GROUP_RANGE),
        kind("camera", "Camera", HERO),
        kind("lips", "Lips", DEFAULT_GROUP_RANGE),
        kind("unicorn", "Unicorn", HERO),
    ]
}
