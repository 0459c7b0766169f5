// File: closetiq-common/src/models/outfit.rs

use serde::{Deserialize, Serialize};

use super::clothing::{ClothingItem, ClothingType};

/// One top, one bottom and one pair of footwear picked for an occasion.
///
/// Never persisted; it lives for a single render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outfit {
    pub top: ClothingItem,
    pub bottom: ClothingItem,
    pub footwear: ClothingItem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Outfit {
    pub fn get(&self, slot: ClothingType) -> &ClothingItem {
        match slot {
            ClothingType::Top => &self.top,
            ClothingType::Bottom => &self.bottom,
            ClothingType::Footwear => &self.footwear,
        }
    }

    /// The three pieces in display order: top, bottom, footwear.
    pub fn slots(&self) -> impl Iterator<Item = (ClothingType, &ClothingItem)> {
        ClothingType::ALL.into_iter().map(move |slot| (slot, self.get(slot)))
    }
}
