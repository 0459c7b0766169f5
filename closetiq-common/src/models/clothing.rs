// File: closetiq-common/src/models/clothing.rs

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::error::Error;

/// Canonical identifier of a wardrobe item.
///
/// Older saves wrote ids as JSON numbers and the AI may echo them back either
/// way, so every id is normalized to its decimal string form on the way in and
/// compared as a plain string afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalizes a JSON string or number into an id.
    ///
    /// Returns `None` for anything that would not have counted as an id in a
    /// saved wardrobe: null, booleans, empty strings and zero.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Self(trimmed.to_string()))
                }
            }
            Value::Number(n) => number_to_id(n).map(Self),
            _ => None,
        }
    }
}

fn number_to_id(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return Some(u.to_string());
    }
    let f = n.as_f64()?;
    if f == 0.0 || !f.is_finite() {
        None
    } else if f.fract() == 0.0 {
        Some(format!("{:.0}", f))
    } else {
        Some(f.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ItemId::from_json(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid item id: {}", value)))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

impl From<u64> for ItemId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// The outfit slot a piece of clothing fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClothingType {
    Top,
    Bottom,
    Footwear,
}

impl ClothingType {
    pub const ALL: [ClothingType; 3] = [ClothingType::Top, ClothingType::Bottom, ClothingType::Footwear];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClothingType::Top => "top",
            ClothingType::Bottom => "bottom",
            ClothingType::Footwear => "footwear",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClothingType::Top => "Top",
            ClothingType::Bottom => "Bottom",
            ClothingType::Footwear => "Footwear",
        }
    }
}

impl fmt::Display for ClothingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ClothingType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(ClothingType::Top),
            "bottom" => Ok(ClothingType::Bottom),
            "footwear" => Ok(ClothingType::Footwear),
            other => Err(Error::Validation(format!("Unknown clothing type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occasion {
    Casual,
    Formal,
    Party,
    Sports,
    Work,
}

impl Occasion {
    pub const ALL: [Occasion; 5] = [
        Occasion::Casual,
        Occasion::Formal,
        Occasion::Party,
        Occasion::Sports,
        Occasion::Work,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Occasion::Casual => "casual",
            Occasion::Formal => "formal",
            Occasion::Party => "party",
            Occasion::Sports => "sports",
            Occasion::Work => "work",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Occasion::Casual => "Casual",
            Occasion::Formal => "Formal",
            Occasion::Party => "Party",
            Occasion::Sports => "Sports",
            Occasion::Work => "Work",
        }
    }
}

impl fmt::Display for Occasion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Occasion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "casual" => Ok(Occasion::Casual),
            "formal" => Ok(Occasion::Formal),
            "party" => Ok(Occasion::Party),
            "sports" => Ok(Occasion::Sports),
            "work" => Ok(Occasion::Work),
            other => Err(Error::Validation(format!("Unknown occasion: {}", other))),
        }
    }
}

/// A single piece of clothing in the wardrobe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: ItemId,
    /// Embedded image, normally a `data:` URL.
    pub image: String,
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub occasion: Occasion,
}

/// What the caller hands to the wardrobe before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewClothingItem {
    pub image: String,
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub occasion: Occasion,
}

impl NewClothingItem {
    pub fn into_item(self, id: ItemId) -> ClothingItem {
        ClothingItem {
            id,
            image: self.image,
            kind: self.kind,
            occasion: self.occasion,
        }
    }
}

/// Persisted shape of an item. Saves from before ids existed have no `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredClothingItem {
    #[serde(default)]
    pub id: Option<Value>,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub occasion: Occasion,
}

impl StoredClothingItem {
    pub fn stored_id(&self) -> Option<ItemId> {
        self.id.as_ref().and_then(ItemId::from_json)
    }

    pub fn with_id(self, id: ItemId) -> ClothingItem {
        ClothingItem {
            id,
            image: self.image,
            kind: self.kind,
            occasion: self.occasion,
        }
    }
}
