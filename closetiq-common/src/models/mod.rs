// File: closetiq-common/src/models/mod.rs
pub mod clothing;
pub mod outfit;
pub mod classification;

pub use clothing::{ClothingItem, ClothingType, ItemId, NewClothingItem, Occasion, StoredClothingItem};
pub use outfit::Outfit;
pub use classification::ClassificationSuggestion;
