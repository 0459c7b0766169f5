// File: closetiq-common/src/models/classification.rs

use serde::{Deserialize, Serialize};

use super::clothing::{ClothingType, Occasion};

/// What the image classifier thinks an uploaded photo shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSuggestion {
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub occasions: Vec<Occasion>,
    #[serde(default)]
    pub description: String,
}

impl ClassificationSuggestion {
    /// The occasion pre-selected in the upload form: the first one suggested.
    pub fn default_occasion(&self) -> Option<Occasion> {
        self.occasions.first().copied()
    }
}
