use serde::{Deserialize, Serialize};

use closetiq_common::models::{ClothingItem, ClothingType, ItemId, Occasion};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Configuration for the Gemini provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key for authentication. `None` is allowed until a request is attempted.
    pub api_key: Option<String>,

    /// Base URL for API requests
    pub api_base: String,

    /// Model used for both classification and outfit selection
    pub model: String,
}

impl GeminiConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Body of a `models/{model}:generateContent` call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    #[serde(rename_all = "camelCase")]
    InlineData { inline_data: InlineData },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Sampling parameters. Fixed per call type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl GenerationConfig {
    /// Low temperature, short answer: the classifier should be boring.
    pub const CLASSIFICATION: GenerationConfig = GenerationConfig {
        temperature: 0.3,
        max_output_tokens: 256,
        top_p: 0.8,
        top_k: 20,
    };

    pub const OUTFIT: GenerationConfig = GenerationConfig {
        temperature: 0.7,
        max_output_tokens: 512,
        top_p: 0.9,
        top_k: 40,
    };
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate, if the model produced one.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::InlineData { .. } => None,
            })
    }
}

/// Item projection sent to the model when choosing an outfit. No image data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutfitCandidate {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ClothingType,
    pub occasion: Occasion,
}

impl From<&ClothingItem> for OutfitCandidate {
    fn from(item: &ClothingItem) -> Self {
        Self {
            id: item.id.clone(),
            kind: item.kind,
            occasion: item.occasion,
        }
    }
}
