use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::fs;
use tracing::{info, warn};

use closetiq_ai::AiClient;
use closetiq_common::error::Error;
use closetiq_common::models::{ClassificationSuggestion, ClothingType, NewClothingItem, Occasion};

const MISSING_IMAGE_MESSAGE: &str = "Please upload an image first!";
const MISSING_TAGS_MESSAGE: &str = "Please select both clothing type and occasion!";

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Reads an image file into a `data:` URL.
pub async fn image_to_data_url(path: &Path) -> Result<String, Error> {
    let bytes = fs::read(path).await?;
    if bytes.is_empty() {
        return Err(Error::Validation(format!("{} is empty", path.display())));
    }
    Ok(encode_data_url(mime_for_path(path), &bytes))
}

/// Form validation done before anything reaches the wardrobe.
pub fn validate_candidate(
    image: Option<&str>,
    kind: Option<ClothingType>,
    occasion: Option<Occasion>,
) -> Result<NewClothingItem, Error> {
    let image = image
        .filter(|i| !i.trim().is_empty())
        .ok_or_else(|| Error::Validation(MISSING_IMAGE_MESSAGE.to_string()))?;

    match (kind, occasion) {
        (Some(kind), Some(occasion)) => Ok(NewClothingItem {
            image: image.to_string(),
            kind,
            occasion,
        }),
        _ => Err(Error::Validation(MISSING_TAGS_MESSAGE.to_string())),
    }
}

/// Result of preparing an upload: the item to add plus what the AI said, if asked.
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    pub candidate: NewClothingItem,
    pub suggestion: Option<ClassificationSuggestion>,
    /// Classification failure shown next to the form; the upload still goes ahead
    /// when the user supplied both tags.
    pub ai_error: Option<String>,
}

pub struct UploadService {
    client: Option<Arc<AiClient>>,
}

impl UploadService {
    pub fn new(client: Option<Arc<AiClient>>) -> Self {
        Self { client }
    }

    /// Classifies an image file without adding it.
    pub async fn analyze(&self, path: &Path) -> Result<ClassificationSuggestion, Error> {
        let image = image_to_data_url(path).await?;
        self.classify(&image).await
    }

    async fn classify(&self, image: &str) -> Result<ClassificationSuggestion, Error> {
        match self.client.as_deref() {
            Some(client) => client.classify(image).await,
            None => Err(Error::Config("AI image analysis is not configured".to_string())),
        }
    }

    /// Turns an image file and optional tags into an item ready for the wardrobe.
    ///
    /// With `analyze`, tags the user left out are filled from the classifier:
    /// its type, and its first suggested occasion. Tags the user gave always win.
    pub async fn prepare(
        &self,
        path: &Path,
        kind: Option<ClothingType>,
        occasion: Option<Occasion>,
        analyze: bool,
    ) -> Result<PreparedUpload, Error> {
        let image = image_to_data_url(path).await?;

        let mut suggestion = None;
        let mut ai_error = None;
        if analyze {
            match self.classify(&image).await {
                Ok(s) => {
                    info!("AI suggests {} for {}", s.kind, path.display());
                    suggestion = Some(s);
                }
                Err(e) => {
                    warn!("AI analysis failed for {}: {}", path.display(), e);
                    ai_error = Some(e.to_string());
                }
            }
        }

        let kind = kind.or_else(|| suggestion.as_ref().map(|s| s.kind));
        let occasion = occasion.or_else(|| suggestion.as_ref().and_then(|s| s.default_occasion()));
        let candidate = match (validate_candidate(Some(&image), kind, occasion), &ai_error) {
            (Err(Error::Validation(message)), Some(cause)) => {
                return Err(Error::Validation(format!("{} (AI analysis failed: {})", message, cause)));
            }
            (result, _) => result?,
        };

        Ok(PreparedUpload {
            candidate,
            suggestion,
            ai_error,
        })
    }
}
