use async_trait::async_trait;

use crate::error::Error;
use crate::models::{ClothingItem, Occasion};

/// I/O boundary to the generative AI service.
///
/// Implementations make exactly one outbound request per call and return the
/// model's raw text untouched. Interpreting that text is someone else's job.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Asks the model to classify the clothing in `image_data` (a data URL or bare base64).
    async fn classify_image(&self, image_data: &str) -> Result<String, Error>;

    /// Asks the model to pick one top, bottom and footwear from `items` for `occasion`.
    async fn suggest_outfit(&self, items: &[ClothingItem], occasion: Occasion) -> Result<String, Error>;
}
