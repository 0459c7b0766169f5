use std::sync::Arc;

use tracing::{debug, info};

use closetiq_common::error::Error;
use closetiq_common::models::{ClassificationSuggestion, ClothingItem, Occasion, Outfit};
use closetiq_common::traits::AiGateway;

use crate::reconciler::{parse, parse_classification, reconcile};

/// Gateway plus reconciler: one call in, checked result out.
pub struct AiClient {
    gateway: Arc<dyn AiGateway>,
}

impl AiClient {
    pub fn new(gateway: Arc<dyn AiGateway>) -> Self {
        Self { gateway }
    }

    /// Classify an uploaded image into a type and a list of occasions.
    pub async fn classify(&self, image_data: &str) -> Result<ClassificationSuggestion, Error> {
        let raw = self.gateway.classify_image(image_data).await?;
        let suggestion = parse_classification(&raw)?;
        info!(
            "Image classified as {} ({} occasions suggested)",
            suggestion.kind,
            suggestion.occasions.len()
        );
        Ok(suggestion)
    }

    /// Let the model pick an outfit from `wardrobe` and resolve its ids.
    ///
    /// The full wardrobe is sent; the model is told to respect the occasion.
    pub async fn select_outfit(
        &self,
        wardrobe: &[ClothingItem],
        occasion: Occasion,
    ) -> Result<Outfit, Error> {
        debug!("Requesting AI outfit for {} from {} items", occasion, wardrobe.len());
        let raw = self.gateway.suggest_outfit(wardrobe, occasion).await?;
        let value = parse(&raw)?;
        reconcile(&value, wardrobe)
    }
}
