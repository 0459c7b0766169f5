use std::sync::{Arc, Mutex, MutexGuard};

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info, warn};

use closetiq_ai::AiClient;
use closetiq_common::error::Error;
use closetiq_common::models::{ClothingItem, ClothingType, Occasion, Outfit};

/// Items matching one occasion, split by outfit slot.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub tops: Vec<&'a ClothingItem>,
    pub bottoms: Vec<&'a ClothingItem>,
    pub footwear: Vec<&'a ClothingItem>,
}

impl<'a> Partition<'a> {
    pub fn slot(&self, slot: ClothingType) -> &[&'a ClothingItem] {
        match slot {
            ClothingType::Top => &self.tops,
            ClothingType::Bottom => &self.bottoms,
            ClothingType::Footwear => &self.footwear,
        }
    }

    /// At least one candidate for every slot.
    pub fn is_complete(&self) -> bool {
        !self.tops.is_empty() && !self.bottoms.is_empty() && !self.footwear.is_empty()
    }
}

pub fn partition(wardrobe: &[ClothingItem], occasion: Occasion) -> Partition<'_> {
    let mut parts = Partition::default();
    for item in wardrobe.iter().filter(|item| item.occasion == occasion) {
        match item.kind {
            ClothingType::Top => parts.tops.push(item),
            ClothingType::Bottom => parts.bottoms.push(item),
            ClothingType::Footwear => parts.footwear.push(item),
        }
    }
    parts
}

/// Picks one random matching item per slot, independently.
pub fn select_local<R: Rng + ?Sized>(
    wardrobe: &[ClothingItem],
    occasion: Occasion,
    rng: &mut R,
) -> Result<Outfit, Error> {
    let parts = partition(wardrobe, occasion);

    let (Some(top), Some(bottom), Some(footwear)) = (
        parts.tops.choose(&mut *rng),
        parts.bottoms.choose(&mut *rng),
        parts.footwear.choose(&mut *rng),
    ) else {
        return Err(Error::InsufficientItems(occasion));
    };

    Ok(Outfit {
        top: (*top).clone(),
        bottom: (*bottom).clone(),
        footwear: (*footwear).clone(),
        reason: None,
    })
}

/// Delegates the pick to the AI, after checking locally that a pick is possible.
///
/// Transport and parse failures come back as [`Error::AiService`]; a refusal
/// from the model or a bad pick keeps its own message.
pub async fn select_with_ai(
    wardrobe: &[ClothingItem],
    occasion: Occasion,
    client: &AiClient,
) -> Result<Outfit, Error> {
    if !partition(wardrobe, occasion).is_complete() {
        return Err(Error::InsufficientItems(occasion));
    }

    let outfit = client
        .select_outfit(wardrobe, occasion)
        .await
        .map_err(Error::into_ai_service)?;

    for (slot, item) in outfit.slots() {
        if item.kind != slot {
            warn!("AI put {} ({}) in the {} slot", item.id, item.kind, slot);
            return Err(Error::Selection(format!(
                "AI selected a {} for the {} slot. Please try again.",
                item.kind, slot
            )));
        }
        if item.occasion != occasion {
            warn!(
                "AI picked {} tagged {} for a {} outfit",
                item.id, item.occasion, occasion
            );
        }
    }

    Ok(outfit)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Local,
    Ai,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Selecting,
    Resolved(Outfit),
    Failed(String),
}

/// Runs outfit requests one at a time and remembers how the last one ended.
///
/// A request made while another is `Selecting` is refused rather than queued,
/// the same way the UI disables its button while a request is out.
pub struct OutfitGenerator {
    client: Option<Arc<AiClient>>,
    state: Mutex<SelectionState>,
}

impl OutfitGenerator {
    pub fn new(client: Option<Arc<AiClient>>) -> Self {
        Self {
            client,
            state: Mutex::new(SelectionState::Idle),
        }
    }

    pub fn state(&self) -> SelectionState {
        self.lock_state().clone()
    }

    pub fn is_busy(&self) -> bool {
        matches!(*self.lock_state(), SelectionState::Selecting)
    }

    pub async fn generate<R: Rng + ?Sized>(
        &self,
        wardrobe: &[ClothingItem],
        occasion: Occasion,
        mode: SelectionMode,
        rng: &mut R,
    ) -> Result<Outfit, Error> {
        let _in_flight = self.begin()?;
        debug!("Generating {:?} outfit for {}", mode, occasion);

        let result = match mode {
            SelectionMode::Local => select_local(wardrobe, occasion, rng),
            SelectionMode::Ai => match self.client.as_deref() {
                Some(client) => select_with_ai(wardrobe, occasion, client).await,
                None => Err(Error::Config("AI outfit selection is not configured".to_string())),
            },
        };

        let mut state = self.lock_state();
        match &result {
            Ok(outfit) => {
                info!(
                    "Outfit for {}: top={} bottom={} footwear={}",
                    occasion, outfit.top.id, outfit.bottom.id, outfit.footwear.id
                );
                *state = SelectionState::Resolved(outfit.clone());
            }
            Err(e) => {
                info!("Outfit generation for {} failed: {}", occasion, e);
                *state = SelectionState::Failed(e.to_string());
            }
        }
        result
    }

    fn begin(&self) -> Result<InFlight<'_>, Error> {
        let mut state = self.lock_state();
        if matches!(*state, SelectionState::Selecting) {
            return Err(Error::Validation(
                "An outfit is already being generated. Please wait.".to_string(),
            ));
        }
        *state = SelectionState::Selecting;
        Ok(InFlight { generator: self })
    }

    fn lock_state(&self) -> MutexGuard<'_, SelectionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Puts the generator back to `Idle` if a request is dropped mid-flight.
struct InFlight<'a> {
    generator: &'a OutfitGenerator,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.generator.lock_state();
        if matches!(*state, SelectionState::Selecting) {
            *state = SelectionState::Idle;
        }
    }
}
