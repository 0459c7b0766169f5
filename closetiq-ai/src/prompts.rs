use closetiq_common::models::Occasion;

use crate::models::OutfitCandidate;

pub const CLASSIFY_PROMPT: &str = r#"Analyze this clothing item image and classify it.

TASK: Identify the clothing type and suggest suitable occasions.

RESPOND WITH VALID JSON ONLY:
{
  "type": "top" | "bottom" | "footwear",
  "occasions": ["casual", "formal", "party", "sports", "work"],
  "description": "Brief description of the item"
}

RULES:
- type MUST be exactly one of: "top", "bottom", "footwear"
- top = shirts, t-shirts, jackets, sweaters, hoodies, blouses, tank tops, etc.
- bottom = pants, jeans, shorts, skirts, trousers, leggings, etc.
- footwear = shoes, sneakers, boots, sandals, heels, loafers, etc.
- occasions should be an array of suitable occasions from: casual, formal, party, sports, work
- Include ALL occasions that the item could work for"#;

/// Builds the outfit-selection prompt around the stripped wardrobe listing.
pub fn outfit_prompt(candidates: &[OutfitCandidate], occasion: Occasion) -> String {
    let wardrobe_json = serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a fashion assistant for ClosetIQ, a wardrobe management app designed for people who waste too much time deciding what to wear.

TASK: Select ONE complete outfit from the user's existing wardrobe for the "{occasion}" occasion.

WARDROBE DATA:
{wardrobe_json}

RULES:
1. Select items ONLY from the wardrobe above
2. Select exactly ONE item from each type: top, bottom, footwear
3. ALL selected items MUST have occasion="{occasion}"
4. Respond with VALID JSON ONLY, no other text

REQUIRED JSON FORMAT:
{{
  "top": "item_id_here",
  "bottom": "item_id_here",
  "footwear": "item_id_here",
  "reason": "Short explanation of why these items work together"
}}

If insufficient items exist, respond with:
{{
  "error": "Not enough items for this occasion"
}}"#
    )
}
