//! Turns the model's free-form text into something the wardrobe can trust.
//!
//! Parsing is purely syntactic. [`reconcile`] is the semantic step: it checks
//! that every id the model picked actually exists before an outfit is built.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, error};

use closetiq_common::error::Error;
use closetiq_common::models::{
    ClassificationSuggestion, ClothingItem, ClothingType, ItemId, Occasion, Outfit,
};

pub const DEFAULT_REASON: &str = "AI-selected outfit";

const MISSING_ITEMS_MESSAGE: &str =
    "AI selected items that do not exist in your wardrobe. Please try again.";

/// Matches a whole reply wrapped in a Markdown fence, tagged or bare. The
/// closing fence is optional because truncated replies drop it.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)\s*(?:```)?\z")
        .expect("fence regex is valid")
});

/// Trims `text` and removes a surrounding code fence if there is one.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    match FENCE_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => trimmed,
    }
}

/// Parses raw model text as JSON after fence stripping.
pub fn parse(raw: &str) -> Result<Value, Error> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(cleaned).map_err(|e| {
        error!("Failed to parse AI response: {}", raw);
        Error::Format(e.to_string())
    })
}

/// Resolves an outfit-selection reply against the wardrobe.
pub fn reconcile(value: &Value, wardrobe: &[ClothingItem]) -> Result<Outfit, Error> {
    if let Some(message) = declined_message(value) {
        debug!("AI declined to pick an outfit: {}", message);
        return Err(Error::Declined(message));
    }

    let top = lookup(value, ClothingType::Top, wardrobe);
    let bottom = lookup(value, ClothingType::Bottom, wardrobe);
    let footwear = lookup(value, ClothingType::Footwear, wardrobe);

    let (Some(top), Some(bottom), Some(footwear)) = (top, bottom, footwear) else {
        error!("AI selected invalid IDs: {}", value);
        return Err(Error::Selection(MISSING_ITEMS_MESSAGE.to_string()));
    };

    let reason = value
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_REASON)
        .to_string();

    Ok(Outfit {
        top: top.clone(),
        bottom: bottom.clone(),
        footwear: footwear.clone(),
        reason: Some(reason),
    })
}

fn declined_message(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn lookup<'a>(value: &Value, slot: ClothingType, wardrobe: &'a [ClothingItem]) -> Option<&'a ClothingItem> {
    let id = value.get(slot.as_str()).and_then(ItemId::from_json)?;
    wardrobe.iter().find(|item| item.id == id)
}

/// Parses an image-classification reply.
///
/// Unknown occasions are dropped; an unknown or missing type is a format error
/// because the upload form cannot use it.
pub fn parse_classification(raw: &str) -> Result<ClassificationSuggestion, Error> {
    let value = parse(raw)?;

    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<ClothingType>().ok())
        .ok_or_else(|| {
            error!("Classification reply has no usable type: {}", raw);
            Error::Format(format!("unrecognized clothing type in {}", value))
        })?;

    let occasions = value
        .get("occasions")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .filter_map(|o| match o.parse::<Occasion>() {
                    Ok(occasion) => Some(occasion),
                    Err(_) => {
                        debug!("Dropping unknown occasion from classifier: {}", o);
                        None
                    }
                })
                .fold(Vec::new(), |mut acc, o| {
                    if !acc.contains(&o) {
                        acc.push(o);
                    }
                    acc
                })
        })
        .unwrap_or_default();

    let description = value
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(ClassificationSuggestion { kind, occasions, description })
}
