//! Plain-text views for the terminal.

use std::fmt::Write;

use closetiq_common::models::{ClassificationSuggestion, ClothingItem, Outfit};

pub const EMPTY_WARDROBE: &str = "No items yet. Start adding clothes to your wardrobe!";

/// Short description of an embedded image: its MIME type and decoded size.
pub fn describe_image(image: &str) -> String {
    match image.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((header, payload)) => {
            let mime = header.split(';').next().filter(|m| !m.is_empty()).unwrap_or("image");
            let bytes = payload.len() / 4 * 3;
            format!("{}, {:.1} KB", mime, bytes as f64 / 1024.0)
        }
        None => format!("{} chars", image.len()),
    }
}

pub fn render_item(item: &ClothingItem) -> String {
    format!(
        "{:<16} Type: {:<9} Occasion: {:<7} [{}]",
        item.id,
        item.kind.label(),
        item.occasion.label(),
        describe_image(&item.image)
    )
}

pub fn render_wardrobe(items: &[ClothingItem]) -> String {
    if items.is_empty() {
        return EMPTY_WARDROBE.to_string();
    }

    let mut out = format!("My Wardrobe ({} items)\n", items.len());
    for item in items {
        let _ = writeln!(out, "  {}", render_item(item));
    }
    out.trim_end().to_string()
}

/// Always top, bottom, footwear, whatever order the pieces were picked in.
pub fn render_outfit(outfit: &Outfit) -> String {
    let mut out = String::from("Your Outfit\n");
    for (slot, item) in outfit.slots() {
        let _ = writeln!(
            out,
            "  {:<9} {} [{}]",
            slot.label(),
            item.id,
            describe_image(&item.image)
        );
    }
    if let Some(reason) = &outfit.reason {
        let _ = writeln!(out, "\nAI Recommendation: {}", reason);
    }
    out.trim_end().to_string()
}

pub fn render_suggestion(suggestion: &ClassificationSuggestion) -> String {
    let occasions: Vec<&str> = suggestion.occasions.iter().map(|o| o.label()).collect();
    let mut out = format!("AI Suggestion: {}", suggestion.kind.label());
    if !occasions.is_empty() {
        let _ = write!(out, " for {}", occasions.join(", "));
    }
    if !suggestion.description.is_empty() {
        let _ = write!(out, "\n  {}", suggestion.description);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use closetiq_common::models::{ClothingType, ItemId, Occasion};

    fn item(id: &str, kind: ClothingType) -> ClothingItem {
        ClothingItem {
            id: ItemId::new(id),
            image: "data:image/png;base64,AAAAAAAA".into(),
            kind,
            occasion: Occasion::Casual,
        }
    }

    #[test]
    fn empty_wardrobe_message() {
        assert_eq!(render_wardrobe(&[]), EMPTY_WARDROBE);
    }

    #[test]
    fn wardrobe_lists_capitalized_tags() {
        let text = render_wardrobe(&[item("17", ClothingType::Footwear)]);
        assert!(text.contains("Type: Footwear"));
        assert!(text.contains("Occasion: Casual"));
        assert!(text.contains("17"));
        assert!(!text.contains("AAAAAAAA"));
    }

    #[test]
    fn outfit_renders_in_slot_order() {
        let outfit = Outfit {
            top: item("t", ClothingType::Top),
            bottom: item("b", ClothingType::Bottom),
            footwear: item("f", ClothingType::Footwear),
            reason: Some("Matches".into()),
        };
        let text = render_outfit(&outfit);
        let top = text.find("Top").unwrap();
        let bottom = text.find("Bottom").unwrap();
        let footwear = text.find("Footwear").unwrap();
        assert!(top < bottom && bottom < footwear);
        assert!(text.ends_with("AI Recommendation: Matches"));
    }

    #[test]
    fn image_description_reads_data_url() {
        assert_eq!(describe_image("data:image/png;base64,AAAAAAAA"), "image/png, 0.0 KB");
        assert_eq!(describe_image("raw"), "3 chars");
    }
}
