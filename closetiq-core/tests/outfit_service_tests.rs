// File: closetiq-core/tests/outfit_service_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use mockall::mock;
use rand::SeedableRng;
use rand::rngs::StdRng;

use closetiq_ai::AiClient;
use closetiq_common::error::Error;
use closetiq_common::models::{ClothingItem, ClothingType, ItemId, Occasion};
use closetiq_common::traits::AiGateway;
use closetiq_core::services::outfit_service::{select_local, select_with_ai};
use closetiq_core::services::{OutfitGenerator, SelectionMode, SelectionState};

mock! {
    Gateway {}
    #[async_trait]
    impl AiGateway for Gateway {
        async fn classify_image(&self, image_data: &str) -> Result<String, Error>;
        async fn suggest_outfit(&self, items: &[ClothingItem], occasion: Occasion) -> Result<String, Error>;
    }
}

fn item(id: &str, kind: ClothingType, occasion: Occasion) -> ClothingItem {
    ClothingItem {
        id: ItemId::new(id),
        image: format!("data:image/png;base64,{}", id),
        kind,
        occasion,
    }
}

fn party_wardrobe() -> Vec<ClothingItem> {
    vec![
        item("1", ClothingType::Top, Occasion::Party),
        item("2", ClothingType::Bottom, Occasion::Party),
        item("3", ClothingType::Footwear, Occasion::Party),
        item("4", ClothingType::Top, Occasion::Work),
    ]
}

fn client_with(gateway: MockGateway) -> AiClient {
    AiClient::new(Arc::new(gateway))
}

#[tokio::test]
async fn test_missing_category_skips_network() {
    let mut gateway = MockGateway::new();
    gateway.expect_suggest_outfit().never();
    let client = client_with(gateway);

    let wardrobe = vec![
        item("1", ClothingType::Top, Occasion::Party),
        item("2", ClothingType::Bottom, Occasion::Party),
    ];
    let err = select_with_ai(&wardrobe, Occasion::Party, &client).await.unwrap_err();

    let mut rng = StdRng::seed_from_u64(11);
    let local_err = select_local(&wardrobe, Occasion::Party, &mut rng).unwrap_err();

    assert!(matches!(err, Error::InsufficientItems(Occasion::Party)));
    assert_eq!(err.to_string(), local_err.to_string());
}

#[tokio::test]
async fn test_ai_outfit_resolves() -> Result<(), Error> {
    let mut gateway = MockGateway::new();
    gateway
        .expect_suggest_outfit()
        .withf(|items, occasion| items.len() == 4 && *occasion == Occasion::Party)
        .times(1)
        .returning(|_, _| {
            Ok("```json\n{\"top\":\"1\",\"bottom\":\"2\",\"footwear\":\"3\",\"reason\":\"Sharp\"}\n```".to_string())
        });
    let client = client_with(gateway);
    let wardrobe = party_wardrobe();

    let outfit = select_with_ai(&wardrobe, Occasion::Party, &client).await?;
    let ids: Vec<&str> = outfit.slots().map(|(_, i)| i.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(outfit.reason.as_deref(), Some("Sharp"));
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_is_prefixed() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_suggest_outfit()
        .times(1)
        .returning(|_, _| Err(Error::Service("Unable to connect to AI service".into())));
    let client = client_with(gateway);

    let err = select_with_ai(&party_wardrobe(), Occasion::Party, &client).await.unwrap_err();
    assert!(matches!(err, Error::AiService(_)));
    assert_eq!(err.to_string(), "AI service error: Unable to connect to AI service");
}

#[tokio::test]
async fn test_unparseable_reply_is_prefixed() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_suggest_outfit()
        .times(1)
        .returning(|_, _| Ok("I think the red shirt would look great!".to_string()));
    let client = client_with(gateway);

    let err = select_with_ai(&party_wardrobe(), Occasion::Party, &client).await.unwrap_err();
    assert_eq!(err.to_string(), "AI service error: Invalid response format from AI");
}

#[tokio::test]
async fn test_semantic_failures_keep_their_message() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_suggest_outfit()
        .times(1)
        .returning(|_, _| Ok("{\"top\":\"99\",\"bottom\":\"2\",\"footwear\":\"3\"}".to_string()));
    let client = client_with(gateway);

    let err = select_with_ai(&party_wardrobe(), Occasion::Party, &client).await.unwrap_err();
    assert!(matches!(err, Error::Selection(_)));
    assert!(!err.to_string().starts_with("AI service error"));

    let mut gateway = MockGateway::new();
    gateway
        .expect_suggest_outfit()
        .times(1)
        .returning(|_, _| Ok("{\"error\":\"Not enough items for this occasion\"}".to_string()));
    let client = client_with(gateway);

    let err = select_with_ai(&party_wardrobe(), Occasion::Party, &client).await.unwrap_err();
    assert_eq!(err.to_string(), "Not enough items for this occasion");
}

#[tokio::test]
async fn test_wrong_slot_is_rejected() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_suggest_outfit()
        .times(1)
        .returning(|_, _| Ok("{\"top\":\"2\",\"bottom\":\"1\",\"footwear\":\"3\"}".to_string()));
    let client = client_with(gateway);

    let err = select_with_ai(&party_wardrobe(), Occasion::Party, &client).await.unwrap_err();
    assert!(matches!(err, Error::Selection(_)));
}

#[tokio::test]
async fn test_config_error_is_not_prefixed() {
    let mut gateway = MockGateway::new();
    gateway
        .expect_suggest_outfit()
        .times(1)
        .returning(|_, _| Err(Error::Config("Gemini API key not configured.".into())));
    let generator = OutfitGenerator::new(Some(Arc::new(client_with(gateway))));
    let mut rng = StdRng::seed_from_u64(5);

    let err = generator
        .generate(&party_wardrobe(), Occasion::Party, SelectionMode::Ai, &mut rng)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(
        generator.state(),
        SelectionState::Failed("Configuration error: Gemini API key not configured.".into())
    );
}
