use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error, info};

use closetiq_common::error::Error;
use closetiq_common::models::{ClothingItem, Occasion};
use closetiq_common::traits::AiGateway;

use crate::models::{
    Content, GeminiConfig, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, OutfitCandidate, Part,
};
use crate::prompts::{outfit_prompt, CLASSIFY_PROMPT};

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

const MISSING_KEY_MESSAGE: &str =
    "Gemini API key not configured. Please set GEMINI_API_KEY in your environment or .env file.";
const CLASSIFY_FAILED_MESSAGE: &str = "Unable to analyze image. Please check your API key.";
const OUTFIT_FAILED_MESSAGE: &str = "Unable to connect to AI service";

/// Google Gemini provider implementation
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with the given configuration
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    fn api_key(&self) -> Result<&str, Error> {
        match self.config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::Config(MISSING_KEY_MESSAGE.to_string())),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Sends one request and pulls out the model's text. No retries.
    ///
    /// Transport failures collapse into `failure_message`; the request URL
    /// carries the key, so it never reaches the returned error.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
        failure_message: &str,
    ) -> Result<String, Error> {
        let api_key = self.api_key()?;
        let url = self.endpoint();

        info!("Making API call to {}", url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini API request failed: {}", e.without_url());
                Error::Service(failure_message.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!("Failed to read Gemini API response: {}", e.without_url());
            Error::Service(failure_message.to_string())
        })?;

        if !status.is_success() {
            error!("Gemini API error: status={}, body={}", status, body);
            return Err(Error::Service(failure_message.to_string()));
        }
        debug!("Raw API response: {}", body);

        extract_text(&body)
    }
}

#[async_trait]
impl AiGateway for GeminiProvider {
    async fn classify_image(&self, image_data: &str) -> Result<String, Error> {
        self.api_key()?;
        let request = classification_request(image_data);
        self.generate(&request, CLASSIFY_FAILED_MESSAGE).await
    }

    async fn suggest_outfit(&self, items: &[ClothingItem], occasion: Occasion) -> Result<String, Error> {
        self.api_key()?;
        let request = outfit_request(items, occasion);
        self.generate(&request, OUTFIT_FAILED_MESSAGE).await
    }
}

/// Splits a `data:<mime>;base64,<payload>` URL. Bare base64 is passed through
/// with the default JPEG type.
pub fn split_data_url(image: &str) -> (String, &str) {
    match image.split_once(',') {
        Some((header, payload)) => {
            let mime = header
                .strip_prefix("data:")
                .and_then(|rest| rest.split(';').next())
                .filter(|mime| !mime.is_empty())
                .unwrap_or(DEFAULT_IMAGE_MIME);
            (mime.to_string(), payload)
        }
        None => (DEFAULT_IMAGE_MIME.to_string(), image),
    }
}

pub fn classification_request(image_data: &str) -> GenerateContentRequest {
    let (mime_type, data) = split_data_url(image_data);
    GenerateContentRequest {
        contents: vec![Content::user(vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type,
                    data: data.to_string(),
                },
            },
            Part::Text {
                text: CLASSIFY_PROMPT.to_string(),
            },
        ])],
        generation_config: GenerationConfig::CLASSIFICATION,
    }
}

pub fn outfit_request(items: &[ClothingItem], occasion: Occasion) -> GenerateContentRequest {
    let candidates: Vec<OutfitCandidate> = items.iter().map(OutfitCandidate::from).collect();
    GenerateContentRequest {
        contents: vec![Content::user(vec![Part::Text {
            text: outfit_prompt(&candidates, occasion),
        }])],
        generation_config: GenerationConfig::OUTFIT,
    }
}

/// Pulls `candidates[0].content.parts[0].text` out of a response body.
pub fn extract_text(body: &str) -> Result<String, Error> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        error!("Failed to parse API response as JSON: {:?}", e);
        Error::Format(e.to_string())
    })?;

    response.first_text().map(str::to_string).ok_or_else(|| {
        error!("Response missing candidate text: {}", body);
        Error::Format("response contained no candidate text".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use closetiq_common::models::{ClothingType, ItemId};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TEST_KEY: &str = "SECRETKEY123";

    /// Answers exactly one request with `status` and `body`, returns the base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
                    let length = headers
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    fn provider_at(api_base: &str) -> GeminiProvider {
        GeminiProvider::new(GeminiConfig::new(Some(TEST_KEY.into())).with_api_base(api_base))
    }

    fn item(id: &str, kind: ClothingType) -> ClothingItem {
        ClothingItem {
            id: ItemId::new(id),
            image: "data:image/png;base64,SECRETPIXELS".into(),
            kind,
            occasion: Occasion::Casual,
        }
    }

    #[test]
    fn data_url_header_supplies_mime_type() {
        assert_eq!(
            split_data_url("data:image/png;base64,AAAA"),
            ("image/png".to_string(), "AAAA")
        );
        assert_eq!(split_data_url("AAAA"), ("image/jpeg".to_string(), "AAAA"));
        assert_eq!(split_data_url(",AAAA"), ("image/jpeg".to_string(), "AAAA"));
    }

    #[test]
    fn outfit_request_strips_images() {
        let items = vec![item("1", ClothingType::Top), item("2", ClothingType::Bottom)];
        let request = outfit_request(&items, Occasion::Casual);
        let body = serde_json::to_string(&request).unwrap();

        assert!(!body.contains("SECRETPIXELS"));
        assert_eq!(request.generation_config, GenerationConfig::OUTFIT);
        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].parts.len(), 1);
    }

    #[test]
    fn classification_request_sends_image_then_prompt() {
        let request = classification_request("data:image/webp;base64,QUJD");
        let parts = &request.contents[0].parts;

        match &parts[0] {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/webp");
                assert_eq!(inline_data.data, "QUJD");
            }
            other => panic!("expected inline data, got {:?}", other),
        }
        assert!(matches!(&parts[1], Part::Text { text } if text == CLASSIFY_PROMPT));
        assert_eq!(request.generation_config, GenerationConfig::CLASSIFICATION);
    }

    #[test]
    fn extract_text_rejects_empty_candidates() {
        let err = extract_text(r#"{"candidates": []}"#).unwrap_err();
        assert!(matches!(err, Error::Format(_)));

        let err = extract_text("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Format(_)));

        let text = extract_text(r#"{"candidates":[{"content":{"parts":[{"text":"hi"}]}}]}"#).unwrap();
        assert_eq!(text, "hi");
    }

    #[tokio::test]
    async fn missing_key_fails_before_network() {
        let provider = GeminiProvider::new(
            GeminiConfig::new(None).with_api_base("http://127.0.0.1:9"),
        );
        let err = provider.classify_image("AAAA").await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let provider = GeminiProvider::new(GeminiConfig::new(Some("   ".into())));
        let err = provider
            .suggest_outfit(&[item("1", ClothingType::Top)], Occasion::Casual)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn error_status_maps_to_per_call_message() {
        let base = serve_once("500 Internal Server Error", r#"{"error":{"message":"boom"}}"#).await;
        let err = provider_at(&base).classify_image("data:image/png;base64,AAAA").await.unwrap_err();
        assert!(matches!(&err, Error::Service(m) if m == CLASSIFY_FAILED_MESSAGE));

        let base = serve_once("403 Forbidden", r#"{"error":{"message":"bad key"}}"#).await;
        let err = provider_at(&base)
            .suggest_outfit(&[item("1", ClothingType::Top)], Occasion::Casual)
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::Service(m) if m == OUTFIT_FAILED_MESSAGE));
        assert_eq!(err.into_ai_service().to_string(), "AI service error: Unable to connect to AI service");
    }

    #[tokio::test]
    async fn success_body_yields_candidate_text() {
        let base = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"top\":\"1\"}"}]}}]}"#,
        )
        .await;
        let text = provider_at(&base)
            .suggest_outfit(&[item("1", ClothingType::Top)], Occasion::Casual)
            .await
            .unwrap();
        assert_eq!(text, r#"{"top":"1"}"#);
    }

    #[tokio::test]
    async fn unreachable_service_hides_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider_at(&format!("http://{}", addr))
            .suggest_outfit(&[item("1", ClothingType::Top)], Occasion::Casual)
            .await
            .unwrap_err();
        assert!(matches!(&err, Error::Service(m) if m == OUTFIT_FAILED_MESSAGE));

        let shown = err.into_ai_service().to_string();
        assert!(!shown.contains(TEST_KEY), "key leaked: {}", shown);
        assert_eq!(shown, "AI service error: Unable to connect to AI service");
    }
}
