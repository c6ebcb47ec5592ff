//! Gemini (Google) client: the strategy (text) and scene (image) endpoints.

use crate::content::data_url_payload;
use crate::engine::{SceneEngine, SceneRequest, StrategyEngine, StrategyRequest};
use crate::error::{parse_retry_after, sanitize_error_message, NanoBrandError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model for the strategy call.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-3-pro-preview";
/// Default model for scene synthesis.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Builder for [`GeminiClient`].
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    text_model: Option<String>,
    image_model: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the strategy model.
    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = Some(model.into());
        self
    }

    /// Overrides the scene model.
    pub fn image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = Some(model.into());
        self
    }

    /// Builds the client, resolving the API key.
    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| {
                NanoBrandError::Auth("GEMINI_API_KEY not set and no API key provided".into())
            })?;

        Ok(GeminiClient {
            client: reqwest::Client::new(),
            api_key,
            text_model: self.text_model.unwrap_or_else(|| DEFAULT_TEXT_MODEL.into()),
            image_model: self
                .image_model
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.into()),
        })
    }
}

/// Client for both Gemini endpoints used by the pipeline. Stateless between
/// calls; the credential is injected at construction time.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    /// Creates a new [`GeminiClientBuilder`].
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    async fn generate_content(&self, model: &str, body: &GeminiRequest) -> Result<GeminiResponse> {
        let url = format!("{API_BASE}/{model}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(map_api_error(status.as_u16(), &text, &headers));
        }

        let reply: GeminiResponse = response.json().await?;

        // Prompt-level blocks come back as HTTP 200
        if let Some(ref feedback) = reply.prompt_feedback {
            if let Some(ref reason) = feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| format!("Prompt blocked: {reason}"));
                return Err(NanoBrandError::ContentBlocked(msg));
            }
        }

        Ok(reply)
    }

    /// Checks that the configured models are reachable with this key.
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{API_BASE}/{}", self.text_model);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(NanoBrandError::Auth("Invalid API key".into())),
            404 => Err(NanoBrandError::InvalidRequest(
                "Model not found. Verify the model name is correct.".into(),
            )),
            s if !(200..300).contains(&s) => Err(NanoBrandError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl StrategyEngine for GeminiClient {
    async fn propose(&self, request: &StrategyRequest) -> Result<String> {
        let body = GeminiRequest::strategy(request)?;
        tracing::debug!(
            model = %self.text_model,
            images = request.images.len(),
            "sending strategy request"
        );

        let reply = self.generate_content(&self.text_model, &body).await?;

        let candidate = reply.candidates.into_iter().next().ok_or_else(|| {
            NanoBrandError::UnexpectedResponse("no candidates in strategy reply".into())
        })?;
        check_finish_reason(&candidate)?;

        let content = candidate.content.ok_or_else(|| {
            NanoBrandError::UnexpectedResponse("no content in strategy candidate".into())
        })?;

        let text: String = content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            return Err(NanoBrandError::UnexpectedResponse(
                "no text in strategy reply".into(),
            ));
        }
        Ok(text)
    }
}

#[async_trait]
impl SceneEngine for GeminiClient {
    async fn render_scene(&self, request: &SceneRequest) -> Result<Option<String>> {
        let body = GeminiRequest::scene(request)?;
        tracing::debug!(
            model = %self.image_model,
            references = request.references.len(),
            "sending scene request"
        );

        let reply = self.generate_content(&self.image_model, &body).await?;

        let Some(candidate) = reply.candidates.into_iter().next() else {
            return Ok(None);
        };
        check_finish_reason(&candidate)?;

        let inline = candidate
            .content
            .into_iter()
            .flat_map(|c| c.parts)
            .find_map(|p| p.inline_data);

        Ok(inline.map(|d| format!("data:{};base64,{}", d.mime_type, d.data)))
    }
}

fn check_finish_reason(candidate: &GeminiCandidate) -> Result<()> {
    if let Some(ref reason) = candidate.finish_reason {
        match reason.as_str() {
            "SAFETY" | "IMAGE_SAFETY" | "IMAGE_PROHIBITED_CONTENT" | "IMAGE_RECITATION"
            | "RECITATION" | "PROHIBITED_CONTENT" | "BLOCKLIST" => {
                return Err(NanoBrandError::ContentBlocked(format!(
                    "blocked by Gemini safety filter: {reason}"
                )));
            }
            _ => {} // STOP, MAX_TOKENS, etc. are normal
        }
    }
    Ok(())
}

fn map_api_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> NanoBrandError {
    let text = sanitize_error_message(text);
    if status == 404 {
        return NanoBrandError::InvalidRequest(
            "Model not found. Verify the model name is correct.".into(),
        );
    }
    if status == 429 {
        let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
        return NanoBrandError::RateLimited { retry_after };
    }
    if status == 401 || status == 403 {
        return NanoBrandError::Auth(text);
    }
    let lower = text.to_lowercase();
    if lower.contains("safety")
        || lower.contains("blocked")
        || lower.contains("content_policy")
        || lower.contains("prohibited")
    {
        return NanoBrandError::ContentBlocked(text);
    }
    NanoBrandError::Api {
        status,
        message: text,
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - either text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text { text: String },
    InlineData { inline_data: GeminiInlineData },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<GeminiImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiImageConfig {
    aspect_ratio: String,
}

fn inline_part(data_url: &str) -> Result<GeminiRequestPart> {
    let (mime, payload) = data_url_payload(data_url)
        .ok_or_else(|| NanoBrandError::Decode("reference image is not a data URL".into()))?;
    Ok(GeminiRequestPart::InlineData {
        inline_data: GeminiInlineData {
            mime_type: mime.to_string(),
            data: payload.to_string(),
        },
    })
}

impl GeminiRequest {
    /// Strategy call: every upload first, then the instruction text.
    fn strategy(req: &StrategyRequest) -> Result<Self> {
        let mut parts = Vec::with_capacity(req.images.len() + 1);
        for image in &req.images {
            parts.push(inline_part(image)?);
        }
        parts.push(GeminiRequestPart::Text {
            text: crate::strategy::strategy_instruction(&req.variants, &req.notes),
        });

        Ok(Self {
            contents: vec![GeminiContent { parts }],
            generation_config: None,
        })
    }

    /// Scene call: the prompt first, then every identity reference. Output
    /// is pinned to a square image.
    fn scene(req: &SceneRequest) -> Result<Self> {
        let mut parts = Vec::with_capacity(req.references.len() + 1);
        parts.push(GeminiRequestPart::Text {
            text: req.prompt.clone(),
        });
        for reference in &req.references {
            parts.push(inline_part(reference)?);
        }

        Ok(Self {
            contents: vec![GeminiContent { parts }],
            generation_config: Some(GeminiConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: Some(GeminiImageConfig {
                    aspect_ratio: "1:1".to_string(),
                }),
            }),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::encode_data_url;

    fn jpeg_url() -> String {
        encode_data_url("image/jpeg", &[0xFF, 0xD8, 0xFF, 0xE0])
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let client = GeminiClientBuilder::new().api_key("test-key").build();
        assert!(client.is_ok());
    }

    #[test]
    fn test_builder_rejects_blank_key_without_env() {
        // A blank explicit key must not be accepted as a credential.
        let builder = GeminiClientBuilder::new().api_key("   ");
        if std::env::var("GEMINI_API_KEY").is_err() {
            assert!(builder.build().is_err());
        }
    }

    #[test]
    fn test_builder_model_overrides() {
        let client = GeminiClient::builder()
            .api_key("k")
            .text_model("custom-text")
            .image_model("custom-image")
            .build()
            .unwrap();
        assert_eq!(client.text_model, "custom-text");
        assert_eq!(client.image_model, "custom-image");
    }

    #[test]
    fn test_strategy_request_parts_order() {
        let req = crate::engine::StrategyRequest::new(vec![jpeg_url(), jpeg_url()])
            .with_variants("أحمر")
            .with_notes("توصيل مجاني");
        let body = GeminiRequest::strategy(&req).unwrap();

        // Two image parts, then the instruction
        assert_eq!(body.contents.len(), 1);
        assert_eq!(body.contents[0].parts.len(), 3);
        assert!(matches!(
            body.contents[0].parts[0],
            GeminiRequestPart::InlineData { .. }
        ));
        assert!(matches!(
            body.contents[0].parts[2],
            GeminiRequestPart::Text { .. }
        ));
        assert!(body.generation_config.is_none());
    }

    #[test]
    fn test_scene_request_pins_square_aspect() {
        let req = SceneRequest {
            prompt: "A scene".into(),
            references: vec![jpeg_url()],
        };
        let body = GeminiRequest::scene(&req).unwrap();
        let config = body.generation_config.as_ref().unwrap();
        assert_eq!(config.response_modalities, vec!["IMAGE"]);
        assert_eq!(config.image_config.as_ref().unwrap().aspect_ratio, "1:1");

        // Prompt first, then references
        assert!(matches!(
            body.contents[0].parts[0],
            GeminiRequestPart::Text { .. }
        ));
        assert!(matches!(
            body.contents[0].parts[1],
            GeminiRequestPart::InlineData { .. }
        ));
    }

    #[test]
    fn test_non_data_url_reference_rejected() {
        let req = SceneRequest {
            prompt: "A scene".into(),
            references: vec!["https://example.com/a.jpg".into()],
        };
        assert!(matches!(
            GeminiRequest::scene(&req),
            Err(NanoBrandError::Decode(_))
        ));
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let req = SceneRequest {
            prompt: "p".into(),
            references: vec![jpeg_url()],
        };
        let body = GeminiRequest::scene(&req).unwrap();
        let json = serde_json::to_value(&body).unwrap();

        assert!(json.get("generationConfig").is_some());
        assert!(json.get("generation_config").is_none());
        let config = &json["generationConfig"];
        assert!(config.get("imageConfig").is_some());
        let part = &json["contents"][0]["parts"][1];
        assert!(part.get("inline_data").is_some());
    }

    #[test]
    fn test_response_with_image_part() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{
                        "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" }
                    }]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let inline = resp.candidates[0].content.as_ref().unwrap().parts[0]
            .inline_data
            .as_ref()
            .unwrap();
        assert_eq!(inline.mime_type, "image/png");
    }

    #[test]
    fn test_response_with_text_parts() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{"text": "part one "}, {"text": "part two"}] }
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let text: String = resp.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts
            .iter()
            .filter_map(|p| p.text.clone())
            .collect();
        assert_eq!(text, "part one part two");
    }

    #[test]
    fn test_safety_finish_reason_is_blocked() {
        let candidate = GeminiCandidate {
            content: None,
            finish_reason: Some("IMAGE_SAFETY".into()),
        };
        assert!(matches!(
            check_finish_reason(&candidate),
            Err(NanoBrandError::ContentBlocked(_))
        ));

        let ok = GeminiCandidate {
            content: None,
            finish_reason: Some("STOP".into()),
        };
        assert!(check_finish_reason(&ok).is_ok());
    }

    #[test]
    fn test_map_api_error() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            map_api_error(401, "bad key", &headers),
            NanoBrandError::Auth(_)
        ));
        assert!(matches!(
            map_api_error(404, "", &headers),
            NanoBrandError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_api_error(429, "", &headers),
            NanoBrandError::RateLimited { .. }
        ));
        assert!(matches!(
            map_api_error(400, "request blocked by safety system", &headers),
            NanoBrandError::ContentBlocked(_)
        ));
        assert!(matches!(
            map_api_error(500, "boom", &headers),
            NanoBrandError::Api { status: 500, .. }
        ));
    }
}
