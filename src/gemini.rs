use crate::models::{BrandStrategy, UserInput};
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use reqwest::Client;
use tracing::{info, error};

const STRATEGY_MODEL: &str = "gemini-3-flash-preview";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")] Http(String),
    #[error("response did not match the strategy schema: {0}")] Schema(String),
    #[error("no image data in response")] NoImage,
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String) -> Self {
        Self { client: Client::new(), api_key, base_url }
    }

    /// One text-generation call returning a schema-constrained BrandStrategy.
    /// Single attempt; transport and parse failures propagate immediately.
    pub async fn generate_strategy(&self, input: &UserInput) -> Result<BrandStrategy, GeminiError> {
        let prompt = build_strategy_prompt(input);
        let request_body = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": strategy_response_schema()
            }
        });

        let text = self.post_generate(STRATEGY_MODEL, &request_body).await?;
        info!("📥 Strategy response ({} chars)", text.len());
        parse_strategy_text(&text)
    }

    /// One image-generation call. Returns the first inline image part as a
    /// base64 PNG data URI, or NoImage if the response carries none.
    pub async fn generate_image(&self, visual_prompt: &str) -> Result<String, GeminiError> {
        let request_body = json!({
            "contents": [{
                "parts": [{"text": build_image_prompt(visual_prompt)}]
            }],
            "generationConfig": {
                "responseModalities": ["TEXT", "IMAGE"],
                "imageConfig": {
                    "aspectRatio": "16:9"
                }
            }
        });

        let body = self.post_raw(IMAGE_MODEL, &request_body).await?;
        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| GeminiError::Http(format!("unreadable image response: {}", e)))?;

        match extract_image_data_uri(&parsed) {
            Some(uri) => {
                info!("🖼️ Extracted inline image ({} chars)", uri.len());
                Ok(uri)
            }
            None => {
                error!("⚠️ No inline image data found in response");
                Err(GeminiError::NoImage)
            }
        }
    }

    /// POST to generateContent and return the first text part.
    async fn post_generate(&self, model: &str, body: &serde_json::Value) -> Result<String, GeminiError> {
        let response_text = self.post_raw(model, body).await?;
        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Schema(format!("unreadable response envelope: {}", e)))?;
        first_text_part(&parsed)
            .ok_or_else(|| GeminiError::Schema("no text content in response".into()))
    }

    async fn post_raw(&self, model: &str, body: &serde_json::Value) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent?key={}", self.base_url, model, self.api_key);
        info!("🔗 Calling {}", url.replace(&self.api_key, "***"));

        let response = self.client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!("❌ API error response: status={} body={}", status, error_body);
            return Err(GeminiError::Http(format!("status={} body={}", status, error_body)));
        }

        response.text().await.map_err(|e| GeminiError::Http(e.to_string()))
    }
}

/// Prompt for the strategy call, embedding all five questionnaire fields
/// verbatim plus fixed instructions for the archetype axes and the visual
/// prompt that feeds the image call.
pub fn build_strategy_prompt(input: &UserInput) -> String {
    format!(
        "Generate a comprehensive personal brand strategy for:\n\
         Name: {}\n\
         Industry: {}\n\
         Experience: {}\n\
         Goals: {}\n\
         Preferred Tone: {}\n\n\
         The strategy should include a radar-chart friendly set of 5 archetypes \
         (e.g., Hero, Sage, Creator, Ruler, Outlaw) with scores from 0-100. \
         Also include a vivid visual prompt for an AI image generator to create \
         a professional brand conceptual background image.",
        input.name, input.industry, input.experience, input.goals, input.tone
    )
}

/// Fixed stylistic frame around the strategy's visual prompt.
pub fn build_image_prompt(visual_prompt: &str) -> String {
    format!(
        "A high-end, professional, minimalist aesthetic background for a personal \
         brand identity. Concept: {}. Cinematic lighting, 4k, clean composition, artistic.",
        visual_prompt
    )
}

/// Schema sent with the strategy request so the model answers in the exact
/// shape `BrandStrategy` deserializes from.
fn strategy_response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "tagline": {"type": "STRING"},
            "bio": {"type": "STRING"},
            "mission": {"type": "STRING"},
            "archetypes": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "subject": {"type": "STRING"},
                        "value": {"type": "NUMBER"}
                    },
                    "required": ["subject", "value"]
                }
            },
            "strategySteps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": {"type": "STRING"},
                        "description": {"type": "STRING"}
                    },
                    "required": ["title", "description"]
                }
            },
            "visualPrompt": {"type": "STRING"}
        },
        "required": ["tagline", "bio", "mission", "archetypes", "strategySteps", "visualPrompt"]
    })
}

/// Parse the model's text payload as a BrandStrategy after trimming
/// surrounding whitespace. No field-level recovery.
pub fn parse_strategy_text(text: &str) -> Result<BrandStrategy, GeminiError> {
    serde_json::from_str(text.trim()).map_err(|e| GeminiError::Schema(e.to_string()))
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Part {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData
    },
    Text { text: String },
    Other(serde_json::Value),
}

#[derive(Debug, Deserialize)]
struct InlineData {
    data: String,
    #[serde(rename = "mimeType")]
    #[allow(dead_code)]
    mime_type: String,
}

fn first_text_part(resp: &GeminiResponse) -> Option<String> {
    for c in &resp.candidates {
        for p in &c.content.parts {
            if let Part::Text { text } = p {
                return Some(text.clone());
            }
        }
    }
    None
}

/// Scan content parts in order; the first inlineData part wins.
pub fn extract_image_data_uri(resp: &GeminiResponse) -> Option<String> {
    for c in &resp.candidates {
        for p in &c.content.parts {
            if let Part::Inline { inline_data } = p {
                return Some(format!("data:image/png;base64,{}", inline_data.data));
            }
        }
    }
    None
}
