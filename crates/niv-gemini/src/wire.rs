//! Request and response bodies for `models/{model}:generateContent`.

use serde::{Deserialize, Serialize};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
  pub contents:          Vec<Content>,
  pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
  pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Part {
  Text {
    text: String,
  },
  InlineData {
    #[serde(rename = "inlineData")]
    inline_data: InlineData,
  },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
  pub mime_type: String,
  /// Base64 payload.
  pub data:      String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
  pub response_mime_type: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub response_schema:    Option<serde_json::Value>,
}

impl GenerateContentRequest {
  /// A single-turn request asking for JSON, optionally schema-constrained.
  pub fn json(parts: Vec<Part>, schema: Option<serde_json::Value>) -> Self {
    Self {
      contents:          vec![Content { parts }],
      generation_config: GenerationConfig {
        response_mime_type: "application/json",
        response_schema:    schema,
      },
    }
  }
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
  #[serde(default)]
  pub candidates: Vec<Candidate>,
  pub error:      Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
  pub content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseContent {
  #[serde(default)]
  pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
  pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
  pub message: String,
}

impl GenerateContentResponse {
  /// Concatenated text of the first candidate, if it has any.
  pub fn text(&self) -> Option<String> {
    let parts = &self.candidates.first()?.content.as_ref()?.parts;
    let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    (!text.is_empty()).then_some(text)
  }
}
