//! [`GeminiClient`]: the Gemini implementation of the core AI seams.

use std::{
  sync::{Mutex, PoisonError},
  time::Duration,
};

use niv_core::{
  generator::{MealGenerator, ProductAnalyzer},
  meal::{Meal, MealType},
  scanner::ScanResult,
};
use rand::{SeedableRng, rngs::StdRng};
use reqwest::Client;
use tracing::{debug, error, info, instrument, warn};

use crate::{
  Error, Result,
  encode::{decode_pool, decode_replacement, decode_scan},
  schema,
  wire::{GenerateContentRequest, GenerateContentResponse, InlineData, Part},
};

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

pub const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const API_KEY_HEADER: &str = "x-goog-api-key";

// ─── Config ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GeminiConfig {
  /// `None` (or empty) disables every call; see the trait impls.
  pub api_key:  Option<String>,
  pub model:    String,
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for GeminiConfig {
  fn default() -> Self {
    Self {
      api_key:  None,
      model:    DEFAULT_MODEL.to_owned(),
      base_url: API_BASE_URL.to_owned(),
      timeout:  Duration::from_secs(60),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async client for the `generateContent` endpoint.
///
/// Holds its own randomness source for image seeds; seed it with
/// [`GeminiClient::with_seed`] for reproducible URLs.
pub struct GeminiClient {
  client: Client,
  config: GeminiConfig,
  rng:    Mutex<StdRng>,
}

impl GeminiClient {
  pub fn new(config: GeminiConfig) -> Result<Self> {
    let client = Client::builder().timeout(config.timeout).build()?;
    Ok(Self {
      client,
      config,
      rng: Mutex::new(StdRng::from_entropy()),
    })
  }

  /// Replace the randomness source with a seeded one.
  pub fn with_seed(mut self, seed: u64) -> Self {
    self.rng = Mutex::new(StdRng::seed_from_u64(seed));
    self
  }

  pub fn has_api_key(&self) -> bool { self.api_key().is_some() }

  fn api_key(&self) -> Option<&str> {
    self.config.api_key.as_deref().filter(|k| !k.trim().is_empty())
  }

  fn url(&self) -> String {
    format!(
      "{}/models/{}:generateContent",
      self.config.base_url.trim_end_matches('/'),
      self.config.model,
    )
  }

  fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
    let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut rng)
  }

  /// Send one request and return the model's text output.
  ///
  /// The key travels in the `x-goog-api-key` header, and transport errors are
  /// stripped of their URL before they reach logs.
  async fn generate(&self, request: &GenerateContentRequest) -> Result<String> {
    let api_key = self.api_key().ok_or(Error::MissingApiKey)?;

    let resp = self
      .client
      .post(self.url())
      .header(API_KEY_HEADER, api_key)
      .json(request)
      .send()
      .await
      .map_err(|e| Error::Http(e.without_url()))?;

    let status = resp.status();
    let body = resp
      .text()
      .await
      .map_err(|e| Error::Http(e.without_url()))?;

    if !status.is_success() {
      let message = serde_json::from_str::<GenerateContentResponse>(&body)
        .ok()
        .and_then(|r| r.error)
        .map_or(body, |e| e.message);
      return Err(Error::Api {
        status: status.as_u16(),
        message,
      });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
    if let Some(err) = parsed.error {
      return Err(Error::Api {
        status: status.as_u16(),
        message: err.message,
      });
    }
    let text = parsed.text().ok_or(Error::EmptyResponse)?;
    debug!(bytes = text.len(), "received model output");
    Ok(text)
  }

  // ── Fallible operations ───────────────────────────────────────────────────

  /// Request a candidate pool. Errors are returned as-is; the
  /// [`MealGenerator`] impl is the swallowing boundary.
  #[instrument(skip(self), fields(model = %self.config.model))]
  pub async fn try_generate_candidates(
    &self,
    goal: &str,
    weight_kg: f64,
  ) -> Result<Vec<Meal>> {
    let request = GenerateContentRequest::json(
      vec![Part::Text { text: schema::pool_prompt(goal, weight_kg) }],
      Some(schema::meal_pool()),
    );
    let text = self.generate(&request).await?;
    self.with_rng(|rng| decode_pool(&text, rng))
  }

  #[instrument(skip(self), fields(model = %self.config.model))]
  pub async fn try_replacement_meal(
    &self,
    slot: MealType,
    goal: &str,
    weight_kg: f64,
  ) -> Result<Meal> {
    let request = GenerateContentRequest::json(
      vec![Part::Text {
        text: schema::replacement_prompt(slot, goal, weight_kg),
      }],
      Some(schema::meal_object(&[slot])),
    );
    let text = self.generate(&request).await?;
    self.with_rng(|rng| decode_replacement(&text, slot, rng))
  }

  #[instrument(skip(self, jpeg_base64), fields(model = %self.config.model, bytes = jpeg_base64.len()))]
  pub async fn try_analyze_product(&self, jpeg_base64: &str) -> Result<ScanResult> {
    let request = GenerateContentRequest::json(
      vec![
        Part::InlineData {
          inline_data: InlineData {
            mime_type: "image/jpeg".into(),
            data:      jpeg_base64.to_owned(),
          },
        },
        Part::Text { text: schema::ANALYSIS_PROMPT.to_owned() },
      ],
      Some(schema::scan_result()),
    );
    let text = self.generate(&request).await?;
    decode_scan(&text)
  }
}

// ─── Core seams ──────────────────────────────────────────────────────────────

impl MealGenerator for GeminiClient {
  async fn generate_candidates(&self, goal: &str, weight_kg: f64) -> Vec<Meal> {
    match self.try_generate_candidates(goal, weight_kg).await {
      Ok(meals) => {
        info!(count = meals.len(), "generated meal candidates");
        meals
      }
      Err(Error::MissingApiKey) => {
        warn!("no API key configured; skipping meal generation");
        Vec::new()
      }
      Err(e) => {
        error!(error = %e, "failed to generate meal candidates");
        Vec::new()
      }
    }
  }

  async fn replacement_meal(
    &self,
    slot: MealType,
    goal: &str,
    weight_kg: f64,
  ) -> Option<Meal> {
    match self.try_replacement_meal(slot, goal, weight_kg).await {
      Ok(meal) => {
        info!(slot = %slot, name = %meal.name, "replacement meal generated");
        Some(meal)
      }
      Err(Error::MissingApiKey) => {
        warn!("no API key configured; skipping meal replacement");
        None
      }
      Err(e) => {
        error!(error = %e, slot = %slot, "failed to fetch replacement meal");
        None
      }
    }
  }
}

impl ProductAnalyzer for GeminiClient {
  type Error = Error;

  async fn analyze_product(&self, jpeg_base64: &str) -> Result<ScanResult> {
    if !self.has_api_key() {
      warn!("no API key configured; returning default scan result");
      return Ok(ScanResult::unavailable());
    }
    self.try_analyze_product(jpeg_base64).await
  }
}
