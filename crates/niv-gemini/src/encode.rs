//! Decoding model output into core types, and image-URL construction.

use niv_core::{
  meal::{Meal, MealType},
  scanner::ScanResult,
};
use rand::Rng;
use serde::Deserialize;

use crate::Result;

// ─── Image URLs ──────────────────────────────────────────────────────────────

const IMAGE_BASE_URL: &str = "https://image.pollinations.ai/prompt";
const IMAGE_SIZE: u32 = 1024;
/// Seeds are drawn from `0..IMAGE_SEED_RANGE`.
const IMAGE_SEED_RANGE: u32 = 10_000;
const BLANK_PROMPT_FALLBACK: &str = "healthy-meal";

/// Build a food-photography URL for `image_prompt` with a fresh random seed,
/// so the same description renders differently on each call.
pub fn image_url<R: Rng + ?Sized>(image_prompt: &str, rng: &mut R) -> String {
  let description = if image_prompt.trim().is_empty() {
    BLANK_PROMPT_FALLBACK.to_owned()
  } else {
    format!(
      "Professional food photography of {image_prompt}, ultra-realistic, \
       highly detailed, cinematic lighting, gourmet plating, 8k, mouth-watering"
    )
  };
  let seed = rng.gen_range(0..IMAGE_SEED_RANGE);
  format!(
    "{IMAGE_BASE_URL}/{}?width={IMAGE_SIZE}&height={IMAGE_SIZE}&nologo=true&seed={seed}",
    urlencoding::encode(&description)
  )
}

// ─── Meals ───────────────────────────────────────────────────────────────────

/// A meal as the model returns it: nutrition plus an English image prompt
/// instead of a URL.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMeal {
  pub id:           String,
  pub name:         String,
  #[serde(rename = "type")]
  pub meal_type:    MealType,
  pub calories:     f64,
  pub protein:      f64,
  pub carbs:        f64,
  pub fat:          f64,
  #[serde(default)]
  pub description:  String,
  #[serde(default)]
  pub image_prompt: String,
}

impl GeneratedMeal {
  pub fn into_meal<R: Rng + ?Sized>(self, rng: &mut R) -> Meal {
    let image_url = image_url(&self.image_prompt, rng);
    Meal {
      id: self.id,
      name: self.name,
      meal_type: self.meal_type,
      protein: self.protein,
      carbs: self.carbs,
      fat: self.fat,
      calories: self.calories,
      description: self.description,
      image_url,
    }
  }
}

/// Decode a JSON array of generated meals.
pub fn decode_pool<R: Rng + ?Sized>(text: &str, rng: &mut R) -> Result<Vec<Meal>> {
  let raw: Vec<GeneratedMeal> = serde_json::from_str(text)?;
  Ok(raw.into_iter().map(|m| m.into_meal(rng)).collect())
}

/// Decode a single generated meal destined for `slot`.
///
/// The schema already restricts `type` to the slot's label; the slot is
/// applied regardless so the meal always matches the slot it fills.
pub fn decode_replacement<R: Rng + ?Sized>(
  text: &str,
  slot: MealType,
  rng: &mut R,
) -> Result<Meal> {
  let mut raw: GeneratedMeal = serde_json::from_str(text)?;
  if raw.meal_type != slot {
    tracing::warn!(expected = %slot, got = %raw.meal_type, "replacement meal has wrong type");
    raw.meal_type = slot;
  }
  Ok(raw.into_meal(rng))
}

// ─── Scan results ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScan {
  score:        f64,
  #[serde(default)]
  analysis:     String,
  #[serde(default)]
  product_name: String,
}

pub fn decode_scan(text: &str) -> Result<ScanResult> {
  let raw: RawScan = serde_json::from_str(text)?;
  Ok(ScanResult::new(raw.score, raw.analysis, raw.product_name))
}
