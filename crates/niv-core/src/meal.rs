//! Meal types: the unit the AI produces and the plan is built from.
//!
//! A meal is immutable once created. Swapping a meal out of the plan replaces
//! the whole value; no field is ever edited in place.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── MealType ────────────────────────────────────────────────────────────────

/// One of the four daily slots. The serialised form is the Hebrew label the
/// AI schema enumerates, so candidates can be deserialised directly.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum MealType {
  #[serde(rename = "ארוחת בוקר")]
  Breakfast,
  #[serde(rename = "ארוחת צהריים")]
  Lunch,
  #[serde(rename = "ארוחת ערב")]
  Dinner,
  #[serde(rename = "נשנוש")]
  Snack,
}

impl MealType {
  /// All slots in display order.
  pub const ALL: [MealType; 4] =
    [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

  /// The Hebrew label; identical to the serde representation.
  pub fn label(self) -> &'static str {
    match self {
      Self::Breakfast => "ארוחת בוקר",
      Self::Lunch => "ארוחת צהריים",
      Self::Dinner => "ארוחת ערב",
      Self::Snack => "נשנוש",
    }
  }

  /// Position of the slot within [`MealType::ALL`].
  pub fn index(self) -> usize {
    match self {
      Self::Breakfast => 0,
      Self::Lunch => 1,
      Self::Dinner => 2,
      Self::Snack => 3,
    }
  }

  /// Inverse of [`MealType::label`].
  pub fn from_label(label: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|t| t.label() == label)
  }
}

impl fmt::Display for MealType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ─── Meal ────────────────────────────────────────────────────────────────────

/// Shown when a meal's generated image cannot be loaded.
pub const FALLBACK_IMAGE_URL: &str = "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?ixlib=rb-4.0.3&auto=format&fit=crop&w=800&q=80";

/// A single meal suggestion with its nutrition numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
  /// Opaque identifier chosen by the AI; not guaranteed unique.
  pub id:          String,
  pub name:        String,
  #[serde(rename = "type")]
  pub meal_type:   MealType,
  /// Grams.
  pub protein:     f64,
  /// Grams.
  pub carbs:       f64,
  /// Grams.
  pub fat:         f64,
  /// Kilocalories.
  pub calories:    f64,
  pub description: String,
  pub image_url:   String,
}

impl Meal {
  /// The image to display, falling back when no URL was produced.
  pub fn display_image_url(&self) -> &str {
    if self.image_url.trim().is_empty() {
      FALLBACK_IMAGE_URL
    } else {
      &self.image_url
    }
  }
}
