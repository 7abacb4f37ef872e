//! Seams to the external AI: meal generation, meal replacement and product
//! analysis.
//!
//! Implemented by `niv-gemini`. Generation and replacement never fail from
//! the caller's point of view: a network or parse failure is logged by the
//! implementation and surfaces as an empty pool or `None`. Product analysis
//! does report failure, because the scanner needs it to return to a
//! retryable state.

use std::future::Future;

use crate::{meal::{Meal, MealType}, scanner::ScanResult};

pub trait MealGenerator: Send + Sync {
  /// Ask for a pool of candidate meals (nominally five per slot) for a user
  /// of `weight_kg` pursuing `goal`. Empty on any failure.
  fn generate_candidates<'a>(
    &'a self,
    goal: &'a str,
    weight_kg: f64,
  ) -> impl Future<Output = Vec<Meal>> + Send + 'a;

  /// Ask for exactly one meal for `slot`. `None` on any failure.
  fn replacement_meal<'a>(
    &'a self,
    slot: MealType,
    goal: &'a str,
    weight_kg: f64,
  ) -> impl Future<Output = Option<Meal>> + Send + 'a;
}

pub trait ProductAnalyzer: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Score a base64-encoded JPEG of a food product for a cutting goal.
  ///
  /// Implementations without a configured credential return a degraded
  /// default result instead of calling out.
  fn analyze_product<'a>(
    &'a self,
    jpeg_base64: &'a str,
  ) -> impl Future<Output = Result<ScanResult, Self::Error>> + Send + 'a;
}
