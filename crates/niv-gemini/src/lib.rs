//! Gemini backend for the NiV meal and product seams.
//!
//! [`GeminiClient`] implements [`niv_core::generator::MealGenerator`] and
//! [`niv_core::generator::ProductAnalyzer`] on top of the `generateContent`
//! endpoint, asking for schema-constrained JSON and decoding it into core
//! types.

mod client;
mod encode;
mod schema;
mod wire;

pub mod error;

pub use client::{API_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiConfig};
pub use encode::image_url;
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
