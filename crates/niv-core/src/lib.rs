//! Core types and trait definitions for the NiV fitness companion.
//!
//! This crate is free of HTTP and database dependencies. The AI client
//! (`niv-gemini`), the local store (`niv-store-sqlite`) and the terminal UI
//! (`niv-cli`) all depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod activity;
pub mod error;
pub mod generator;
pub mod macros;
pub mod meal;
pub mod plan;
pub mod profile;
pub mod scanner;

pub use error::{Error, Result};

/// The goal label sent to the AI with every meal request ("cutting").
pub const DEFAULT_GOAL: &str = "חיטוב";
