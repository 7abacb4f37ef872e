//! Error types for `niv-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("weight must be a positive number of kilograms, got {0}")]
  InvalidWeight(f64),

  #[error("camera unavailable: {0}")]
  CameraUnavailable(String),

  #[error("failed to grab camera frame: {0}")]
  FrameCapture(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
