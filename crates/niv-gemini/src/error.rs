//! Error type for `niv-gemini`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no API key configured")]
  MissingApiKey,

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("gemini api error ({status}): {message}")]
  Api { status: u16, message: String },

  #[error("response contained no text")]
  EmptyResponse,

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
