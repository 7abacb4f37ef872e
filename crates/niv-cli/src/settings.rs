//! Runtime settings: TOML file layered under `NIV_*` environment variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use niv_gemini::{API_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use serde::Deserialize;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/niv/config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Gemini API key. Without one every AI feature returns empty results.
  #[serde(default)]
  pub api_key:              Option<String>,
  #[serde(default = "default_model")]
  pub model:                String,
  #[serde(default = "default_api_base_url")]
  pub api_base_url:         String,
  #[serde(default = "default_store_path")]
  pub store_path:           PathBuf,
  /// JPEG kept up to date by an external capture tool.
  #[serde(default = "default_camera_frame")]
  pub camera_frame:         PathBuf,
  #[serde(default = "default_log_file")]
  pub log_file:             PathBuf,
  #[serde(default = "default_request_timeout_secs")]
  pub request_timeout_secs: u64,
}

fn default_model() -> String { DEFAULT_MODEL.to_owned() }
fn default_api_base_url() -> String { API_BASE_URL.to_owned() }
fn default_store_path() -> PathBuf { "~/.local/share/niv/niv.sqlite".into() }
fn default_camera_frame() -> PathBuf { "~/.cache/niv/frame.jpg".into() }
fn default_log_file() -> PathBuf { "~/.cache/niv/niv.log".into() }
fn default_request_timeout_secs() -> u64 { 60 }

impl Settings {
  /// Read `path` (optional) and the environment. Paths come back with `~`
  /// expanded.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(expand_tilde(path)).required(false))
      .add_source(config::Environment::with_prefix("NIV"))
      .build()
      .context("failed to read config")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.expand_paths();
    Ok(settings)
  }

  pub fn expand_paths(&mut self) {
    self.store_path = expand_tilde(&self.store_path);
    self.camera_frame = expand_tilde(&self.camera_frame);
    self.log_file = expand_tilde(&self.log_file);
  }

  pub fn gemini(&self) -> GeminiConfig {
    GeminiConfig {
      api_key:  self.api_key.clone().filter(|k| !k.trim().is_empty()),
      model:    self.model.clone(),
      base_url: self.api_base_url.clone(),
      timeout:  Duration::from_secs(self.request_timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
