//! The single local user profile and its persistence seam.
//!
//! There is exactly one profile. [`ProfileSession`] loads it once at start-up
//! and writes it back after every mutation, awaiting the write before the
//! mutating call returns, so no read can observe a state the store has not
//! seen.

use std::{future::Future, sync::Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result};

/// The key the profile record is stored under.
pub const PROFILE_KEY: &str = "niv_user";

/// Weight assumed for a profile that has never been registered.
pub const DEFAULT_WEIGHT_KG: f64 = 90.0;

/// How far below the current weight the goal weight sits.
pub const TARGET_WEIGHT_LOSS_KG: f64 = 5.0;

// ─── UserProfile ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub name:         String,
  /// Body weight in kilograms.
  pub weight:       f64,
  pub is_logged_in: bool,
}

impl Default for UserProfile {
  fn default() -> Self {
    Self {
      name:         String::new(),
      weight:       DEFAULT_WEIGHT_KG,
      is_logged_in: false,
    }
  }
}

impl UserProfile {
  /// Goal weight shown on the dashboard.
  pub fn target_weight(&self) -> f64 { self.weight - TARGET_WEIGHT_LOSS_KG }
}

// ─── Store trait ─────────────────────────────────────────────────────────────

/// Where the profile record lives between runs.
///
/// The record is written wholesale on every save; there is no versioning or
/// migration.
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the stored profile. `None` if nothing has been saved yet.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Option<UserProfile>, Self::Error>> + Send + '_;

  /// Overwrite the stored profile.
  fn save<'a>(
    &'a self,
    profile: &'a UserProfile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

/// A [`ProfileStore`] that keeps the serialised record in memory. Used by
/// tests and when no store path is configured.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
  record: Mutex<Option<String>>,
}

impl MemoryProfileStore {
  pub fn new() -> Self { Self::default() }

  /// The raw JSON most recently saved.
  pub fn raw(&self) -> Option<String> {
    self.record.lock().map(|r| (*r).clone()).unwrap_or_default()
  }
}

impl ProfileStore for MemoryProfileStore {
  type Error = Error;

  async fn load(&self) -> Result<Option<UserProfile>> {
    let Some(raw) = self.raw() else {
      return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
  }

  async fn save(&self, profile: &UserProfile) -> Result<()> {
    let raw = serde_json::to_string(profile)?;
    if let Ok(mut record) = self.record.lock() {
      *record = Some(raw);
    }
    Ok(())
  }
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// Error from a [`ProfileSession`] mutation: either the input was rejected
/// or the store failed to persist it.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<E: std::error::Error + 'static> {
  #[error(transparent)]
  Invalid(#[from] Error),

  #[error("failed to persist profile: {0}")]
  Store(#[source] E),
}

/// The process-wide profile plus its store.
pub struct ProfileSession<S: ProfileStore> {
  store:   S,
  profile: UserProfile,
}

impl<S: ProfileStore> ProfileSession<S> {
  /// Load the stored profile, or start from [`UserProfile::default`].
  pub async fn load(store: S) -> Result<Self, S::Error> {
    let profile = store.load().await?.unwrap_or_default();
    Ok(Self { store, profile })
  }

  pub fn profile(&self) -> &UserProfile { &self.profile }

  pub fn is_logged_in(&self) -> bool { self.profile.is_logged_in }

  pub fn store(&self) -> &S { &self.store }

  /// Replace the whole profile with a new registration and log in.
  pub async fn register(
    &mut self,
    name: impl Into<String>,
    weight_kg: f64,
  ) -> Result<(), SessionError<S::Error>> {
    validate_weight(weight_kg)?;
    let name = name.into();
    info!(%name, weight_kg, "registering profile");
    self.profile = UserProfile {
      name,
      weight: weight_kg,
      is_logged_in: true,
    };
    self.persist().await
  }

  /// Log in under `name`. No credential is checked; the stored weight is
  /// kept.
  pub async fn login(
    &mut self,
    name: impl Into<String>,
  ) -> Result<(), SessionError<S::Error>> {
    self.profile.name = name.into();
    self.profile.is_logged_in = true;
    info!(name = %self.profile.name, "logged in");
    self.persist().await
  }

  /// Clear the logged-in flag. Name and weight stay in the stored record.
  pub async fn logout(&mut self) -> Result<(), SessionError<S::Error>> {
    self.profile.is_logged_in = false;
    info!("logged out");
    self.persist().await
  }

  pub async fn set_name(
    &mut self,
    name: impl Into<String>,
  ) -> Result<(), SessionError<S::Error>> {
    self.profile.name = name.into();
    self.persist().await
  }

  pub async fn set_weight(
    &mut self,
    weight_kg: f64,
  ) -> Result<(), SessionError<S::Error>> {
    validate_weight(weight_kg)?;
    self.profile.weight = weight_kg;
    self.persist().await
  }

  async fn persist(&self) -> Result<(), SessionError<S::Error>> {
    self
      .store
      .save(&self.profile)
      .await
      .map_err(SessionError::Store)
  }
}

fn validate_weight(weight_kg: f64) -> Result<()> {
  if weight_kg.is_finite() && weight_kg > 0.0 {
    Ok(())
  } else {
    Err(Error::InvalidWeight(weight_kg))
  }
}
