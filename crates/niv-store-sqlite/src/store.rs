//! [`SqliteProfileStore`]: the SQLite implementation of [`ProfileStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::debug;

use niv_core::profile::{PROFILE_KEY, ProfileStore, UserProfile};

use crate::{Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Key/value storage in a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteProfileStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteProfileStore {
  /// Open (or create) the database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store. Nothing survives the process.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Raw key/value access ──────────────────────────────────────────────────

  pub async fn get_item(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();
    let value = self
      .conn
      .call(move |conn| {
        let value = conn
          .query_row(
            "SELECT value FROM local_storage WHERE key = ?1",
            rusqlite::params![key],
            |r| r.get(0),
          )
          .optional()?;
        Ok(value)
      })
      .await?;
    Ok(value)
  }

  /// Insert or overwrite the value under `key`.
  pub async fn set_item(&self, key: &str, value: &str) -> Result<()> {
    let key = key.to_owned();
    let value = value.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
           ON CONFLICT(key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Delete `key`. Returns whether anything was removed.
  pub async fn remove_item(&self, key: &str) -> Result<bool> {
    let key = key.to_owned();
    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM local_storage WHERE key = ?1",
          rusqlite::params![key],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteProfileStore {
  type Error = crate::Error;

  async fn load(&self) -> Result<Option<UserProfile>> {
    let Some(raw) = self.get_item(PROFILE_KEY).await? else {
      debug!("no stored profile");
      return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
  }

  async fn save(&self, profile: &UserProfile) -> Result<()> {
    let raw = serde_json::to_string(profile)?;
    self.set_item(PROFILE_KEY, &raw).await?;
    debug!(logged_in = profile.is_logged_in, "profile saved");
    Ok(())
  }
}
