//! Integration tests for `SqliteProfileStore` against SQLite databases.

use niv_core::profile::{PROFILE_KEY, ProfileSession, ProfileStore, UserProfile};

use crate::{Error, SqliteProfileStore};

async fn store() -> SqliteProfileStore {
  SqliteProfileStore::open_in_memory()
    .await
    .expect("in-memory store")
}

// ─── Key/value ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_missing_item_is_none() {
  let s = store().await;
  assert_eq!(s.get_item("nope").await.unwrap(), None);
}

#[tokio::test]
async fn set_item_overwrites() {
  let s = store().await;
  s.set_item("k", "one").await.unwrap();
  s.set_item("k", "two").await.unwrap();
  assert_eq!(s.get_item("k").await.unwrap().as_deref(), Some("two"));
}

#[tokio::test]
async fn remove_item_reports_presence() {
  let s = store().await;
  s.set_item("k", "v").await.unwrap();
  assert!(s.remove_item("k").await.unwrap());
  assert!(!s.remove_item("k").await.unwrap());
  assert_eq!(s.get_item("k").await.unwrap(), None);
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_store_loads_none() {
  let s = store().await;
  assert_eq!(s.load().await.unwrap(), None);
}

#[tokio::test]
async fn profile_is_stored_under_fixed_key_as_camel_case_json() {
  let s = store().await;
  let profile = UserProfile {
    name:         "ניב".into(),
    weight:       88.0,
    is_logged_in: true,
  };
  s.save(&profile).await.unwrap();

  let raw = s.get_item(PROFILE_KEY).await.unwrap().unwrap();
  let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
  assert_eq!(json["name"], "ניב");
  assert_eq!(json["weight"], 88.0);
  assert_eq!(json["isLoggedIn"], true);

  assert_eq!(s.load().await.unwrap(), Some(profile));
}

#[tokio::test]
async fn corrupt_record_is_a_json_error() {
  let s = store().await;
  s.set_item(PROFILE_KEY, "{not json").await.unwrap();
  assert!(matches!(s.load().await, Err(Error::Json(_))));
}

#[tokio::test]
async fn profile_survives_reopen() {
  let path = std::env::temp_dir().join(format!(
    "niv-store-test-{}.sqlite",
    std::process::id()
  ));
  let _ = std::fs::remove_file(&path);

  {
    let s = SqliteProfileStore::open(&path).await.unwrap();
    let mut session = ProfileSession::load(s).await.unwrap();
    session.register("dana", 61.5).await.unwrap();
    session.logout().await.unwrap();
  }

  let s = SqliteProfileStore::open(&path).await.unwrap();
  let session = ProfileSession::load(s).await.unwrap();
  assert_eq!(session.profile().name, "dana");
  assert_eq!(session.profile().weight, 61.5);
  assert!(!session.is_logged_in());

  let _ = std::fs::remove_file(&path);
}
