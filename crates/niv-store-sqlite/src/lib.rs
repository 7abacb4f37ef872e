//! SQLite backend for NiV's local storage.
//!
//! A single key/value table mirrors the browser storage the profile record
//! used to live in. [`tokio_rusqlite`] keeps all database access on its own
//! thread so the async runtime never blocks.

mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteProfileStore;

#[cfg(test)]
mod tests;
