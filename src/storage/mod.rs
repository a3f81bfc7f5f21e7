//! SQLite-backed settings store.
//!
//! Holds user preferences only; articles are never persisted.

mod preferences;
mod schema;
mod types;

pub use schema::Database;
pub use types::DatabaseError;
