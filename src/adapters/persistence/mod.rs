//! Persistence adapters. SQLite-backed stores.

pub mod sqlite_store;

pub use sqlite_store::SqliteStore;
