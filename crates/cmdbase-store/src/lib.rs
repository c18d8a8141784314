//! SQLite-backed document store for cmdbase
//!
//! Persists collections of JSON documents in a single SQLite database and
//! implements `cmdbase_core::store::DocStore`, so the instance CRUD core
//! runs unchanged against it. Filter evaluation is shared with the core
//! (`cmdbase_core::filter`), keeping condition semantics identical to the
//! in-memory store.

pub mod db;
pub mod errors;
pub mod sqlite;

pub use sqlite::SqliteStore;
