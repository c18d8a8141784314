//! SQLite document store
//!
//! One `documents` table holds every collection's documents as JSON rows;
//! a `sequences` table backs per-collection identity allocation. Filters
//! are evaluated in process with `cmdbase_core::filter`, so the condition
//! semantics (equality, `$in`, dotted paths) match the in-memory store
//! exactly. Bulk updates and deletes run inside one transaction, keeping
//! each store call individually atomic.

use std::path::Path;

use rusqlite::{params, Connection};

use cmdbase_core::errors::Result;
use cmdbase_core::filter;
use cmdbase_core::model::Document;
use cmdbase_core::store::{apply_patch, page_and_project, DocStore, FindOptions};

use crate::db;
use crate::errors::{from_rusqlite, from_serde};

/// SQLite-backed document store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        tracing::debug!(path = %path.as_ref().display(), "opening sqlite document store");
        let conn = db::open(path)?;
        db::configure(&conn)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        db::configure(&conn)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS documents (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     collection TEXT NOT NULL,
                     body TEXT NOT NULL
                 );
                 CREATE INDEX IF NOT EXISTS idx_documents_collection
                     ON documents(collection);
                 CREATE TABLE IF NOT EXISTS sequences (
                     collection TEXT PRIMARY KEY,
                     next INTEGER NOT NULL
                 );",
            )
            .map_err(|err| from_rusqlite("init_schema", err))
    }

    /// Load a collection's matching documents with their row ids, in
    /// insertion order
    fn load_matching(
        &self,
        collection: &str,
        condition: &Document,
    ) -> Result<Vec<(i64, Document)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, body FROM documents WHERE collection = ?1 ORDER BY id")
            .map_err(|err| from_rusqlite("find", err))?;
        let rows = stmt
            .query_map([collection], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
            })
            .map_err(|err| from_rusqlite("find", err))?;

        let mut matching = Vec::new();
        for row in rows {
            let (id, body) = row.map_err(|err| from_rusqlite("find", err))?;
            let document: Document =
                serde_json::from_str(&body).map_err(|err| from_serde("find", err))?;
            if filter::matches(&document, condition) {
                matching.push((id, document));
            }
        }
        Ok(matching)
    }
}

impl DocStore for SqliteStore {
    fn find(
        &self,
        collection: &str,
        condition: &Document,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        let matching = self
            .load_matching(collection, condition)?
            .into_iter()
            .map(|(_, document)| document)
            .collect();
        Ok(page_and_project(matching, options))
    }

    fn count(&self, collection: &str, condition: &Document) -> Result<u64> {
        Ok(self.load_matching(collection, condition)?.len() as u64)
    }

    fn insert(&mut self, collection: &str, document: Document) -> Result<()> {
        let body = serde_json::to_string(&document).map_err(|err| from_serde("insert", err))?;
        self.conn
            .execute(
                "INSERT INTO documents (collection, body) VALUES (?1, ?2)",
                params![collection, body],
            )
            .map_err(|err| from_rusqlite("insert", err))?;
        Ok(())
    }

    fn update_many(
        &mut self,
        collection: &str,
        condition: &Document,
        patch: &Document,
    ) -> Result<u64> {
        let matching = self.load_matching(collection, condition)?;
        let tx = self
            .conn
            .transaction()
            .map_err(|err| from_rusqlite("update_many", err))?;
        for (id, mut document) in matching.iter().cloned() {
            apply_patch(&mut document, patch);
            let body =
                serde_json::to_string(&document).map_err(|err| from_serde("update_many", err))?;
            tx.execute(
                "UPDATE documents SET body = ?1 WHERE id = ?2",
                params![body, id],
            )
            .map_err(|err| from_rusqlite("update_many", err))?;
        }
        tx.commit().map_err(|err| from_rusqlite("update_many", err))?;
        Ok(matching.len() as u64)
    }

    fn delete_many(&mut self, collection: &str, condition: &Document) -> Result<u64> {
        let matching = self.load_matching(collection, condition)?;
        let tx = self
            .conn
            .transaction()
            .map_err(|err| from_rusqlite("delete_many", err))?;
        for (id, _) in &matching {
            tx.execute("DELETE FROM documents WHERE id = ?1", [id])
                .map_err(|err| from_rusqlite("delete_many", err))?;
        }
        tx.commit().map_err(|err| from_rusqlite("delete_many", err))?;
        Ok(matching.len() as u64)
    }

    fn next_id(&mut self, collection: &str) -> Result<u64> {
        self.conn
            .query_row(
                "INSERT INTO sequences (collection, next) VALUES (?1, 1)
                 ON CONFLICT(collection) DO UPDATE SET next = next + 1
                 RETURNING next",
                [collection],
                |row| row.get::<_, i64>(0),
            )
            .map(|next| next as u64)
            .map_err(|err| from_rusqlite("next_id", err))
    }
}
