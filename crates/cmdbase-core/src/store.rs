//! Document store abstraction
//!
//! Generic document operations over named collections: filtered find with
//! pagination/sort/projection, count, insert, bulk update, bulk delete, and
//! per-collection identity sequences. Each call is individually atomic at
//! the store level; a sequence of calls is not, and the CRUD core documents
//! where that matters.
//!
//! [`MemoryStore`] is the bundled in-memory implementation used by tests;
//! `cmdbase-store` provides the SQLite-backed one.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::errors::Result;
use crate::filter;
use crate::model::Document;

/// Options for a find call
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Number of matches to skip
    pub start: u64,
    /// Maximum matches to return; 0 means unbounded
    pub limit: u64,
    /// Sort field, `-` prefix for descending
    pub sort: Option<String>,
    /// Field projection; empty returns whole documents
    pub fields: Vec<String>,
}

impl FindOptions {
    /// Return every match, unprojected, in store order
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict returned documents to the given fields
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Skip `start` matches and return at most `limit`
    pub fn with_page(mut self, start: u64, limit: u64) -> Self {
        self.start = start;
        self.limit = limit;
        self
    }

    /// Sort matches by the given field (`-` prefix for descending)
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }
}

/// Generic document operations over named collections
///
/// Conditions use the semantics of [`crate::filter`]: equality, `$in`, and
/// dotted paths. Patches merge field-by-field into matching documents.
pub trait DocStore {
    /// Find documents matching a condition
    fn find(
        &self,
        collection: &str,
        condition: &Document,
        options: &FindOptions,
    ) -> Result<Vec<Document>>;

    /// Count documents matching a condition
    fn count(&self, collection: &str, condition: &Document) -> Result<u64>;

    /// Insert one document
    fn insert(&mut self, collection: &str, document: Document) -> Result<()>;

    /// Merge a patch into every matching document, returning the match count
    fn update_many(
        &mut self,
        collection: &str,
        condition: &Document,
        patch: &Document,
    ) -> Result<u64>;

    /// Delete every matching document, returning the removed count
    fn delete_many(&mut self, collection: &str, condition: &Document) -> Result<u64>;

    /// Allocate the next identity from the collection's sequence
    fn next_id(&mut self, collection: &str) -> Result<u64>;
}

/// Merge a patch into a document, field by field
///
/// Top-level fields are replaced wholesale; nested mappings are not merged
/// recursively, matching single-level document update semantics.
pub fn apply_patch(document: &mut Document, patch: &Document) {
    for (key, value) in patch {
        document.insert(key.clone(), value.clone());
    }
}

/// Project a document down to the requested fields
///
/// An empty field list returns the document unchanged.
pub fn project(document: &Document, fields: &[String]) -> Document {
    if fields.is_empty() {
        return document.clone();
    }
    let mut projected = Document::new();
    for field in fields {
        if let Some(value) = document.get(field) {
            projected.insert(field.clone(), value.clone());
        }
    }
    projected
}

/// Sort documents by a single field, `-` prefix for descending
///
/// Numbers order numerically, strings lexicographically; documents missing
/// the field sort last. The sort is stable so equal keys keep store order.
pub fn sort_documents(documents: &mut [Document], sort: &str) {
    let (field, descending) = match sort.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (sort, false),
    };
    documents.sort_by(|a, b| {
        let ordering = compare_values(a.get(field), b.get(field));
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Number(x), Value::Number(y)) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Value::String(x), Value::String(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
    }
}

/// Apply skip/limit/sort/projection to an already-filtered match set
///
/// Shared by store implementations that evaluate filters in process.
pub fn page_and_project(mut matches: Vec<Document>, options: &FindOptions) -> Vec<Document> {
    if let Some(sort) = &options.sort {
        sort_documents(&mut matches, sort);
    }
    let start = options.start.min(matches.len() as u64) as usize;
    let mut page: Vec<Document> = matches.split_off(start);
    if options.limit > 0 && page.len() as u64 > options.limit {
        page.truncate(options.limit as usize);
    }
    if !options.fields.is_empty() {
        page = page
            .iter()
            .map(|document| project(document, &options.fields))
            .collect();
    }
    page
}

/// In-memory document store
///
/// HashMap-backed collections with per-collection identity sequences. Not
/// thread-safe; designed for single-request use and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Document>>,
    sequences: HashMap<String, u64>,
}

impl MemoryStore {
    /// Create a new empty MemoryStore
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in a collection
    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, Vec::len)
    }

    fn matching(&self, collection: &str, condition: &Document) -> Vec<Document> {
        self.collections
            .get(collection)
            .into_iter()
            .flatten()
            .filter(|document| filter::matches(document, condition))
            .cloned()
            .collect()
    }
}

impl DocStore for MemoryStore {
    fn find(
        &self,
        collection: &str,
        condition: &Document,
        options: &FindOptions,
    ) -> Result<Vec<Document>> {
        Ok(page_and_project(
            self.matching(collection, condition),
            options,
        ))
    }

    fn count(&self, collection: &str, condition: &Document) -> Result<u64> {
        Ok(self.matching(collection, condition).len() as u64)
    }

    fn insert(&mut self, collection: &str, document: Document) -> Result<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    fn update_many(
        &mut self,
        collection: &str,
        condition: &Document,
        patch: &Document,
    ) -> Result<u64> {
        let mut count = 0;
        for document in self.collections.entry(collection.to_string()).or_default() {
            if filter::matches(document, condition) {
                apply_patch(document, patch);
                count += 1;
            }
        }
        Ok(count)
    }

    fn delete_many(&mut self, collection: &str, condition: &Document) -> Result<u64> {
        let documents = self.collections.entry(collection.to_string()).or_default();
        let before = documents.len();
        documents.retain(|document| !filter::matches(document, condition));
        Ok((before - documents.len()) as u64)
    }

    fn next_id(&mut self, collection: &str) -> Result<u64> {
        let next = self.sequences.entry(collection.to_string()).or_insert(0);
        *next += 1;
        Ok(*next)
    }
}
