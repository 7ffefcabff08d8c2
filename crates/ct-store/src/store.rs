//! The store trait and its shared vocabulary.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::document::{cmp_values, get_path};
use crate::{Document, Filter, Patch};

/// The three logical collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Problems,
    Notes,
}

impl Collection {
    /// Collection name as stored.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Problems => "problems",
            Self::Notes => "notes",
        }
    }
}

/// Sort specification for [`DocStore::find`].
#[derive(Debug, Clone)]
pub struct Sort {
    pub field: String,
    pub ascending: bool,
}

impl Sort {
    /// Ascending sort on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ascending: true,
        }
    }
}

/// Sort documents in place by the value at the sort field; documents without
/// the field sort first (missing reads as null).
pub fn sort_documents(docs: &mut [Document], sort: &Sort) {
    docs.sort_by(|a, b| {
        let av = get_path(a, &sort.field).unwrap_or(&Value::Null);
        let bv = get_path(b, &sort.field).unwrap_or(&Value::Null);
        let ord = cmp_values(av, bv);
        if sort.ascending { ord } else { ord.reverse() }
    });
}

/// Outcome of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Store-level failure.
///
/// Everything transport-shaped (connectivity loss, timeouts, backend errors)
/// lands in `Unavailable`: the retryable I/O class. Callers decide whether to
/// fail the request or degrade a read to empty.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Narrow async interface over the document store.
///
/// All operations are collection-scoped; none of them reach across
/// collections. `update_one` and `upsert_one` evaluate their filter and apply
/// their patch as one atomic step, which is what makes conditional updates
/// (compare-and-set on a prior field value) safe against concurrent writers.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// All documents matching `filter`, optionally sorted.
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError>;

    /// The first document matching `filter`.
    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError>;

    /// Insert a new document.
    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<(), StoreError>;

    /// Patch the first document matching `filter`. Returns whether one matched.
    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<bool, StoreError>;

    /// Patch the first document matching `filter`, or insert a new one seeded
    /// from the filter's equality conditions (see [`Filter::seed`]).
    async fn upsert_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<UpsertOutcome, StoreError>;

    /// Distinct string values of `field` across the collection; array fields
    /// contribute their elements.
    async fn distinct(
        &self,
        collection: Collection,
        field: &str,
    ) -> Result<BTreeSet<String>, StoreError>;

    /// Number of documents matching `filter`.
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;
}
