//! In-memory backend.
//!
//! Used by tests and by storeless development runs. Every write operation
//! holds the collection write lock for its whole filter-check-and-patch
//! cycle, so `update_one` and `upsert_one` are atomic with respect to each
//! other without further coordination.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{collect_distinct, get_path};
use crate::store::{Collection, DocStore, Sort, StoreError, UpsertOutcome, sort_documents};
use crate::{Document, Filter, Patch};

/// A document store kept entirely in process memory.
#[derive(Debug, Default)]
pub struct MemStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocStore for MemStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let mut docs: Vec<Document> = collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default();
        if let Some(sort) = sort {
            sort_documents(&mut docs, sort);
        }
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections.entry(collection).or_default().push(doc);
        Ok(())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        match docs.iter_mut().find(|doc| filter.matches(doc)) {
            Some(doc) => {
                patch.apply(doc);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        match docs.iter_mut().find(|doc| filter.matches(doc)) {
            Some(doc) => {
                patch.apply(doc);
                Ok(UpsertOutcome::Updated)
            }
            None => {
                let mut doc = filter.seed();
                patch.apply(&mut doc);
                docs.push(doc);
                Ok(UpsertOutcome::Inserted)
            }
        }
    }

    async fn distinct(
        &self,
        collection: Collection,
        field: &str,
    ) -> Result<BTreeSet<String>, StoreError> {
        let collections = self.collections.read().await;
        let mut out = BTreeSet::new();
        if let Some(docs) = collections.get(&collection) {
            for doc in docs {
                if let Some(value) = get_path(doc, field) {
                    collect_distinct(value, &mut out);
                }
            }
        }
        Ok(out)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).count() as u64)
            .unwrap_or(0))
    }
}
