//! PostgreSQL backend.
//!
//! Documents live in a single `documents` table as JSONB rows. Reads
//! prefilter server-side with `@>` containment (see [`Filter::containment`])
//! and re-evaluate the full filter in process, since `ne` has no containment
//! form. Writes run in a transaction that locks the candidate rows with
//! `SELECT ... FOR UPDATE`, so the filter check and the patch apply as one
//! atomic step even with concurrent writers on the same document.

use std::collections::BTreeSet;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

use crate::document::{collect_distinct, get_path};
use crate::store::{Collection, DocStore, Sort, StoreError, UpsertOutcome, sort_documents};
use crate::{Document, Filter, Patch};

/// A document store persisting to PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the matching documents in insertion order, without sorting.
    async fn fetch(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query(
            // language=PostgreSQL
            r#"
                SELECT doc FROM documents
                WHERE collection = $1 AND doc @> $2
                ORDER BY id
            "#,
        )
        .bind(collection.name())
        .bind(filter.containment())
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable)?;

        let mut docs: Vec<Document> = rows
            .into_iter()
            .map(|row| row.get::<Value, _>("doc"))
            .collect();
        // The containment prefilter is not exact when `ne` conditions are
        // present; the in-process pass settles those.
        if !filter.is_containment_exact() {
            docs.retain(|doc| filter.matches(doc));
        }
        Ok(docs)
    }
}

#[async_trait]
impl DocStore for PgStore {
    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        sort: Option<&Sort>,
    ) -> Result<Vec<Document>, StoreError> {
        let mut docs = self.fetch(collection, filter).await?;
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
        let docs = self.fetch(collection, filter).await?;
        Ok(docs.into_iter().next())
    }

    async fn insert_one(&self, collection: Collection, doc: Document) -> Result<(), StoreError> {
        sqlx::query(
            // language=PostgreSQL
            r#"
                INSERT INTO documents (collection, doc) VALUES ($1, $2)
            "#,
        )
        .bind(collection.name())
        .bind(doc)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(())
    }

    async fn update_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        let matched = lock_first_match(&mut tx, collection, filter).await?;
        let updated = match matched {
            Some((id, mut doc)) => {
                patch.apply(&mut doc);
                sqlx::query(
                    // language=PostgreSQL
                    r#"
                        UPDATE documents SET doc = $1 WHERE id = $2
                    "#,
                )
                .bind(doc)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(unavailable)?;
                true
            }
            None => false,
        };

        tx.commit().await.map_err(unavailable)?;
        Ok(updated)
    }

    async fn upsert_one(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;

        let matched = lock_first_match(&mut tx, collection, filter).await?;
        let outcome = match matched {
            Some((id, mut doc)) => {
                patch.apply(&mut doc);
                sqlx::query(
                    // language=PostgreSQL
                    r#"
                        UPDATE documents SET doc = $1 WHERE id = $2
                    "#,
                )
                .bind(doc)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(unavailable)?;
                UpsertOutcome::Updated
            }
            None => {
                let mut doc = filter.seed();
                patch.apply(&mut doc);
                sqlx::query(
                    // language=PostgreSQL
                    r#"
                        INSERT INTO documents (collection, doc) VALUES ($1, $2)
                    "#,
                )
                .bind(collection.name())
                .bind(doc)
                .execute(&mut *tx)
                .await
                .map_err(unavailable)?;
                UpsertOutcome::Inserted
            }
        };

        tx.commit().await.map_err(unavailable)?;
        Ok(outcome)
    }

    async fn distinct(
        &self,
        collection: Collection,
        field: &str,
    ) -> Result<BTreeSet<String>, StoreError> {
        let docs = self.fetch(collection, &Filter::new()).await?;
        let mut out = BTreeSet::new();
        for doc in &docs {
            if let Some(value) = get_path(doc, field) {
                collect_distinct(value, &mut out);
            }
        }
        Ok(out)
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        if filter.is_containment_exact() {
            let count: i64 = sqlx::query_scalar(
                // language=PostgreSQL
                r#"
                    SELECT COUNT(*) FROM documents
                    WHERE collection = $1 AND doc @> $2
                "#,
            )
            .bind(collection.name())
            .bind(filter.containment())
            .fetch_one(&self.pool)
            .await
            .map_err(unavailable)?;
            return Ok(count as u64);
        }

        let docs = self.fetch(collection, filter).await?;
        Ok(docs.len() as u64)
    }
}

/// Lock the candidate rows for `filter` and return the first full match.
///
/// The containment prefilter narrows the `FOR UPDATE` lock to the documents
/// the filter could touch; the exact match (including `ne` conditions) is
/// then decided on the locked rows, so a concurrent writer that already
/// flipped the document out from under us makes this return `None` rather
/// than clobbering their write.
async fn lock_first_match(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    collection: Collection,
    filter: &Filter,
) -> Result<Option<(i64, Document)>, StoreError> {
    let rows = sqlx::query(
        // language=PostgreSQL
        r#"
            SELECT id, doc FROM documents
            WHERE collection = $1 AND doc @> $2
            ORDER BY id
            FOR UPDATE
        "#,
    )
    .bind(collection.name())
    .bind(filter.containment())
    .fetch_all(&mut **tx)
    .await
    .map_err(unavailable)?;

    Ok(rows.into_iter().find_map(|row| {
        let doc = row.get::<Value, _>("doc");
        filter.matches(&doc).then(|| (row.get::<i64, _>("id"), doc))
    }))
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}
