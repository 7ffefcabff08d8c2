//! Document-store boundary for CodeTrack.
//!
//! Three logical collections (`users`, `problems`, `notes`) sit behind the
//! narrow async [`DocStore`] trait. Documents are loosely typed JSON kept
//! schema-on-read; the filter and patch languages cover exactly what the
//! application needs: equality, array membership, array superset, dotted-path
//! sets and idempotent array adds.
//!
//! Two backends implement the trait: [`MemStore`] for tests and storeless
//! development runs, and [`PgStore`] persisting documents as JSONB rows.

pub mod document;
pub mod filter;
pub mod memory;
pub mod patch;
pub mod postgres;
pub mod store;

pub use document::Document;
pub use filter::Filter;
pub use memory::MemStore;
pub use patch::Patch;
pub use postgres::PgStore;
pub use store::{Collection, DocStore, Sort, StoreError, UpsertOutcome};

use anyhow::Context;
use sqlx::{PgPool, Postgres, migrate::MigrateDatabase, postgres::PgPoolOptions};

/// Create a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("failed to connect to database")?;

    Ok(pool)
}

/// Ensure the database exists and run migrations in this crate's `migrations/` folder.
pub async fn ensure_db_and_migrate(database_url: &str, pool: &PgPool) -> anyhow::Result<()> {
    // Ensure database exists (no-op if it already does)
    let exists = Postgres::database_exists(database_url).await?;
    if !exists {
        Postgres::create_database(database_url).await?;
    }

    // Run migrations bundled at compile time from `migrations/`
    sqlx::migrate!().run(pool).await?;

    Ok(())
}
