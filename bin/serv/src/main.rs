use std::sync::Arc;

use ct_api::{config::ApiConfig, state::ApiState};
use ct_store::{DocStore, MemStore, PgStore};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    ct_api::tracing::init_tracing(&config.env);

    // Pick the store backend: Postgres when DATABASE_URL is set, otherwise
    // an in-memory store that lives for the length of the process.
    let store: Arc<dyn DocStore> = match &config.database_url {
        Some(database_url) => {
            let pool = ct_store::create_pool(database_url).await?;
            ct_store::ensure_db_and_migrate(database_url, &pool).await?;
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running on the in-memory store");
            Arc::new(MemStore::new())
        }
    };

    // Canonicalize any legacy-shaped catalog documents before serving.
    ct_api::catalog::migrate::migrate_legacy_schema(store.as_ref()).await?;

    let state = ApiState::new(&config, store);

    // Create the application router
    let app = ct_api::router::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive());

    // Start the server
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await?;

    Ok(())
}
