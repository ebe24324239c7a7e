//! Events API routes
//!
//! Binds the events domain to the configured MongoDB collection.

use crate::state::AppState;
use axum::Router;
use domain_events::{EventService, MongoEventRepository, handlers};
use tracing::info;

fn repository(state: &AppState) -> MongoEventRepository {
    MongoEventRepository::new(&state.db, &state.config.catalog.collection)
}

/// Create the events router backed by MongoDB
pub fn router(state: &AppState) -> Router {
    handlers::router(EventService::new(repository(state)))
}

/// Initialize event indexes in MongoDB
pub async fn init_indexes(state: &AppState) -> eyre::Result<()> {
    repository(state)
        .create_indexes()
        .await
        .map_err(|e| eyre::eyre!("Failed to create event indexes: {}", e))?;
    info!(
        collection = %state.config.catalog.collection,
        "Event collection indexes created"
    );
    Ok(())
}
