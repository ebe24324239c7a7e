//! Application state management.
//!
//! Shared state passed to the app-level routes: configuration and the
//! MongoDB handles.

use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap; the MongoDB handles share one connection pool.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
}
