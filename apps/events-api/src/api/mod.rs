//! API routes module
//!
//! Every route here is nested under `/api` by `axum_helpers::create_router`.

pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest("/events", events::router(state))
        .merge(health::router(state.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, Config, Environment};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use core_config::{app_info, server::ServerConfig};
    use database::mongodb::MongoConfig;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// State pointing at a port nothing listens on; the driver connects lazily
    async fn unreachable_state() -> AppState {
        let url = "mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200";
        let mongo_client = mongodb::Client::with_uri_str(url).await.unwrap();
        let db = mongo_client.database("catalog");
        AppState {
            config: Config {
                app: app_info!(),
                mongodb: MongoConfig::with_database(url, "catalog"),
                server: ServerConfig::default(),
                catalog: CatalogConfig {
                    collection: "events".to_string(),
                },
                environment: Environment::Development,
            },
            mongo_client,
            db,
        }
    }

    async fn app() -> Router {
        let state = unreachable_state().await;
        axum_helpers::create_router::<crate::openapi::ApiDoc>(routes(&state), &state.config.server)
            .unwrap()
    }

    #[tokio::test]
    async fn test_ready_reports_unavailable_database() {
        let response = app()
            .await
            .oneshot(Request::get("/api/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["checks"]["mongodb"], "disconnected");
    }

    #[tokio::test]
    async fn test_event_routes_are_mounted() {
        let response = app()
            .await
            .oneshot(
                Request::get("/api/events/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_openapi_document_lists_event_paths() {
        let response = app()
            .await
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/api/events/main"].is_object());
        assert!(doc["paths"]["/api/events/{id}"].is_object());
    }
}
