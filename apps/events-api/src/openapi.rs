//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Event Catalog API",
        version = "0.1.0",
        description = "Search and manage public events stored in MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:3333", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    tags(
        (name = "Events", description = "Event catalog endpoints")
    )
)]
pub struct ApiDoc;
