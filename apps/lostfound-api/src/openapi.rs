//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lost and Found API",
        version = "0.1.0",
        description = "Catalog of lost and found items with keyword, area and time filters",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/items", api = domain_items::ApiDoc)
    ),
    tags(
        (name = "Items", description = "Lost and found item catalog")
    )
)]
pub struct ApiDoc;
