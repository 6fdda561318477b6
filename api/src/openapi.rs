pub mod common;
pub mod ingredients;
pub mod recipes;
pub mod system;

pub use common::PageLimit;
pub use ingredients::IngredientsApi;
pub use recipes::RecipesApi;
pub use system::SystemApi;

use crate::config::AuthSettings;
use crate::database::Database;
use crate::request_logging::RequestLogging;
use poem::{middleware::Cors, Endpoint, EndpointExt, Route};
use poem_openapi::{OpenApi, OpenApiService};
use std::sync::Arc;

/// Combines all API modules into a single OpenAPI specification
pub fn create_combined_api() -> impl OpenApi {
    (SystemApi, RecipesApi, IngredientsApi)
}

/// Full application: `/api/v1` endpoints plus the OpenAPI document and Swagger UI
pub fn build_app(
    database: Arc<Database>,
    auth: AuthSettings,
    max_page_size: u32,
    server_url: &str,
) -> impl Endpoint {
    let api_service =
        OpenApiService::new(create_combined_api(), "Recipe API", env!("CARGO_PKG_VERSION"))
            .server(server_url);
    let swagger_ui = api_service.swagger_ui();
    let spec = api_service.spec_endpoint();

    Route::new()
        .nest("/api/v1", api_service)
        .nest("/swagger-ui", swagger_ui)
        .at("/openapi.json", spec)
        .data(database)
        .data(Arc::new(auth))
        .data(PageLimit(max_page_size))
        .with(Cors::new())
        .with(RequestLogging)
}
